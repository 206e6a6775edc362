//! In-memory [`Storage`] implementation.

use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use common::operations::{By, Delete, Insert, Select};
use tracerr::Traced;

use crate::domain::{facility, media, Media};

use super::{Error, Object, Storage};

/// [`Storage`] keeping files in memory.
#[derive(Clone, Debug, Default)]
pub struct Memory {
    /// Stored files by their paths.
    files: Arc<Mutex<BTreeMap<String, Vec<u8>>>>,
}

impl Memory {
    /// Returns the stored files.
    pub(crate) fn files(&self) -> MutexGuard<'_, BTreeMap<String, Vec<u8>>> {
        self.files.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Storage<Insert<Object>> for Memory {
    type Ok = ();
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Insert(object): Insert<Object>,
    ) -> Result<Self::Ok, Self::Err> {
        _ = self.files().insert(object.path.to_string(), object.content);
        Ok(())
    }
}

impl Storage<Delete<By<Media, media::Path>>> for Memory {
    type Ok = ();
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Media, media::Path>>,
    ) -> Result<Self::Ok, Self::Err> {
        _ = self.files().remove(by.into_inner().as_ref());
        Ok(())
    }
}

impl Storage<Delete<By<Media, facility::Id>>> for Memory {
    type Ok = ();
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Media, facility::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let prefix = format!("{}/", by.into_inner());
        self.files().retain(|path, _| !path.starts_with(&prefix));
        Ok(())
    }
}

impl Storage<Select<By<Vec<facility::Id>, ()>>> for Memory {
    type Ok = Vec<facility::Id>;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<facility::Id>, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut ids = self
            .files()
            .keys()
            .filter_map(|path| path.split('/').next()?.parse().ok())
            .collect::<Vec<_>>();
        ids.dedup();
        Ok(ids)
    }
}

impl Storage<Select<By<media::Url, media::Path>>> for Memory {
    type Ok = media::Url;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Select(by): Select<By<media::Url, media::Path>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(media::Url::join("/media", &by.into_inner()))
    }
}
