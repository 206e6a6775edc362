//! [`Local`] filesystem [`Storage`] implementation.

use std::{io, path::PathBuf};

use common::operations::{By, Delete, Insert, Select};
use tokio::fs;
use tracerr::Traced;

use crate::domain::{facility, media, Media};

use super::{Error, Object, Storage};

/// [`Storage`] keeping files in a local directory.
#[derive(Clone, Debug)]
pub struct Local {
    /// Root directory of this [`Storage`].
    root: PathBuf,

    /// Base URL the root directory is publicly served at.
    public_url: String,
}

impl Local {
    /// Creates a new [`Local`] [`Storage`] rooted at the provided directory.
    #[must_use]
    pub fn new(
        root: impl Into<PathBuf>,
        public_url: impl Into<String>,
    ) -> Self {
        Self {
            root: root.into(),
            public_url: public_url.into(),
        }
    }

    /// Returns the filesystem path of the provided [`media::Path`].
    fn resolve(&self, path: &media::Path) -> PathBuf {
        path.segments()
            .fold(self.root.clone(), |acc, segment| acc.join(segment))
    }
}

/// Removes the provided directory recursively, if it exists.
async fn remove_dir(dir: PathBuf) -> Result<(), Traced<Error>> {
    match fs::remove_dir_all(&dir).await {
        Err(e) if e.kind() != io::ErrorKind::NotFound => {
            Err(tracerr::new!(Error::Io(e)))
        }
        Ok(()) | Err(_) => Ok(()),
    }
}

impl Storage<Insert<Object>> for Local {
    type Ok = ();
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Insert(object): Insert<Object>,
    ) -> Result<Self::Ok, Self::Err> {
        let file = self.resolve(&object.path);
        if let Some(dir) = file.parent() {
            fs::create_dir_all(dir)
                .await
                .map_err(tracerr::from_and_wrap!(=> Error))?;
        }
        fs::write(&file, &object.content)
            .await
            .map_err(tracerr::from_and_wrap!(=> Error))
    }
}

impl Storage<Delete<By<Media, media::Path>>> for Local {
    type Ok = ();
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Media, media::Path>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Every `Media` file lives in its own directory.
        let file = self.resolve(&by.into_inner());
        match file.parent() {
            Some(dir) => remove_dir(dir.to_path_buf())
                .await
                .map_err(tracerr::wrap!()),
            None => Ok(()),
        }
    }
}

impl Storage<Delete<By<Media, facility::Id>>> for Local {
    type Ok = ();
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Media, facility::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        remove_dir(self.root.join(by.into_inner().to_string()))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl Storage<Select<By<Vec<facility::Id>, ()>>> for Local {
    type Ok = Vec<facility::Id>;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<facility::Id>, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut entries = match fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Ok(vec![]);
            }
            Err(e) => return Err(tracerr::new!(Error::Io(e))),
        };

        let mut ids = vec![];
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(tracerr::from_and_wrap!(=> Error))?
        {
            // Anything but a facility directory is not ours to touch.
            if let Some(id) = entry
                .file_name()
                .to_str()
                .and_then(|name| name.parse().ok())
            {
                ids.push(id);
            }
        }
        Ok(ids)
    }
}

impl Storage<Select<By<media::Url, media::Path>>> for Local {
    type Ok = media::Url;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Select(by): Select<By<media::Url, media::Path>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(media::Url::join(&self.public_url, &by.into_inner()))
    }
}
