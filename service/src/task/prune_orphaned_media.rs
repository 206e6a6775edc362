//! [`PruneOrphanedMedia`] [`Task`].

use std::{collections::HashMap, convert::Infallible, error::Error, time};

use common::operations::{By, Delete, Perform, Select, Start};
use derive_more::{Display, Error as StdError, From};
use tokio::time::interval;
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{facility, Facility, Media},
    infra::{database, storage, Database, Storage},
    Service,
};

use super::Task;

/// Configuration for [`PruneOrphanedMedia`] [`Task`].
#[derive(Clone, Copy, Debug)]
pub struct Config {
    /// Interval between prunings.
    pub interval: time::Duration,
}

/// [`Task`] for removing stored [`Media`] files of non-existent
/// [`Facility`]s.
///
/// Such files are left behind whenever removing them right after deleting a
/// [`Facility`] fails.
#[derive(Clone, Copy, Debug)]
pub struct PruneOrphanedMedia<S> {
    /// [`Config`] of this [`Task`].
    config: Config,

    /// [`Service`] instance.
    service: S,
}

impl<Db, St> Task<Start<By<PruneOrphanedMedia<Self>, Config>>>
    for Service<Db, St>
where
    PruneOrphanedMedia<Service<Db, St>>:
        Task<Perform<()>, Ok = usize, Err: Error> + 'static,
    Self: Clone,
{
    type Ok = ();
    type Err = Infallible;

    async fn execute(
        &self,
        Start(by): Start<By<PruneOrphanedMedia<Self>, Config>>,
    ) -> Result<Self::Ok, Self::Err> {
        let config = by.into_inner();
        let task = PruneOrphanedMedia {
            config,
            service: self.clone(),
        };

        let mut interval = interval(task.config.interval);
        loop {
            let _ = interval.tick().await;
            match task.execute(Perform(())).await {
                Ok(0) => {}
                Ok(n) => log::info!("pruned media of {n} deleted facilities"),
                Err(e) => log::error!("`task::PruneOrphanedMedia` failed: {e}"),
            }
        }
    }
}

impl<Db, St> Task<Perform<()>> for PruneOrphanedMedia<Service<Db, St>>
where
    Db: Database<
        Select<By<HashMap<facility::Id, Facility>, Vec<facility::Id>>>,
        Ok = HashMap<facility::Id, Facility>,
        Err = Traced<database::Error>,
    >,
    St: Storage<
            Select<By<Vec<facility::Id>, ()>>,
            Ok = Vec<facility::Id>,
            Err = Traced<storage::Error>,
        > + Storage<
            Delete<By<Media, facility::Id>>,
            Ok = (),
            Err = Traced<storage::Error>,
        >,
{
    type Ok = usize;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, _: Perform<()>) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let stored = self
            .service
            .storage()
            .execute(Select(By::new(())))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if stored.is_empty() {
            return Ok(0);
        }

        let existing = self
            .service
            .database()
            .execute(Select(By::new(stored.clone())))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let mut pruned = 0;
        for id in stored.into_iter().filter(|id| !existing.contains_key(id)) {
            self.service
                .storage()
                .execute(Delete(By::new(id)))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?;
            pruned += 1;
        }
        Ok(pruned)
    }
}

/// Error of [`PruneOrphanedMedia`] execution.
#[derive(Debug, Display, From, StdError)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`Storage`] error.
    #[display("`Storage` operation failed: {_0}")]
    Storage(storage::Error),
}
