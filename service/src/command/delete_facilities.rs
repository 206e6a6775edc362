//! [`Command`] for deleting [`Facility`]s.

use common::operations::{By, Commit, Delete, Transact, Transacted};
use tracerr::Traced;
use tracing as log;

#[cfg(doc)]
use crate::{domain::Facility, task::PruneOrphanedMedia};
use crate::{
    domain::{facility, Media},
    infra::{database, storage, Database, Storage},
    Service,
};

use super::Command;

/// [`Command`] for deleting [`Facility`]s along with all their [`Media`].
///
/// Deletion is permanent. Stored [`Media`] files are removed after the
/// deletion is committed, and the ones failed to be removed are left for the
/// [`PruneOrphanedMedia`] task.
#[derive(Clone, Debug)]
pub struct DeleteFacilities {
    /// IDs of the [`Facility`]s to be deleted.
    pub ids: Vec<facility::Id>,
}

impl<Db, St> Command<DeleteFacilities> for Service<Db, St>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Delete<By<Vec<facility::Id>, Vec<facility::Id>>>,
            Ok = Vec<facility::Id>,
            Err = Traced<database::Error>,
        > + Database<Commit, Err = Traced<database::Error>>,
    St: Storage<Delete<By<Media, facility::Id>>, Err = Traced<storage::Error>>,
{
    type Ok = Vec<facility::Id>;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: DeleteFacilities,
    ) -> Result<Self::Ok, Self::Err> {
        let DeleteFacilities { mut ids } = cmd;
        ids.sort_unstable();
        ids.dedup();
        if ids.is_empty() {
            return Ok(ids);
        }

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::wrap!())?;
        let deleted = tx
            .execute(Delete(By::new(ids)))
            .await
            .map_err(tracerr::wrap!())?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::wrap!())
            .map(drop)?;

        for id in &deleted {
            if let Err(e) = self.storage().execute(Delete(By::new(*id))).await {
                log::warn!(
                    "failed to remove media of `Facility(id: {id})`: {e}",
                );
            }
        }

        Ok(deleted)
    }
}

/// Error of [`DeleteFacilities`] [`Command`] execution.
pub type ExecutionError = database::Error;
