//! Background [`Task`]s definitions.

mod background;
pub mod prune_orphaned_media;

pub use common::Handler as Task;

pub use self::{
    background::Background, prune_orphaned_media::PruneOrphanedMedia,
};
