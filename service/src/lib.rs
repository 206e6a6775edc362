//! Service contains the business logic of the application.
//!
//! List of available Cargo features:
#![doc = document_features::document_features!()]
#![deny(
    nonstandard_style,
    rust_2018_idioms,
    rustdoc::all,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code
)]
#![forbid(non_ascii_idents)]
#![warn(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    clippy::pedantic,
    clippy::wildcard_enum_match_arm,
    deprecated_in_future,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    unused_crate_dependencies,
    unused_import_braces,
    unused_labels,
    unused_lifetimes,
    unused_qualifications,
    unused_results
)]

pub mod command;
pub mod domain;
pub mod form;
pub mod infra;
pub mod query;
pub mod read;
pub mod task;

use common::operations::{By, Start};
use derive_more::{Debug, Error};
use serde::Deserialize;

#[cfg(doc)]
use self::{
    domain::{media, Facility, FacilityType, Slug},
    infra::{Database, Storage},
};

pub use self::{command::Command, query::Query, task::Task};

/// [`Service`] configuration.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    /// [`SlugUniqueness`] to check new [`Slug`]s with.
    pub slug_uniqueness: SlugUniqueness,

    /// Maximum allowed size of a single photo in bytes.
    pub max_photo_size: domain::media::Size,

    /// [`task::PruneOrphanedMedia`] configuration.
    pub prune_orphaned_media: task::prune_orphaned_media::Config,
}

/// Source of truth for checking a new [`Facility`] [`Slug`] for uniqueness.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SlugUniqueness {
    /// [`Slug`] must not be taken by any [`FacilityType`].
    ///
    /// Only the `facilities_slug_key` constraint guards the [`Facility`]
    /// [`Slug`]s in this mode.
    #[default]
    FacilityTypes,

    /// [`Slug`] must not be taken by any other [`Facility`].
    Facilities,
}

/// Domain service.
#[derive(Clone, Debug)]
pub struct Service<Db, St> {
    /// Configuration of this [`Service`].
    config: Config,

    /// [`Database`] of this [`Service`].
    database: Db,

    /// [`Storage`] of [`media`] files of this [`Service`].
    storage: St,
}

impl<Db, St> Service<Db, St> {
    /// Creates a new [`Service`] with the provided parameters.
    pub fn new(
        config: Config,
        database: Db,
        storage: St,
    ) -> (Self, task::Background)
    where
        Self: Task<
                Start<
                    By<
                        task::PruneOrphanedMedia<Self>,
                        task::prune_orphaned_media::Config,
                    >,
                >,
                Ok = (),
                Err: Error,
            > + Clone
            + 'static,
    {
        let this = Service {
            config,
            database,
            storage,
        };

        let mut bg = task::Background::default();
        let svc = this.clone();
        bg.spawn(async move {
            svc.execute(Start(By::new(svc.config().prune_orphaned_media)))
                .await
        });

        (this, bg)
    }

    /// Returns [`Config`] of this [`Service`].
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns [`Database`] of this [`Service`].
    #[must_use]
    pub fn database(&self) -> &Db {
        &self.database
    }

    /// Returns [`Storage`] of this [`Service`].
    #[must_use]
    pub fn storage(&self) -> &St {
        &self.storage
    }
}
