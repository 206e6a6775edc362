//! [`Query`] collection backing a [`Facility`] form.
//!
//! Option lists are never cached: they're re-queried for the current
//! [`State`] whenever a selection they depend on changes.

use common::operations::{By, Select};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        district, facility, kelurahan, District, Facility, FacilityType,
        Kelurahan,
    },
    form::{Change, ChangeError, State},
    infra::{database, Database},
    read::{self, Search},
    Query, Service,
};

/// Queries [`read::form::Options`] for a form [`State`].
#[derive(Clone, Debug, Default)]
pub struct Options {
    /// ID of the selected [`District`], if any.
    pub district_id: Option<district::Id>,

    /// [`Search`] by name of the [`FacilityType`]s to offer.
    pub facility_type_name: Option<Search>,
}

impl<Db, St> Query<Options> for Service<Db, St>
where
    Db: Database<
            Select<By<Vec<FacilityType>, read::facility_type::Filter>>,
            Ok = Vec<FacilityType>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<District>, ()>>,
            Ok = Vec<District>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<Kelurahan>, district::Id>>,
            Ok = Vec<Kelurahan>,
            Err = Traced<database::Error>,
        >,
{
    type Ok = read::form::Options;
    type Err = Traced<database::Error>;

    async fn execute(&self, query: Options) -> Result<Self::Ok, Self::Err> {
        let Options {
            district_id,
            facility_type_name,
        } = query;

        let facility_types = self
            .database()
            .execute(Select(By::new(read::facility_type::Filter {
                name: facility_type_name,
            })))
            .await
            .map_err(tracerr::wrap!())?;
        let districts = self
            .database()
            .execute(Select(By::new(())))
            .await
            .map_err(tracerr::wrap!())?;
        let kelurahans = if let Some(id) = district_id {
            self.database()
                .execute(Select(By::new(id)))
                .await
                .map_err(tracerr::wrap!())?
        } else {
            vec![]
        };

        Ok(read::form::Options {
            facility_types,
            districts,
            kelurahans,
            is_kelurahan_disabled: district_id.is_none(),
        })
    }
}

/// Applies a [`Change`] to a form [`State`], resolving the selected
/// [`Kelurahan`] by its ID.
#[derive(Clone, Debug)]
pub struct ApplyChange {
    /// Current form [`State`].
    pub state: State,

    /// [`Change`] to apply.
    pub change: Change<kelurahan::Id>,
}

impl<Db, St> Query<ApplyChange> for Service<Db, St>
where
    Db: Database<
        Select<By<Option<Kelurahan>, kelurahan::Id>>,
        Ok = Option<Kelurahan>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = read::form::Applied;
    type Err = Traced<ApplyChangeError>;

    async fn execute(
        &self,
        query: ApplyChange,
    ) -> Result<Self::Ok, Self::Err> {
        use ApplyChangeError as E;

        let ApplyChange { mut state, change } = query;

        let kelurahan = if let Some(id) = change.kelurahan() {
            Some(
                self.database()
                    .execute(Select(By::new(*id)))
                    .await
                    .map_err(tracerr::map_from_and_wrap!(=> E))?
                    .ok_or(E::KelurahanNotExists(*id))
                    .map_err(tracerr::wrap!())?,
            )
        } else {
            None
        };
        let change = change
            .try_map_kelurahan(|id| kelurahan.ok_or(E::KelurahanNotExists(id)))
            .map_err(tracerr::wrap!())?;

        let changed = state
            .apply(change)
            .map_err(E::Kelurahan)
            .map_err(tracerr::wrap!())?;

        Ok(read::form::Applied { state, changed })
    }
}

/// Error of [`ApplyChange`] [`Query`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ApplyChangeError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Kelurahan`] doesn't match the selected [`District`].
    #[display("{_0}")]
    #[from]
    Kelurahan(ChangeError),

    /// [`Kelurahan`] with the provided ID does not exist.
    #[display("`Kelurahan(id: {_0})` does not exist")]
    KelurahanNotExists(#[error(not(source))] kelurahan::Id),
}

/// Queries a form [`State`] pre-populated with an existing [`Facility`].
#[derive(Clone, Copy, Debug)]
pub struct Edit(pub facility::Id);

impl<Db, St> Query<Edit> for Service<Db, St>
where
    Db: Database<
        Select<By<Option<Facility>, facility::Id>>,
        Ok = Option<Facility>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = State;
    type Err = Traced<EditError>;

    async fn execute(&self, Edit(id): Edit) -> Result<Self::Ok, Self::Err> {
        use EditError as E;

        self.database()
            .execute(Select(By::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .map(State::from)
            .ok_or(E::FacilityNotExists(id))
            .map_err(tracerr::wrap!())
    }
}

/// Error of [`Edit`] [`Query`] execution.
#[derive(Debug, Display, Error, From)]
pub enum EditError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Facility`] with the provided ID does not exist.
    #[display("`Facility(id: {_0})` does not exist")]
    FacilityNotExists(#[error(not(source))] facility::Id),
}

#[cfg(test)]
mod spec {
    use common::Handler as _;

    use crate::{
        domain::{facility, kelurahan},
        form::{Change, ChangeError, Field, State},
        read::Search,
        test_support::{facility, seed, service},
        SlugUniqueness,
    };

    use super::{ApplyChange, ApplyChangeError, Edit, EditError, Options};

    #[tokio::test]
    async fn offers_no_kelurahans_without_district() {
        let svc = service(SlugUniqueness::default());
        _ = seed(&svc);

        let opts = svc.execute(Options::default()).await.unwrap();

        assert!(opts.kelurahans.is_empty());
        assert!(opts.is_kelurahan_disabled);
        assert_eq!(
            opts.districts
                .iter()
                .map(|d| d.name.to_string())
                .collect::<Vec<_>>(),
            ["Cipondoh", "Karawaci"],
        );
        assert_eq!(opts.facility_types.len(), 2);
    }

    #[tokio::test]
    async fn offers_only_kelurahans_of_selected_district() {
        let svc = service(SlugUniqueness::default());
        let refs = seed(&svc);

        for district in [&refs.d1, &refs.d2] {
            let opts = svc
                .execute(Options {
                    district_id: Some(district.id),
                    facility_type_name: None,
                })
                .await
                .unwrap();

            assert!(!opts.is_kelurahan_disabled);
            assert!(!opts.kelurahans.is_empty());
            assert!(opts
                .kelurahans
                .iter()
                .all(|k| k.district_id == district.id));
        }

        let opts = svc
            .execute(Options {
                district_id: Some(refs.d1.id),
                facility_type_name: None,
            })
            .await
            .unwrap();
        assert_eq!(
            opts.kelurahans.iter().map(|k| k.id).collect::<Vec<_>>(),
            [refs.s2.id, refs.s1.id],
        );
    }

    #[tokio::test]
    async fn searches_facility_types_by_name() {
        let svc = service(SlugUniqueness::default());
        let refs = seed(&svc);

        let opts = svc
            .execute(Options {
                district_id: None,
                facility_type_name: Search::new("STAD"),
            })
            .await
            .unwrap();

        assert_eq!(
            opts.facility_types.iter().map(|t| t.id).collect::<Vec<_>>(),
            [refs.stadion.id],
        );
    }

    #[tokio::test]
    async fn selecting_kelurahan_copies_its_location() {
        let svc = service(SlugUniqueness::default());
        let refs = seed(&svc);
        let mut state = State::new();
        state.district_id = Some(refs.d1.id);

        let applied = svc
            .execute(ApplyChange {
                state,
                change: Change::Kelurahan(Some(refs.s1.id)),
            })
            .await
            .unwrap();

        assert_eq!(applied.state.kelurahan_id, Some(refs.s1.id));
        assert_eq!(applied.state.location, Some(refs.s1.location));
        assert_eq!(
            applied.state.latitude,
            refs.s1.location.latitude.to_string(),
        );
        assert_eq!(
            applied.state.longitude,
            refs.s1.location.longitude.to_string(),
        );
        assert_eq!(applied.changed[0], Field::Kelurahan);
        assert!(applied.changed.contains(&Field::Location));
    }

    #[tokio::test]
    async fn selecting_district_clears_kelurahan() {
        let svc = service(SlugUniqueness::default());
        let refs = seed(&svc);
        let mut state = State::new();
        state.district_id = Some(refs.d1.id);
        state.kelurahan_id = Some(refs.s1.id);

        for _ in 0..2 {
            let applied = svc
                .execute(ApplyChange {
                    state: state.clone(),
                    change: Change::District(Some(refs.d2.id)),
                })
                .await
                .unwrap();

            assert_eq!(applied.state.district_id, Some(refs.d2.id));
            assert_eq!(applied.state.kelurahan_id, None);
            state = applied.state;
        }
    }

    #[tokio::test]
    async fn rejects_unknown_or_foreign_kelurahan() {
        let svc = service(SlugUniqueness::default());
        let refs = seed(&svc);
        let mut state = State::new();
        state.district_id = Some(refs.d1.id);

        let missing = kelurahan::Id::new();
        let err = svc
            .execute(ApplyChange {
                state: state.clone(),
                change: Change::Kelurahan(Some(missing)),
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err.as_ref(),
            ApplyChangeError::KelurahanNotExists(id) if *id == missing,
        ));

        let err = svc
            .execute(ApplyChange {
                state,
                change: Change::Kelurahan(Some(refs.s3.id)),
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err.as_ref(),
            ApplyChangeError::Kelurahan(
                ChangeError::KelurahanNotInDistrict { .. }
            ),
        ));
    }

    #[tokio::test]
    async fn pre_populates_existing_facility() {
        let svc = service(SlugUniqueness::default());
        let refs = seed(&svc);
        let f = facility(&svc, &refs, "Stadion A");

        let state = svc.execute(Edit(f.id)).await.unwrap();
        assert_eq!(state.facility_id, Some(f.id));
        assert_eq!(state.name, "Stadion A");
        assert_eq!(state.slug, Some(f.slug));
        assert_eq!(state.land_area, "1000");

        let missing = facility::Id::new();
        let err = svc.execute(Edit(missing)).await.unwrap_err();
        assert!(matches!(
            err.as_ref(),
            EditError::FacilityNotExists(id) if *id == missing,
        ));
    }
}
