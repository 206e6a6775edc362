//! [`Command`] for creating a new [`Facility`].

use common::{
    operations::{By, Commit, Insert, Select, Transact, Transacted},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        district, facility, facility_type, kelurahan, District, Facility,
        FacilityType, Kelurahan, Slug,
    },
    form::{ChangeError, Field, State, Violation, ViolationKind, Violations},
    infra::{database, Database},
    Service, SlugUniqueness,
};

use super::Command;

/// [`Command`] for creating a new [`Facility`] out of a submitted form
/// [`State`].
#[derive(Clone, Debug)]
pub struct CreateFacility {
    /// Submitted form [`State`].
    pub state: State,
}

impl<Db, St> Command<CreateFacility> for Service<Db, St>
where
    Db: Database<Transact, Err = Traced<database::Error>>
        + Database<
            Select<By<Option<FacilityType>, facility_type::Id>>,
            Ok = Option<FacilityType>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<FacilityType>, Slug>>,
            Ok = Option<FacilityType>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Facility>, Slug>>,
            Ok = Option<Facility>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<District>, district::Id>>,
            Ok = Option<District>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Kelurahan>, kelurahan::Id>>,
            Ok = Option<Kelurahan>,
            Err = Traced<database::Error>,
        >,
    Transacted<Db>: Database<Insert<Facility>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Facility;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateFacility,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateFacility { mut state } = cmd;
        state.facility_id = None;

        let draft = state
            .validate()
            .map_err(E::Invalid)
            .map_err(tracerr::wrap!())?;
        super::verify_references::<_, E>(self.database(), &draft).await?;

        let is_slug_taken = match self.config().slug_uniqueness {
            SlugUniqueness::FacilityTypes => self
                .database()
                .execute(Select(By::<Option<FacilityType>, _>::new(
                    draft.slug.clone(),
                )))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?
                .is_some(),
            SlugUniqueness::Facilities => self
                .database()
                .execute(Select(By::<Option<Facility>, _>::new(
                    draft.slug.clone(),
                )))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?
                .is_some(),
        };
        if is_slug_taken {
            return Err(tracerr::new!(E::Invalid(slug_taken())));
        }

        let now = DateTime::now();
        let facility = super::facility(
            facility::Id::new(),
            draft,
            now.coerce(),
            now.coerce(),
        );

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let inserted = tx.execute(Insert(facility.clone())).await;
        if let Err(e) = &inserted {
            if e.as_ref().is_unique_violation(Some("facilities_slug_key")) {
                return Err(tracerr::new!(E::Invalid(slug_taken())));
            }
        }
        inserted
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(facility)
    }
}

/// Returns [`Violations`] of an already taken [`Slug`].
fn slug_taken() -> Violations {
    Violation {
        field: Field::Slug,
        kind: ViolationKind::NotUnique,
    }
    .into()
}

/// Error of [`CreateFacility`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// Submitted form [`State`] is invalid.
    #[display("Invalid `Facility`: {_0}")]
    #[from]
    Invalid(Violations),

    /// Selected [`Kelurahan`] doesn't match the selected [`District`].
    #[display("{_0}")]
    #[from]
    Kelurahan(ChangeError),
}

#[cfg(test)]
mod spec {
    use common::{AreaUnit, Handler as _};
    use rust_decimal::Decimal;

    use crate::{
        domain::{facility_type, kelurahan, FacilityType, Slug},
        form::{ChangeError, Field, ViolationKind},
        test_support::{facility, seed, service, state},
        SlugUniqueness,
    };

    use super::{CreateFacility, ExecutionError};

    fn violations(e: &ExecutionError) -> Vec<(Field, ViolationKind)> {
        let ExecutionError::Invalid(v) = e else {
            panic!("expected `Invalid`, got: {e}");
        };
        v.as_slice().iter().map(|v| (v.field, v.kind)).collect()
    }

    #[tokio::test]
    async fn creates_facility_with_derived_slug() {
        let svc = service(SlugUniqueness::default());
        let refs = seed(&svc);

        let created = svc
            .execute(CreateFacility {
                state: state(&refs, "Stadion A"),
            })
            .await
            .unwrap();

        assert_eq!(created.slug.as_ref(), "stadion-a");
        assert_eq!(created.district_id, refs.d1.id);
        assert_eq!(created.kelurahan_id, None);
        assert_eq!(created.land_area.amount(), Decimal::new(1205, 1));
        assert_eq!(created.land_area.unit(), AreaUnit::SquareMeters);
        assert_eq!(created.building_area.amount(), Decimal::from(80));
        assert!(created.created_at.coerce() == created.updated_at);

        let data = svc.database().data();
        assert_eq!(data.facilities.len(), 1);
        assert!(data.facilities.contains_key(&created.id));
    }

    #[tokio::test]
    async fn rejects_negative_areas_without_saving() {
        let svc = service(SlugUniqueness::default());
        let refs = seed(&svc);
        let mut st = state(&refs, "Stadion A");
        st.land_area = "-1".into();
        st.building_area = "-0.5".into();

        let err = svc
            .execute(CreateFacility { state: st })
            .await
            .unwrap_err();

        assert_eq!(
            violations(err.as_ref()),
            [
                (Field::LandArea, ViolationKind::Negative),
                (Field::BuildingArea, ViolationKind::Negative),
            ],
        );
        assert!(svc.database().data().facilities.is_empty());
    }

    #[tokio::test]
    async fn rejects_non_existent_references() {
        let svc = service(SlugUniqueness::default());
        let refs = seed(&svc);
        let mut st = state(&refs, "Stadion A");
        st.facility_type_id = Some(facility_type::Id::new());
        st.kelurahan_id = Some(kelurahan::Id::new());

        let err = svc
            .execute(CreateFacility { state: st })
            .await
            .unwrap_err();

        assert_eq!(
            violations(err.as_ref()),
            [
                (Field::FacilityType, ViolationKind::NotExists),
                (Field::Kelurahan, ViolationKind::NotExists),
            ],
        );
    }

    #[tokio::test]
    async fn rejects_kelurahan_of_another_district() {
        let svc = service(SlugUniqueness::default());
        let refs = seed(&svc);
        let mut st = state(&refs, "Stadion A");
        st.kelurahan_id = Some(refs.s3.id);

        let err = svc
            .execute(CreateFacility { state: st })
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::Kelurahan(ChangeError::KelurahanNotInDistrict {
                kelurahan_id,
                district_id: Some(district_id),
            }) if *kelurahan_id == refs.s3.id && *district_id == refs.d1.id,
        ));
        assert!(svc.database().data().facilities.is_empty());
    }

    #[tokio::test]
    async fn checks_slug_against_facility_types_by_default() {
        let svc = service(SlugUniqueness::FacilityTypes);
        let refs = seed(&svc);
        svc.database().data().facility_types.push(FacilityType {
            id: facility_type::Id::new(),
            name: facility_type::Name::new("Lapangan Bola").unwrap(),
            slug: Slug::new("lapangan-bola").unwrap(),
        });

        let err = svc
            .execute(CreateFacility {
                state: state(&refs, "Lapangan Bola"),
            })
            .await
            .unwrap_err();
        assert_eq!(
            violations(err.as_ref()),
            [(Field::Slug, ViolationKind::NotUnique)],
        );

        // Only the storage constraint guards `Facility` slugs in this mode.
        _ = facility(&svc, &refs, "Stadion A");
        let err = svc
            .execute(CreateFacility {
                state: state(&refs, "Stadion A"),
            })
            .await
            .unwrap_err();
        assert_eq!(
            violations(err.as_ref()),
            [(Field::Slug, ViolationKind::NotUnique)],
        );
        assert_eq!(svc.database().data().facilities.len(), 1);
    }

    #[tokio::test]
    async fn checks_slug_against_facilities_when_configured() {
        let svc = service(SlugUniqueness::Facilities);
        let refs = seed(&svc);

        // Taken by a `FacilityType` only.
        let created = svc
            .execute(CreateFacility {
                state: state(&refs, "Stadion"),
            })
            .await
            .unwrap();
        assert_eq!(created.slug, refs.stadion.slug);

        let err = svc
            .execute(CreateFacility {
                state: state(&refs, "STADION"),
            })
            .await
            .unwrap_err();
        assert_eq!(
            violations(err.as_ref()),
            [(Field::Slug, ViolationKind::NotUnique)],
        );
    }
}
