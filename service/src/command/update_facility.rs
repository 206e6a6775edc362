//! [`Command`] for updating an existing [`Facility`].

use common::{
    operations::{By, Commit, Lock, Select, Transact, Transacted, Update},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        district, facility, facility_type, kelurahan, District, Facility,
        FacilityType, Kelurahan,
    },
    form::{ChangeError, State, Violations},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for updating an existing [`Facility`] with a submitted form
/// [`State`].
///
/// [`Facility::slug`] is never changed once assigned.
#[derive(Clone, Debug)]
pub struct UpdateFacility {
    /// ID of the [`Facility`] to be updated.
    pub id: facility::Id,

    /// Submitted form [`State`].
    pub state: State,
}

impl<Db, St> Command<UpdateFacility> for Service<Db, St>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Lock<By<Facility, facility::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Facility>, facility::Id>>,
            Ok = Option<Facility>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<FacilityType>, facility_type::Id>>,
            Ok = Option<FacilityType>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<District>, district::Id>>,
            Ok = Option<District>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Kelurahan>, kelurahan::Id>>,
            Ok = Option<Kelurahan>,
            Err = Traced<database::Error>,
        > + Database<Update<Facility>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Facility;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: UpdateFacility,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateFacility { id, mut state } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent updates of the same `Facility`.
        tx.execute(Lock(By::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let existing = tx
            .execute(Select(By::<Option<Facility>, _>::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::FacilityNotExists(id))
            .map_err(tracerr::wrap!())?;

        state.facility_id = Some(id);
        state.slug = Some(existing.slug.clone());
        let draft = state
            .validate()
            .map_err(E::Invalid)
            .map_err(tracerr::wrap!())?;
        super::verify_references::<_, E>(&tx, &draft).await?;

        let facility = super::facility(
            id,
            draft,
            existing.created_at,
            DateTime::now().coerce(),
        );

        tx.execute(Update(facility.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(facility)
    }
}

/// Error of [`UpdateFacility`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Facility`] with the provided ID does not exist.
    #[display("`Facility(id: {_0})` does not exist")]
    FacilityNotExists(#[error(not(source))] facility::Id),

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
    use common::Handler as _;

    use crate::{
        domain::{facility, Slug},
        form::{Change, Field, State, ViolationKind},
        test_support::{facility, seed, service},
        SlugUniqueness,
    };

    use super::{ExecutionError, UpdateFacility};

    #[tokio::test]
    async fn updates_facility_keeping_its_slug() {
        let svc = service(SlugUniqueness::default());
        let refs = seed(&svc);
        let existing = facility(&svc, &refs, "Stadion A");

        let mut state = State::from(existing.clone());
        _ = state.apply(Change::Name("Stadion Utama".into())).unwrap();
        _ = state.apply(Change::District(Some(refs.d2.id))).unwrap();
        _ = state.apply(Change::Kelurahan(Some(refs.s3.clone()))).unwrap();
        _ = state.apply(Change::Capacity("15000".into())).unwrap();

        let updated = svc
            .execute(UpdateFacility {
                id: existing.id,
                state,
            })
            .await
            .unwrap();

        assert_eq!(updated.id, existing.id);
        assert_eq!(updated.slug, Slug::new("stadion-a").unwrap());
        assert_eq!(updated.name.as_ref(), "Stadion Utama");
        assert_eq!(updated.district_id, refs.d2.id);
        assert_eq!(updated.kelurahan_id, Some(refs.s3.id));
        assert_eq!(updated.location, refs.s3.location);
        assert_eq!(updated.capacity, Some(15000));
        assert!(updated.created_at == existing.created_at);
        assert!(updated.updated_at >= existing.updated_at);

        let stored = svc.database().data().facilities[&existing.id].clone();
        assert_eq!(stored.name.as_ref(), "Stadion Utama");
        assert_eq!(stored.kelurahan_id, Some(refs.s3.id));
    }

    #[tokio::test]
    async fn keeps_last_location_after_district_change() {
        let svc = service(SlugUniqueness::default());
        let refs = seed(&svc);
        let existing = facility(&svc, &refs, "Stadion A");

        let mut state = State::from(existing.clone());
        _ = state.apply(Change::Kelurahan(Some(refs.s2.clone()))).unwrap();
        _ = state.apply(Change::Latitude("-6.2".into())).unwrap();
        _ = state.apply(Change::District(Some(refs.d2.id))).unwrap();
        assert_eq!(state.kelurahan_id, None);

        let updated = svc
            .execute(UpdateFacility {
                id: existing.id,
                state,
            })
            .await
            .unwrap();

        assert_eq!(updated.kelurahan_id, None);
        assert_eq!(updated.district_id, refs.d2.id);
        assert_eq!(updated.location.latitude.to_string(), "-6.2");
        assert_eq!(updated.location.longitude, refs.s2.location.longitude);
    }

    #[tokio::test]
    async fn fails_on_non_existent_facility() {
        let svc = service(SlugUniqueness::default());
        let refs = seed(&svc);
        let existing = facility(&svc, &refs, "Stadion A");
        let missing = facility::Id::new();

        let err = svc
            .execute(UpdateFacility {
                id: missing,
                state: State::from(existing),
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::FacilityNotExists(id) if *id == missing,
        ));
    }

    #[tokio::test]
    async fn reports_every_violation_at_once() {
        let svc = service(SlugUniqueness::default());
        let refs = seed(&svc);
        let existing = facility(&svc, &refs, "Stadion A");

        let mut state = State::from(existing.clone());
        state.name = "  ".into();
        state.address = String::new();
        state.employees_count = "-3".into();

        let err = svc
            .execute(UpdateFacility {
                id: existing.id,
                state,
            })
            .await
            .unwrap_err();

        let ExecutionError::Invalid(v) = err.as_ref() else {
            panic!("expected `Invalid`, got: {err}");
        };
        assert_eq!(
            v.as_slice()
                .iter()
                .map(|v| (v.field, v.kind))
                .collect::<Vec<_>>(),
            [
                (Field::Name, ViolationKind::Required),
                (Field::EmployeesCount, ViolationKind::Negative),
                (Field::Address, ViolationKind::Required),
            ],
        );
        let stored = svc.database().data().facilities[&existing.id].clone();
        assert_eq!(stored.name.as_ref(), "Stadion A");
    }
}
