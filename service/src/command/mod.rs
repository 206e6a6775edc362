//! [`Command`] definition.

pub mod attach_facility_photo;
pub mod create_facility;
pub mod delete_facilities;
pub mod detach_facility_photo;
pub mod reorder_facility_photos;
pub mod update_facility;

use common::operations::{By, Select};
use tracerr::Traced;

use crate::{
    domain::{
        district, facility, facility_type, kelurahan, District, Facility,
        FacilityType, Kelurahan,
    },
    form::{ChangeError, Draft, Field, ViolationKind, Violations},
    infra::{database, Database},
};

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::{
    attach_facility_photo::AttachFacilityPhoto,
    create_facility::CreateFacility, delete_facilities::DeleteFacilities,
    detach_facility_photo::DetachFacilityPhoto,
    reorder_facility_photos::ReorderFacilityPhotos,
    update_facility::UpdateFacility,
};

/// Verifies that everything the provided [`Draft`] refers to exists, and its
/// [`Kelurahan`] (if any) belongs to its [`District`].
///
/// Non-existent references are reported as [`Violations`] of the referring
/// [`Field`]s.
async fn verify_references<Db, E>(
    db: &Db,
    draft: &Draft,
) -> Result<(), Traced<E>>
where
    Db: Database<
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
        >,
    E: From<database::Error> + From<Violations> + From<ChangeError>,
{
    let mut violations = Violations::default();

    let facility_type = db
        .execute(Select(By::new(draft.facility_type_id)))
        .await
        .map_err(tracerr::map_from_and_wrap!(=> E))?;
    if facility_type.is_none() {
        violations.push(Field::FacilityType, ViolationKind::NotExists);
    }

    let district = db
        .execute(Select(By::new(draft.district_id)))
        .await
        .map_err(tracerr::map_from_and_wrap!(=> E))?;
    if district.is_none() {
        violations.push(Field::District, ViolationKind::NotExists);
    }

    if let Some(kelurahan_id) = draft.kelurahan_id {
        let kelurahan = db
            .execute(Select(By::new(kelurahan_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        match kelurahan {
            None => violations.push(Field::Kelurahan, ViolationKind::NotExists),
            Some(k) if k.district_id != draft.district_id => {
                return Err(tracerr::new!(E::from(
                    ChangeError::KelurahanNotInDistrict {
                        kelurahan_id,
                        district_id: Some(draft.district_id),
                    }
                )));
            }
            Some(_) => {}
        }
    }

    violations
        .into_result()
        .map_err(|v| tracerr::new!(E::from(v)))
}

/// Builds a [`Facility`] out of the provided [`Draft`].
fn facility(
    id: facility::Id,
    draft: Draft,
    created_at: facility::CreationDateTime,
    updated_at: facility::ModificationDateTime,
) -> Facility {
    let Draft {
        slug,
        name,
        facility_type_id,
        is_government_owned,
        is_private_owned,
        pbg_permit,
        capacity,
        employees_count,
        land_area,
        building_area,
        district_id,
        kelurahan_id,
        address,
        description,
        location,
    } = draft;

    Facility {
        id,
        slug,
        name,
        facility_type_id,
        is_government_owned,
        is_private_owned,
        pbg_permit,
        capacity,
        employees_count,
        land_area,
        building_area,
        district_id,
        kelurahan_id,
        address,
        description,
        location,
        created_at,
        updated_at,
    }
}
