//! Domain definitions.

pub mod district;
pub mod facility;
pub mod facility_type;
pub mod kelurahan;
pub mod location;
pub mod media;
pub mod slug;

pub use self::{
    district::District,
    facility::Facility,
    facility_type::FacilityType,
    kelurahan::Kelurahan,
    location::{Latitude, Location, Longitude},
    media::Media,
    slug::Slug,
};
