//! GraphQL API definitions.

pub mod district;
pub mod facility;
pub mod facility_type;
pub mod form;
pub mod kelurahan;
pub mod map;
mod mutation;
pub mod photo;
mod query;
pub mod scalar;

use juniper::EmptySubscription;

use crate::{define_error, Context};

pub use self::{
    district::District,
    facility::Facility,
    facility_type::FacilityType,
    kelurahan::Kelurahan,
    mutation::Mutation,
    photo::Photo,
    query::Query,
};

/// GraphQL schema.
pub type Schema =
    juniper::RootNode<'static, Query, Mutation, EmptySubscription<Context>>;

/// Creates a new [`Schema`].
#[must_use]
pub fn schema() -> Schema {
    Schema::new(Query, Mutation, EmptySubscription::new())
}

define_error! {
    enum PaginationError {
        #[code = "INVALID_PAGINATION_ARGUMENTS"]
        #[status = BAD_REQUEST]
        #[message = "`page` must be positive and `perPage` must be in \
                     1..=100 range"]
        Invalid,
    }
}
