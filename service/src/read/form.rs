//! Form-related read definitions.

use crate::{
    domain::{District, FacilityType, Kelurahan},
    form::{Field, State},
};

/// Options to choose from in a form [`State`].
#[derive(Clone, Debug, Default)]
pub struct Options {
    /// [`FacilityType`]s ordered by name.
    pub facility_types: Vec<FacilityType>,

    /// [`District`]s ordered by name.
    pub districts: Vec<District>,

    /// [`Kelurahan`]s of the selected [`District`] ordered by name.
    ///
    /// Empty if no [`District`] is selected.
    pub kelurahans: Vec<Kelurahan>,

    /// Indicator whether the [`Kelurahan`] selector is disabled.
    pub is_kelurahan_disabled: bool,
}

/// Result of applying a change to a form [`State`].
#[derive(Clone, Debug)]
pub struct Applied {
    /// New [`State`].
    pub state: State,

    /// [`Field`]s changed, in the order they were changed.
    pub changed: Vec<Field>,
}
