//! [`Facility`]-related read definitions.

#[cfg(doc)]
use crate::domain::Facility;

pub mod list {
    //! [`Facility`] list definitions.

    use common::{define_pagination, pagination::Order};
    use strum::{Display, EnumString};

    use crate::{
        domain::{district, facility},
        read::Search,
    };
    #[cfg(doc)]
    use crate::domain::{District, Facility, FacilityType};

    define_pagination!(Node, Sort, Filter);

    /// Node in a [`Page`].
    pub type Node = facility::Id;

    /// Column of the [`Facility`] list.
    #[derive(
        Clone,
        Copy,
        Debug,
        Default,
        Display,
        EnumString,
        Eq,
        Hash,
        PartialEq,
    )]
    #[strum(serialize_all = "snake_case")]
    pub enum Column {
        /// Name of a [`Facility`].
        #[default]
        Name,

        /// Name of the [`District`] of a [`Facility`].
        District,

        /// Address of a [`Facility`].
        Address,

        /// Name of the [`FacilityType`] of a [`Facility`].
        FacilityType,

        /// Government ownership flag of a [`Facility`].
        IsGovernmentOwned,

        /// Private ownership flag of a [`Facility`].
        IsPrivateOwned,

        /// Capacity of a [`Facility`].
        Capacity,

        /// Number of employees of a [`Facility`].
        EmployeesCount,

        /// Land area amount of a [`Facility`].
        LandArea,

        /// Land area unit of a [`Facility`].
        LandAreaUnit,

        /// Building area amount of a [`Facility`].
        BuildingArea,

        /// Building area unit of a [`Facility`].
        BuildingAreaUnit,
    }

    impl Column {
        /// All the [`Column`]s, in display order.
        pub const ALL: [Self; 12] = [
            Self::Name,
            Self::District,
            Self::Address,
            Self::FacilityType,
            Self::IsGovernmentOwned,
            Self::IsPrivateOwned,
            Self::Capacity,
            Self::EmployeesCount,
            Self::LandArea,
            Self::LandAreaUnit,
            Self::BuildingArea,
            Self::BuildingAreaUnit,
        ];

        /// Indicates whether this [`Column`] can be searched in.
        ///
        /// Boolean [`Column`]s are sortable only.
        #[must_use]
        pub const fn is_searchable(self) -> bool {
            !matches!(self, Self::IsGovernmentOwned | Self::IsPrivateOwned)
        }
    }

    /// Sorting of the [`Facility`] list.
    ///
    /// Ties are always broken by [`facility::Id`].
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    pub struct Sort {
        /// [`Column`] to sort by.
        pub column: Column,

        /// [`Order`] of sorting.
        pub order: Order,
    }

    /// [`Search`] in a single [`Column`].
    #[derive(Clone, Debug, Eq, PartialEq)]
    pub struct ColumnSearch {
        /// Searchable [`Column`].
        column: Column,

        /// [`Search`] query.
        query: Search,
    }

    impl ColumnSearch {
        /// Creates a new [`ColumnSearch`].
        ///
        /// [`None`] is returned if the [`Column`] is not searchable.
        #[must_use]
        pub fn new(column: Column, query: Search) -> Option<Self> {
            column.is_searchable().then_some(Self { column, query })
        }

        /// Returns the searched [`Column`].
        #[must_use]
        pub fn column(&self) -> Column {
            self.column
        }

        /// Returns the [`Search`] query.
        #[must_use]
        pub fn query(&self) -> &Search {
            &self.query
        }
    }

    /// Filter for [`Selector`].
    #[derive(Clone, Debug, Default)]
    pub struct Filter {
        /// Global [`Search`] matching if any searchable [`Column`] matches.
        pub search: Option<Search>,

        /// [`ColumnSearch`]es, all of which must match.
        pub columns: Vec<ColumnSearch>,

        /// ID of the [`District`] to list [`Facility`]s of.
        pub district_id: Option<district::Id>,
    }

    #[cfg(test)]
    mod spec {
        use super::{Column, ColumnSearch};
        use crate::read::Search;

        #[test]
        fn booleans_are_not_searchable() {
            let q = Search::new("ya").unwrap();

            assert!(ColumnSearch::new(Column::IsGovernmentOwned, q.clone())
                .is_none());
            assert!(
                ColumnSearch::new(Column::IsPrivateOwned, q.clone()).is_none()
            );
            assert!(ColumnSearch::new(Column::Capacity, q).is_some());
            assert_eq!(
                Column::ALL.iter().filter(|c| c.is_searchable()).count(),
                10,
            );
        }
    }
}
