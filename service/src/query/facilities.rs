//! [`Query`] collection related to the multiple [`Facility`]s.

use std::collections::HashMap;

use common::operations::By;

use crate::{
    domain::{facility, Facility},
    read,
};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries a page of the [`Facility`] list.
pub type List = DatabaseQuery<
    By<read::facility::list::Page, read::facility::list::Selector>,
>;

/// Queries [`Facility`]s by their [`facility::Id`]s.
///
/// Non-existent [`Facility`]s are omitted.
pub type ByIds =
    DatabaseQuery<By<HashMap<facility::Id, Facility>, Vec<facility::Id>>>;

#[cfg(test)]
mod spec {
    use common::{pagination::Order, Handler as _};

    use crate::{
        domain::facility,
        read::{
            facility::list::{
                Arguments, Column, ColumnSearch, Filter, Selector, Sort,
            },
            Search,
        },
        test_support::{facility, seed, service, TestService},
        SlugUniqueness,
    };

    use super::{ByIds, List};

    async fn list(
        svc: &TestService,
        sort: Sort,
        filter: Filter,
        per_page: usize,
    ) -> (Vec<facility::Id>, usize) {
        let page = svc
            .execute(List::by(Selector {
                arguments: Arguments::new(None, Some(per_page), 10).unwrap(),
                sort,
                filter,
            }))
            .await
            .unwrap();
        (page.nodes, page.total_count)
    }

    #[tokio::test]
    async fn searches_name_regardless_of_sort() {
        let svc = service(SlugUniqueness::default());
        let refs = seed(&svc);
        let a = facility(&svc, &refs, "Stadion Benteng");
        let b = facility(&svc, &refs, "GOR Bulutangkis");
        let c = facility(&svc, &refs, "Kolam Renang Benteng");

        let name = |q: &str| Filter {
            columns: vec![ColumnSearch::new(
                Column::Name,
                Search::new(q).unwrap(),
            )
            .unwrap()],
            ..Filter::default()
        };

        for column in Column::ALL {
            for order in [Order::Ascending, Order::Descending] {
                let (mut found, total) =
                    list(&svc, Sort { column, order }, name("bENTENG"), 10)
                        .await;
                found.sort_unstable();

                let mut expected = vec![a.id, c.id];
                expected.sort_unstable();
                assert_eq!(found, expected, "sorted by {column} {order:?}");
                assert_eq!(total, 2);
            }
        }

        let (found, _) = list(&svc, Sort::default(), name("gor"), 10).await;
        assert_eq!(found, [b.id]);
    }

    #[tokio::test]
    async fn sorts_by_name_by_default() {
        let svc = service(SlugUniqueness::default());
        let refs = seed(&svc);
        let a = facility(&svc, &refs, "Stadion Benteng");
        let b = facility(&svc, &refs, "GOR Bulutangkis");
        let c = facility(&svc, &refs, "Kolam Renang");

        let (found, _) =
            list(&svc, Sort::default(), Filter::default(), 10).await;
        assert_eq!(found, [b.id, c.id, a.id]);

        let (found, _) = list(
            &svc,
            Sort {
                column: Column::Name,
                order: Order::Descending,
            },
            Filter::default(),
            10,
        )
        .await;
        assert_eq!(found, [a.id, c.id, b.id]);
    }

    #[tokio::test]
    async fn orders_absent_numbers_last_and_text_regardless_of_case() {
        let svc = service(SlugUniqueness::default());
        let refs = seed(&svc);
        let a = facility(&svc, &refs, "arena");
        let b = facility(&svc, &refs, "Balai");
        let mut c = facility(&svc, &refs, "Center");
        c.capacity = Some(300);
        _ = svc.database().data().facilities.insert(c.id, c.clone());

        let (found, _) =
            list(&svc, Sort::default(), Filter::default(), 10).await;
        assert_eq!(found, [a.id, b.id, c.id]);

        let (found, _) = list(
            &svc,
            Sort {
                column: Column::Capacity,
                order: Order::Ascending,
            },
            Filter::default(),
            10,
        )
        .await;
        assert_eq!(found[0], c.id);

        let (found, _) = list(
            &svc,
            Sort {
                column: Column::Capacity,
                order: Order::Descending,
            },
            Filter::default(),
            10,
        )
        .await;
        assert_eq!(found[2], c.id);
    }

    #[tokio::test]
    async fn filters_by_district_and_paginates() {
        let svc = service(SlugUniqueness::default());
        let refs = seed(&svc);
        let a = facility(&svc, &refs, "Stadion A");
        let b = facility(&svc, &refs, "Stadion B");
        let mut other = facility(&svc, &refs, "Stadion C");
        other.district_id = refs.d2.id;
        _ = svc
            .database()
            .data()
            .facilities
            .insert(other.id, other.clone());

        let in_d1 = Filter {
            district_id: Some(refs.d1.id),
            ..Filter::default()
        };
        let (found, total) = list(&svc, Sort::default(), in_d1, 1).await;
        assert_eq!(found, [a.id]);
        assert_eq!(total, 2);

        let in_d2 = Filter {
            district_id: Some(refs.d2.id),
            ..Filter::default()
        };
        let (found, total) = list(&svc, Sort::default(), in_d2, 10).await;
        assert_eq!(found, [other.id]);
        assert_eq!(total, 1);

        let everywhere = Filter {
            search: Search::new("karawaci"),
            ..Filter::default()
        };
        let (found, _) = list(&svc, Sort::default(), everywhere, 10).await;
        assert_eq!(found, [other.id]);

        let by_ids = svc
            .execute(ByIds::by(vec![b.id, facility::Id::new()]))
            .await
            .unwrap();
        assert_eq!(by_ids.len(), 1);
        assert!(by_ids.contains_key(&b.id));
    }
}
