//! Abstractions for page-number pagination.

/// A page of nodes selected by [`Arguments`].
#[derive(Clone, Debug)]
pub struct Page<I> {
    /// Nodes on this [`Page`].
    pub nodes: Vec<I>,

    /// [`Arguments`] this [`Page`] was selected with.
    pub arguments: Arguments,

    /// Total number of nodes matching the selection on all pages.
    pub total_count: usize,
}

impl<I> Page<I> {
    /// Creates a new [`Page`] from the provided nodes.
    #[must_use]
    pub fn new(
        arguments: Arguments,
        nodes: impl IntoIterator<Item = impl Into<I>>,
        total_count: usize,
    ) -> Self {
        Self {
            nodes: nodes.into_iter().map(Into::into).collect(),
            arguments,
            total_count,
        }
    }

    /// Returns [`PageInfo`] of this [`Page`].
    #[must_use]
    pub fn page_info(&self) -> PageInfo {
        let per_page = self.arguments.per_page();
        let total_pages = self.total_count.div_ceil(per_page);
        let page = self.arguments.page();
        PageInfo {
            page,
            per_page,
            total_pages,
            has_next_page: page < total_pages,
            has_previous_page: page > 1,
        }
    }
}

/// Information about a [`Page`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PageInfo {
    /// 1-based number of the [`Page`].
    pub page: usize,

    /// Maximum number of nodes on a [`Page`].
    pub per_page: usize,

    /// Total number of pages.
    pub total_pages: usize,

    /// Indicator whether there is a next [`Page`].
    pub has_next_page: bool,

    /// Indicator whether there is a previous [`Page`].
    pub has_previous_page: bool,
}

/// Pagination arguments.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Arguments {
    /// 1-based number of the requested page.
    page: usize,

    /// Maximum number of nodes on a page.
    per_page: usize,
}

impl Arguments {
    /// Maximum allowed number of nodes on a page.
    pub const MAX_PER_PAGE: usize = 100;

    /// Creates new [`Arguments`].
    ///
    /// Missing `page` means the first page, missing `per_page` means the
    /// provided `default` one.
    ///
    /// [`None`] is returned if `page` is less than `1`, or `per_page` is not
    /// in `1..=`[`MAX_PER_PAGE`] range.
    ///
    /// [`MAX_PER_PAGE`]: Self::MAX_PER_PAGE
    pub fn new<Num>(
        page: Option<Num>,
        per_page: Option<Num>,
        default: Num,
    ) -> Option<Self>
    where
        Num: TryInto<usize>,
    {
        let page = page.map_or(Some(1), |p| p.try_into().ok())?;
        let per_page = per_page.unwrap_or(default).try_into().ok()?;
        if page < 1 || !(1..=Self::MAX_PER_PAGE).contains(&per_page) {
            return None;
        }
        Some(Self { page, per_page })
    }

    /// Returns 1-based number of the requested page.
    #[must_use]
    pub fn page(&self) -> usize {
        self.page
    }

    /// Returns the maximum number of nodes on a page.
    #[must_use]
    pub fn per_page(&self) -> usize {
        self.per_page
    }

    /// Returns the number of nodes to skip before the requested page.
    #[must_use]
    pub fn offset(&self) -> usize {
        (self.page - 1).saturating_mul(self.per_page)
    }
}

/// Pagination selector.
#[derive(Clone, Debug)]
pub struct Selector<S, F> {
    /// Pagination [`Arguments`].
    pub arguments: Arguments,

    /// Sorting being applied before paginating.
    pub sort: S,

    /// Additional filter being applied to the result.
    pub filter: F,
}

/// Order of sorting.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum Order {
    /// Ascending order.
    #[default]
    Ascending,

    /// Descending order.
    Descending,
}

impl Order {
    #[cfg(feature = "postgres")]
    /// Returns SQL keyword representing this [`Order`].
    #[must_use]
    pub const fn sql(&self) -> &'static str {
        match self {
            Self::Ascending => "ASC",
            Self::Descending => "DESC",
        }
    }
}

/// Defines pagination types.
#[expect(clippy::module_name_repetitions, reason = "more readable")]
#[macro_export]
macro_rules! define_pagination {
    ($node:ty, $sort:ty, $filter:ty) => {
        #[doc = "A [`Page`] of [`Node`]s."]
        pub type Page = $crate::pagination::Page<$node>;

        #[doc = "An information about a [`Page`]."]
        pub type PageInfo = $crate::pagination::PageInfo;

        #[doc = "Arguments for selecting a [`Page`]."]
        pub type Arguments = $crate::pagination::Arguments;

        #[doc = "[`Page`] selector."]
        pub type Selector = $crate::pagination::Selector<$sort, $filter>;
    };
}
