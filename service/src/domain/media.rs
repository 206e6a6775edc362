//! [`Media`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, unit, DateTimeOf};
use derive_more::{AsRef, Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::facility;
#[cfg(doc)]
use super::Facility;

/// File attached to a [`Facility`].
#[derive(Clone, Debug)]
pub struct Media {
    /// ID of this [`Media`].
    pub id: Id,

    /// ID of the [`Facility`] this [`Media`] is attached to.
    pub facility_id: facility::Id,

    /// [`Collection`] this [`Media`] belongs to.
    pub collection: Collection,

    /// [`FileName`] of this [`Media`].
    pub file_name: FileName,

    /// [`MimeType`] of this [`Media`].
    pub mime_type: MimeType,

    /// Size of this [`Media`] in bytes.
    pub size: Size,

    /// Display position of this [`Media`] in its [`Collection`].
    pub order: Order,

    /// [`DateTime`] when this [`Media`] was created.
    pub created_at: CreationDateTime,
}

impl Media {
    /// Returns the storage [`Path`] of this [`Media`].
    #[must_use]
    pub fn path(&self) -> Path {
        Path::new(self.facility_id, self.collection, self.id, &self.file_name)
    }
}

/// ID of a [`Media`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    PartialEq,
    Serialize,
)]
#[cfg_attr(feature = "postgres", derive(ToSql, FromSql), postgres(transparent))]
pub struct Id(Uuid);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

define_kind! {
    #[doc = "Named group of [`Media`] attached to a [`Facility`]."]
    enum Collection {
        #[doc = "Photos of the building condition."]
        #[value = "files"]
        Files,
    }
}

impl Collection {
    /// Returns the maximum number of [`Media`] in this [`Collection`] of a
    /// single [`Facility`].
    #[must_use]
    pub const fn max_len(self) -> usize {
        match self {
            Self::Files => 5,
        }
    }
}

/// Name of a [`Media`] file.
///
/// Never contains path separators, so it's safe to be used as a path segment.
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[as_ref(str)]
pub struct FileName(String);

impl FileName {
    /// Maximum length of a [`FileName`] in bytes.
    const MAX_LEN: usize = 255;

    /// Creates a new [`FileName`] if the given `name` is valid.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        Self::check(&name).then_some(Self(name))
    }

    /// Sanitizes the provided client-side file name into a [`FileName`].
    ///
    /// Any leading directories are dropped, and every character unsafe for a
    /// path segment is replaced with `-`.
    ///
    /// [`None`] is returned if nothing meaningful is left.
    #[must_use]
    pub fn sanitize(raw: &str) -> Option<Self> {
        let base = raw.rsplit(['/', '\\']).next().unwrap_or(raw).trim();
        let mut name: String = base
            .chars()
            .map(|c| {
                if c.is_alphanumeric() || matches!(c, '.' | '-' | '_') {
                    c
                } else {
                    '-'
                }
            })
            .collect();
        let trimmed = name.trim_start_matches('.').len();
        name.replace_range(..name.len() - trimmed, "");

        if name.len() > Self::MAX_LEN {
            let mut end = Self::MAX_LEN;
            while !name.is_char_boundary(end) {
                end -= 1;
            }
            name.truncate(end);
        }

        Self::new(name)
    }

    /// Checks whether the given `name` is a valid [`FileName`].
    fn check(name: impl AsRef<str>) -> bool {
        let name = name.as_ref();
        !name.is_empty()
            && name.len() <= Self::MAX_LEN
            && !name.starts_with('.')
            && !name.chars().any(|c| matches!(c, '/' | '\\') || c.is_control())
    }
}

impl FromStr for FileName {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `FileName`")
    }
}

/// [MIME type] of a [`Media`] file.
///
/// [MIME type]: https://developer.mozilla.org/docs/Web/HTTP/MIME_types
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[as_ref(str)]
pub struct MimeType(String);

impl MimeType {
    /// Creates a new [`MimeType`] if the given `mime` is a valid
    /// `type/subtype` pair.
    #[must_use]
    pub fn new(mime: impl AsRef<str>) -> Option<Self> {
        let mime = mime.as_ref().trim().to_ascii_lowercase();
        let essence = mime.split(';').next().unwrap_or_default().trim();
        let (ty, subtype) = essence.split_once('/')?;
        let is_token = |s: &str| {
            !s.is_empty()
                && s.chars().all(|c| {
                    c.is_ascii_alphanumeric() || "!#$&-^_.+".contains(c)
                })
        };
        (is_token(ty) && is_token(subtype)).then(|| Self(essence.to_owned()))
    }

    /// Indicates whether this [`MimeType`] describes an image.
    #[must_use]
    pub fn is_image(&self) -> bool {
        self.0.starts_with("image/")
    }
}

impl FromStr for MimeType {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `MimeType`")
    }
}

/// Size of a [`Media`] file in bytes.
pub type Size = u32;

/// Display position of a [`Media`] in its [`Collection`], starting from `0`.
pub type Order = u16;

/// Path of a [`Media`] file relative to a storage root.
///
/// Has the `{facility_id}/{collection}/{media_id}/{file_name}` form.
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[as_ref(str)]
pub struct Path(String);

impl Path {
    /// Creates a new [`Path`] of a [`Media`] file.
    #[must_use]
    pub fn new(
        facility_id: facility::Id,
        collection: Collection,
        id: Id,
        file_name: &FileName,
    ) -> Self {
        Self(format!("{facility_id}/{collection}/{id}/{file_name}"))
    }

    /// Returns the segments of this [`Path`].
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/')
    }
}

/// Public URL of a [`Media`] file.
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[as_ref(str)]
pub struct Url(String);

impl Url {
    /// Creates a new [`Url`] by joining the provided `base` URL and [`Path`].
    #[must_use]
    pub fn join(base: &str, path: &Path) -> Self {
        Self(format!("{}/{path}", base.trim_end_matches('/')))
    }
}

/// [`DateTime`] when a [`Media`] was created.
pub type CreationDateTime = DateTimeOf<(Media, unit::Creation)>;
