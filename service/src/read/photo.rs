//! [`Photo`] definitions.

use crate::domain::{media, Media};
#[cfg(doc)]
use crate::domain::Facility;

/// Condition photo of a [`Facility`].
#[derive(Clone, Debug)]
pub struct Photo {
    /// [`Media`] of this [`Photo`].
    pub media: Media,

    /// Public [`media::Url`] of this [`Photo`].
    pub url: media::Url,
}
