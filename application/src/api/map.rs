//! Map-related definitions.

use derive_more::{AsRef, Display, From, Into};
use juniper::{GraphQLInputObject, GraphQLObject, GraphQLScalar};
use service::domain;

use crate::{api::scalar, config, AsError as _, Error};

/// Geographic point on a map.
#[derive(Clone, Debug, GraphQLObject)]
pub struct Location {
    /// `Latitude` of this `Location`.
    pub latitude: Latitude,

    /// `Longitude` of this `Location`.
    pub longitude: Longitude,
}

impl From<domain::Location> for Location {
    fn from(location: domain::Location) -> Self {
        Self {
            latitude: location.latitude.into(),
            longitude: location.longitude.into(),
        }
    }
}

/// Geographic point on a map.
#[derive(Clone, Debug, GraphQLInputObject)]
pub struct LocationInput {
    /// `Latitude` of this `Location`.
    pub latitude: Latitude,

    /// `Longitude` of this `Location`.
    pub longitude: Longitude,
}

impl From<LocationInput> for domain::Location {
    fn from(input: LocationInput) -> Self {
        Self {
            latitude: input.latitude.into(),
            longitude: input.longitude.into(),
        }
    }
}

/// Latitude in decimal degrees, within `-90..=90` range.
#[derive(AsRef, Clone, Copy, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(with = scalar::Via::<domain::Latitude>)]
pub struct Latitude(domain::Latitude);

/// Longitude in decimal degrees, within `-180..=180` range.
#[derive(AsRef, Clone, Copy, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(with = scalar::Via::<domain::Longitude>)]
pub struct Longitude(domain::Longitude);

/// Configuration of the map widget picking a `Facility` location.
#[derive(Clone, Debug, GraphQLObject)]
pub struct MapConfig {
    /// Latitude of the default map center.
    pub latitude: f64,

    /// Longitude of the default map center.
    pub longitude: f64,

    /// Default zoom level.
    pub zoom: i32,

    /// Indicator whether the marker can be dragged.
    pub is_marker_draggable: bool,

    /// Indicator whether the drawing and editing tools are enabled.
    pub is_drawing_enabled: bool,

    /// Interval of refreshing the live location of the user, in
    /// milliseconds.
    pub live_location_interval_ms: i32,

    /// URL template of the map tiles, with `{z}`, `{x}` and `{y}`
    /// placeholders.
    pub tiles_url: String,
}

impl TryFrom<&config::Map> for MapConfig {
    type Error = Error;

    fn try_from(map: &config::Map) -> Result<Self, Self::Error> {
        Ok(Self {
            latitude: map.latitude,
            longitude: map.longitude,
            zoom: map.zoom.into(),
            is_marker_draggable: true,
            is_drawing_enabled: true,
            live_location_interval_ms: i32::try_from(
                map.live_location_interval.as_millis(),
            )
            .map_err(|e| e.into_error())?,
            tiles_url: map.tiles_url.clone(),
        })
    }
}
