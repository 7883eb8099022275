//! Pickup channel/location selection state machine.
//!
//! The customer first picks a channel (own stores vs. third-party collection
//! points), then a specific location within it. Collection points are ranked
//! by proximity when the browser shares coordinates; stores are never
//! geo-ranked. The whole state lives in the session and is thrown away after
//! checkout - it is only ever persisted as part of an order.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use silkroots_core::{Coordinates, PickupChannel, PickupLocation};

use crate::geo;

/// How many collection points to offer when geo-ranking.
pub const NEARBY_LIMIT: usize = 3;

/// The two static location lists, loaded once at startup.
#[derive(Debug, Clone, Deserialize)]
pub struct PickupDirectory {
    stores: Vec<PickupLocation>,
    collection_points: Vec<PickupLocation>,
}

/// Error loading the pickup reference data.
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("invalid pickup directory JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("pickup directory has an empty {0} list")]
    EmptyList(&'static str),
}

impl PickupDirectory {
    /// Parse the directory from its JSON configuration document.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or either list is empty.
    pub fn from_json(json: &str) -> Result<Self, DirectoryError> {
        let directory: Self = serde_json::from_str(json)?;
        if directory.stores.is_empty() {
            return Err(DirectoryError::EmptyList("stores"));
        }
        if directory.collection_points.is_empty() {
            return Err(DirectoryError::EmptyList("collection_points"));
        }
        Ok(directory)
    }

    /// Load the directory bundled with the binary.
    ///
    /// # Errors
    ///
    /// Returns an error if the bundled document fails validation.
    pub fn load_bundled() -> Result<Self, DirectoryError> {
        Self::from_json(include_str!("../data/pickup_locations.json"))
    }

    /// The full store list.
    #[must_use]
    pub fn stores(&self) -> &[PickupLocation] {
        &self.stores
    }

    /// The full collection-point list.
    #[must_use]
    pub fn collection_points(&self) -> &[PickupLocation] {
        &self.collection_points
    }

    /// Look up a location by ID within a channel.
    #[must_use]
    pub fn find(&self, channel: PickupChannel, id: &str) -> Option<&PickupLocation> {
        let list = match channel {
            PickupChannel::Stores => &self.stores,
            PickupChannel::CollectionPoint => &self.collection_points,
        };
        list.iter().find(|location| location.id.as_str() == id)
    }
}

/// Progress of the one-shot browser geolocation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GeoStatus {
    #[default]
    Idle,
    Requesting,
    Granted,
    Denied,
}

/// The customer's pickup selection state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PickupSelection {
    pub channel: PickupChannel,
    pub location: Option<PickupLocation>,
    pub user_coordinates: Option<Coordinates>,
    pub geo_status: GeoStatus,
    /// Bumped on every geolocation request; results carrying a stale
    /// generation are dropped instead of overwriting newer state.
    geo_generation: u64,
}

impl Default for PickupSelection {
    fn default() -> Self {
        Self {
            channel: PickupChannel::Stores,
            location: None,
            user_coordinates: None,
            geo_status: GeoStatus::Idle,
            geo_generation: 0,
        }
    }
}

impl PickupSelection {
    /// Switch pickup channel.
    ///
    /// Always clears the selected location (forcing re-selection) but keeps
    /// any coordinates already acquired. Entering the collection-point
    /// channel with no coordinates and an idle geo request returns the
    /// generation token for a fresh one-shot location request; the caller
    /// passes it back via [`Self::geo_granted`] / [`Self::geo_denied`].
    pub fn select_channel(&mut self, channel: PickupChannel) -> Option<u64> {
        self.channel = channel;
        self.location = None;

        if channel == PickupChannel::CollectionPoint
            && self.user_coordinates.is_none()
            && self.geo_status == GeoStatus::Idle
        {
            self.geo_status = GeoStatus::Requesting;
            self.geo_generation += 1;
            return Some(self.geo_generation);
        }
        None
    }

    /// Apply a successful geolocation result.
    ///
    /// Ignored when `generation` is stale - the customer already moved on
    /// and a late callback must not overwrite what they are looking at now.
    pub fn geo_granted(&mut self, coordinates: Coordinates, generation: u64) {
        if generation != self.geo_generation || self.geo_status != GeoStatus::Requesting {
            tracing::debug!(generation, "ignoring stale geolocation result");
            return;
        }
        self.user_coordinates = Some(coordinates);
        self.geo_status = GeoStatus::Granted;
    }

    /// Apply a geolocation failure (denied permission or no capability).
    ///
    /// The candidate list then falls back to the full unranked set.
    pub fn geo_denied(&mut self, generation: u64) {
        if generation != self.geo_generation || self.geo_status != GeoStatus::Requesting {
            tracing::debug!(generation, "ignoring stale geolocation denial");
            return;
        }
        self.geo_status = GeoStatus::Denied;
    }

    /// Select a specific location.
    ///
    /// Captures whatever `distance_km` was attached at selection time; it is
    /// display data and is not re-validated later.
    pub fn select_location(&mut self, location: PickupLocation) {
        self.location = Some(location);
    }

    /// The candidate locations for the current channel.
    ///
    /// Stores are always the full static list. Collection points are the
    /// nearest [`NEARBY_LIMIT`] when coordinates are known, otherwise the
    /// full unranked set.
    #[must_use]
    pub fn candidates(&self, directory: &PickupDirectory) -> Vec<PickupLocation> {
        match self.channel {
            PickupChannel::Stores => directory.stores().to_vec(),
            PickupChannel::CollectionPoint => geo::rank(
                self.user_coordinates,
                directory.collection_points(),
                NEARBY_LIMIT,
            ),
        }
    }

    /// Reset to the initial state (after a completed checkout).
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
