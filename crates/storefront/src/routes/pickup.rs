//! Pickup selection route handlers.
//!
//! Thin HTTP wrappers over the [`PickupSelection`] state machine held in the
//! session. The browser drives the geolocation one-shot: switching into the
//! collection-point channel may return a `geo_generation` token, the client
//! asks the device for coordinates, and posts the result (or denial) back
//! with that token so late responses can be recognized as stale.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use silkroots_core::{Coordinates, PickupChannel, PickupLocation};

use crate::error::{AppError, Result};
use crate::models::session_keys;
use crate::pickup::{GeoStatus, PickupSelection};
use crate::routes::{session_load, session_store};
use crate::state::AppState;

/// Selection state and candidate list as shown to the customer.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionView {
    pub channel: PickupChannel,
    pub location: Option<PickupLocation>,
    pub geo_status: GeoStatus,
    pub candidates: Vec<PickupLocation>,
}

fn view(state: &AppState, selection: &PickupSelection) -> SelectionView {
    SelectionView {
        channel: selection.channel,
        location: selection.location.clone(),
        geo_status: selection.geo_status,
        candidates: selection.candidates(state.pickup_directory()),
    }
}

/// Current selection and candidates.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Result<Json<SelectionView>> {
    let selection: PickupSelection =
        session_load(&session, session_keys::PICKUP_SELECTION).await?;
    Ok(Json(view(&state, &selection)))
}

/// Channel switch request body.
#[derive(Debug, Deserialize)]
pub struct ChannelBody {
    pub channel: PickupChannel,
}

/// Response to a channel switch.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelResponse {
    /// Set when the client should fire a one-shot geolocation request and
    /// report back with this token.
    pub geo_generation: Option<u64>,
    #[serde(flatten)]
    pub selection: SelectionView,
}

/// Switch pickup channel. Always clears the selected location.
#[instrument(skip(state, session))]
pub async fn select_channel(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<ChannelBody>,
) -> Result<Json<ChannelResponse>> {
    let mut selection: PickupSelection =
        session_load(&session, session_keys::PICKUP_SELECTION).await?;
    let geo_generation = selection.select_channel(body.channel);
    session_store(&session, session_keys::PICKUP_SELECTION, &selection).await?;
    Ok(Json(ChannelResponse {
        geo_generation,
        selection: view(&state, &selection),
    }))
}

/// Geolocation result body.
#[derive(Debug, Deserialize)]
pub struct GeolocationBody {
    pub latitude: f64,
    pub longitude: f64,
    pub generation: u64,
}

/// Apply a granted browser geolocation result.
#[instrument(skip(state, session, body), fields(generation = body.generation))]
pub async fn geolocation_granted(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<GeolocationBody>,
) -> Result<Json<SelectionView>> {
    let mut selection: PickupSelection =
        session_load(&session, session_keys::PICKUP_SELECTION).await?;
    selection.geo_granted(
        Coordinates::new(body.latitude, body.longitude),
        body.generation,
    );
    session_store(&session, session_keys::PICKUP_SELECTION, &selection).await?;
    Ok(Json(view(&state, &selection)))
}

/// Geolocation denial body.
#[derive(Debug, Deserialize)]
pub struct GeolocationDeniedBody {
    pub generation: u64,
}

/// Apply a browser geolocation denial (or missing capability).
#[instrument(skip(state, session))]
pub async fn geolocation_denied(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<GeolocationDeniedBody>,
) -> Result<Json<SelectionView>> {
    let mut selection: PickupSelection =
        session_load(&session, session_keys::PICKUP_SELECTION).await?;
    selection.geo_denied(body.generation);
    session_store(&session, session_keys::PICKUP_SELECTION, &selection).await?;
    Ok(Json(view(&state, &selection)))
}

/// Location selection body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectLocationBody {
    pub location_id: String,
}

/// Select a specific pickup location from the current candidate list.
///
/// Selecting from the candidates (not the raw directory) captures the
/// `distance_km` that was on display at selection time.
#[instrument(skip(state, session))]
pub async fn select_location(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<SelectLocationBody>,
) -> Result<Json<SelectionView>> {
    let mut selection: PickupSelection =
        session_load(&session, session_keys::PICKUP_SELECTION).await?;

    let location = selection
        .candidates(state.pickup_directory())
        .into_iter()
        .find(|candidate| candidate.id.as_str() == body.location_id)
        .ok_or_else(|| AppError::NotFound(format!("pickup location {}", body.location_id)))?;

    selection.select_location(location);
    session_store(&session, session_keys::PICKUP_SELECTION, &selection).await?;
    Ok(Json(view(&state, &selection)))
}
