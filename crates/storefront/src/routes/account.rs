//! Account route handlers.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use tracing::instrument;

use silkroots_core::OrderSummary;

use crate::db::OrderStore as _;
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Order history query parameters.
#[derive(Debug, Deserialize)]
pub struct OrdersQuery {
    pub email: String,
}

/// Order history for a customer.
///
/// Both card-path and crypto-path records come back normalized through
/// [`OrderSummary`], so the account screen renders one shape.
#[instrument(skip(state, query), fields(email = %query.email))]
pub async fn orders(
    State(state): State<AppState>,
    Query(query): Query<OrdersQuery>,
) -> Result<Json<Vec<OrderSummary>>> {
    if query.email.is_empty() {
        return Err(AppError::BadRequest("missing email".to_owned()));
    }

    let records = state.orders().list_by_email(&query.email).await?;
    let summaries = records.iter().map(|record| record.summarize()).collect();
    Ok(Json(summaries))
}
