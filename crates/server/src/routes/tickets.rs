//! Ticket intake routes.
//!
//! The submission endpoint is public and captcha-gated; everything under
//! `/admin` requires an admin bearer token.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::instrument;

use legal_intake_core::{Email, TicketId, TicketStatus};

use crate::db::tickets::{NewTicket, TicketChanges, TicketRepository};
use crate::error::{AppError, Result};
use crate::middleware::AdminUser;
use crate::models::Ticket;
use crate::state::AppState;

/// Default urgency when the submitter didn't pick one.
const DEFAULT_URGENCY: &str = "Low";

/// Default page size for admin listings.
const DEFAULT_LIST_LIMIT: i64 = 50;

/// Public intake submission.
#[derive(Debug, Deserialize)]
pub struct CreateTicketRequest {
    pub client_name: String,
    pub client_email: String,
    pub client_phone: String,
    pub event_summary: String,
    pub urgency_level: Option<String>,
    pub captcha_token: String,
}

/// Admin listing filters.
#[derive(Debug, Deserialize)]
pub struct ListTicketsQuery {
    pub status: Option<TicketStatus>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Admin partial update.
#[derive(Debug, Deserialize)]
pub struct UpdateTicketRequest {
    pub status: Option<TicketStatus>,
    pub urgency_level: Option<String>,
}

/// Submit a new intake ticket.
///
/// POST /tickets/
///
/// Captcha verification happens before anything touches the database.
/// Email notifications are best effort; the ticket is already persisted
/// when they go out, so delivery failures never fail the request.
#[instrument(skip(state, request))]
pub async fn submit(
    State(state): State<AppState>,
    Json(request): Json<CreateTicketRequest>,
) -> Result<Json<Ticket>> {
    state.captcha().verify(&request.captcha_token).await?;

    let client_name = require_trimmed(&request.client_name, "client_name")?;
    let client_phone = require_trimmed(&request.client_phone, "client_phone")?;
    let event_summary = require_trimmed(&request.event_summary, "event_summary")?;
    let client_email = Email::parse(request.client_email.trim())
        .map_err(|e| AppError::Validation(format!("invalid client_email: {e}")))?;

    let new_ticket = NewTicket {
        client_name,
        client_email,
        client_phone,
        event_summary,
        urgency_level: request
            .urgency_level
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_URGENCY.to_owned()),
    };

    let ticket = TicketRepository::new(state.pool()).create(&new_ticket).await?;

    tracing::info!(ticket_id = %ticket.id, "ticket submitted");

    if let Some(email) = state.email() {
        email.notify_ticket_created(&ticket).await;
    }

    Ok(Json(ticket))
}

/// List tickets, newest first.
///
/// GET /tickets/admin
pub async fn list(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Query(query): Query<ListTicketsQuery>,
) -> Result<Json<Vec<Ticket>>> {
    let (limit, offset) = super::page(query.limit, query.offset, DEFAULT_LIST_LIMIT);
    let tickets = TicketRepository::new(state.pool())
        .list(query.status, limit, offset)
        .await?;

    Ok(Json(tickets))
}

/// Ticket detail.
///
/// GET /tickets/admin/{id}
pub async fn show(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Path(id): Path<TicketId>,
) -> Result<Json<Ticket>> {
    let ticket = TicketRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Ticket not found".to_owned()))?;

    Ok(Json(ticket))
}

/// Partial update of status and urgency.
///
/// PUT /tickets/admin/{id}
#[instrument(skip(state, request), fields(ticket_id = %id))]
pub async fn update(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Path(id): Path<TicketId>,
    Json(request): Json<UpdateTicketRequest>,
) -> Result<Json<Ticket>> {
    let changes = TicketChanges {
        status: request.status,
        urgency_level: request.urgency_level,
    };

    let ticket = TicketRepository::new(state.pool()).update(id, &changes).await?;

    Ok(Json(ticket))
}

/// Delete a ticket.
///
/// DELETE /tickets/admin/{id}
pub async fn remove(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Path(id): Path<TicketId>,
) -> Result<Json<Value>> {
    let deleted = TicketRepository::new(state.pool()).delete(id).await?;
    if !deleted {
        return Err(AppError::NotFound("Ticket not found".to_owned()));
    }

    Ok(Json(json!({ "message": "Ticket deleted successfully" })))
}

/// Reject empty or whitespace-only input, returning the trimmed value.
fn require_trimmed(value: &str, field: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!("{field} must not be empty")));
    }
    Ok(trimmed.to_owned())
}
