use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post, put},
};
use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    db::dao::EventFilters,
    db::entities::{event, feedback, registration},
    error::AppError,
    middleware::CurrentUser,
    response::{ApiResult, JsonApiResponse},
    services::{EventPatch, FeedbackOutcome, NewEvent},
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct CreateEventRequest {
    title: String,
    description: Option<String>,
    date: NaiveDate,
    location: String,
    category: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateEventRequest {
    title: Option<String>,
    description: Option<String>,
    date: Option<NaiveDate>,
    location: Option<String>,
    category: Option<String>,
}

/// Unrecognized query keys are ignored rather than rejected.
#[derive(Debug, Deserialize)]
pub struct ListEventsQuery {
    category: Option<String>,
    location: Option<String>,
    sort: Option<String>,
    direction: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FeedbackRequest {
    body: String,
}

#[derive(Debug, Serialize)]
pub struct EventResponse {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub date: NaiveDate,
    pub location: String,
    pub category: Option<String>,
    pub organizer_id: Uuid,
    pub created_at: DateTime<FixedOffset>,
}

impl From<event::Model> for EventResponse {
    fn from(model: event::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            description: model.description,
            date: model.date,
            location: model.location,
            category: model.category,
            organizer_id: model.organizer_id,
            created_at: model.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RegistrationResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub event_id: Uuid,
    pub created_at: DateTime<FixedOffset>,
}

impl From<registration::Model> for RegistrationResponse {
    fn from(model: registration::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            event_id: model.event_id,
            created_at: model.created_at,
        }
    }
}

/// One attended event; `event` is absent if it was deleted after the fact.
#[derive(Debug, Serialize)]
pub struct HistoryEntry {
    pub registered_at: DateTime<FixedOffset>,
    pub event: Option<EventResponse>,
}

#[derive(Debug, Serialize)]
pub struct FeedbackResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub event_id: Uuid,
    pub body: String,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

impl From<feedback::Model> for FeedbackResponse {
    fn from(model: feedback::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            event_id: model.event_id,
            body: model.body,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/events", post(create_event).get(list_events))
        .route("/events/page/{page_number}", get(page_events))
        .route("/events/history", get(history))
        .route("/events/{event_id}", put(update_event).delete(delete_event))
        .route("/events/{event_id}/register", post(register_for_event))
        .route("/events/delete/{event_id}", delete(unregister_from_event))
        .route("/events/{event_id}/feedback", post(submit_feedback))
        .with_state(state)
}

async fn create_event(
    State(state): State<Arc<AppState>>,
    requester: CurrentUser,
    Json(body): Json<CreateEventRequest>,
) -> ApiResult<EventResponse> {
    let created = state
        .services
        .events
        .create_event(
            &requester.id,
            &requester.role,
            NewEvent {
                title: body.title,
                description: body.description,
                date: body.date,
                location: body.location,
                category: body.category,
            },
        )
        .await?;
    JsonApiResponse::with_status(StatusCode::CREATED, "Event created", created.into())
}

async fn list_events(
    State(state): State<Arc<AppState>>,
    _requester: CurrentUser,
    Query(query): Query<ListEventsQuery>,
) -> ApiResult<Vec<EventResponse>> {
    let events = state
        .services
        .events
        .list_events(
            EventFilters {
                category: query.category,
                location: query.location,
            },
            query.sort.as_deref(),
            query.direction.as_deref(),
        )
        .await?;
    JsonApiResponse::ok(events.into_iter().map(EventResponse::from).collect())
}

async fn page_events(
    State(state): State<Arc<AppState>>,
    _requester: CurrentUser,
    Path(page_number): Path<String>,
) -> ApiResult<Vec<EventResponse>> {
    let page: u64 = page_number
        .parse()
        .ok()
        .filter(|page| *page > 0)
        .ok_or_else(|| AppError::bad_request("Invalid page number"))?;

    let events = state.services.events.page_events(page).await?;
    JsonApiResponse::ok(events.into_iter().map(EventResponse::from).collect())
}

async fn update_event(
    State(state): State<Arc<AppState>>,
    requester: CurrentUser,
    Path(event_id): Path<Uuid>,
    Json(body): Json<UpdateEventRequest>,
) -> ApiResult<EventResponse> {
    let updated = state
        .services
        .events
        .update_event(
            &requester.id,
            &requester.role,
            &event_id,
            EventPatch {
                title: body.title,
                description: body.description,
                date: body.date,
                location: body.location,
                category: body.category,
            },
        )
        .await?;
    JsonApiResponse::with_status(StatusCode::OK, "Event updated", updated.into())
}

async fn delete_event(
    State(state): State<Arc<AppState>>,
    requester: CurrentUser,
    Path(event_id): Path<Uuid>,
) -> ApiResult<serde_json::Value> {
    state
        .services
        .events
        .delete_event(&requester.id, &requester.role, &event_id)
        .await?;
    JsonApiResponse::with_status(StatusCode::OK, "Event deleted", serde_json::Value::Null)
}

async fn register_for_event(
    State(state): State<Arc<AppState>>,
    requester: CurrentUser,
    Path(event_id): Path<Uuid>,
) -> ApiResult<RegistrationResponse> {
    let registration = state
        .services
        .registrations
        .register(&requester.id, &event_id)
        .await?;
    JsonApiResponse::with_status(
        StatusCode::CREATED,
        "Registered for event",
        registration.into(),
    )
}

async fn unregister_from_event(
    State(state): State<Arc<AppState>>,
    requester: CurrentUser,
    Path(event_id): Path<Uuid>,
) -> ApiResult<serde_json::Value> {
    state
        .services
        .registrations
        .unregister(&requester.id, &event_id)
        .await?;
    JsonApiResponse::with_status(
        StatusCode::OK,
        "Unregistered from event",
        serde_json::Value::Null,
    )
}

async fn history(
    State(state): State<Arc<AppState>>,
    requester: CurrentUser,
) -> ApiResult<Vec<HistoryEntry>> {
    let entries = state
        .services
        .registrations
        .history(&requester.id, &requester.role)
        .await?;
    JsonApiResponse::ok(
        entries
            .into_iter()
            .map(|(registration, event)| HistoryEntry {
                registered_at: registration.created_at,
                event: event.map(EventResponse::from),
            })
            .collect(),
    )
}

async fn submit_feedback(
    State(state): State<Arc<AppState>>,
    requester: CurrentUser,
    Path(event_id): Path<Uuid>,
    Json(body): Json<FeedbackRequest>,
) -> ApiResult<FeedbackResponse> {
    let outcome = state
        .services
        .registrations
        .submit_feedback(&requester.id, &event_id, &body.body)
        .await?;
    match outcome {
        FeedbackOutcome::Created(model) => {
            JsonApiResponse::with_status(StatusCode::CREATED, "Feedback recorded", model.into())
        }
        FeedbackOutcome::Updated(model) => {
            JsonApiResponse::with_status(StatusCode::OK, "Feedback updated", model.into())
        }
    }
}
