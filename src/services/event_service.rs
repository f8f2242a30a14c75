use chrono::NaiveDate;
use sea_orm::{Order, Set};
use uuid::Uuid;

use crate::{
    auth::{
        Role,
        policy::{self, Action},
    },
    db::dao::{DaoBase, DaoLayerError, EventDao, EventFilters},
    db::entities::event,
    error::AppError,
};

pub const EVENTS_PAGE_SIZE: u64 = 10;

#[derive(Debug, Clone)]
pub struct NewEvent {
    pub title: String,
    pub description: Option<String>,
    pub date: NaiveDate,
    pub location: String,
    pub category: Option<String>,
}

/// Partial update; `None` fields keep their stored value.
#[derive(Debug, Clone, Default)]
pub struct EventPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
    pub location: Option<String>,
    pub category: Option<String>,
}

/// Allow-list for user-supplied sort fields. Anything else is rejected rather
/// than interpolated into the query.
fn sort_column(field: &str) -> Result<event::Column, AppError> {
    match field {
        "title" => Ok(event::Column::Title),
        "date" => Ok(event::Column::Date),
        "location" => Ok(event::Column::Location),
        "category" => Ok(event::Column::Category),
        "created_at" => Ok(event::Column::CreatedAt),
        _ => Err(AppError::bad_request("Unsupported sort field")),
    }
}

#[derive(Clone)]
pub struct EventService {
    events: EventDao,
}

impl EventService {
    pub fn new(events: EventDao) -> Self {
        Self { events }
    }

    pub async fn create_event(
        &self,
        organizer_id: &Uuid,
        requester_role: &Role,
        input: NewEvent,
    ) -> Result<event::Model, AppError> {
        policy::require_role(Action::CreateEvent, requester_role)?;

        let title = input.title.trim();
        if title.is_empty() {
            return Err(AppError::bad_request("Title is required"));
        }
        let location = input.location.trim();
        if location.is_empty() {
            return Err(AppError::bad_request("Location is required"));
        }

        Ok(self
            .events
            .create_event(
                organizer_id,
                title,
                input.description,
                input.date,
                location,
                input.category,
            )
            .await?)
    }

    pub async fn update_event(
        &self,
        requester_id: &Uuid,
        requester_role: &Role,
        event_id: &Uuid,
        patch: EventPatch,
    ) -> Result<event::Model, AppError> {
        // Role gate first: attendees get 403 without learning whether the
        // event exists.
        policy::require_role(Action::UpdateEvent, requester_role)?;

        let existing = self.find_event(event_id).await?;
        policy::require_scope(
            Action::UpdateEvent,
            requester_id,
            requester_role,
            &existing.organizer_id,
        )?;

        let updated = self
            .events
            .update(*event_id, move |active| {
                if let Some(title) = patch.title {
                    active.title = Set(title);
                }
                if let Some(description) = patch.description {
                    active.description = Set(Some(description));
                }
                if let Some(date) = patch.date {
                    active.date = Set(date);
                }
                if let Some(location) = patch.location {
                    active.location = Set(location);
                }
                if let Some(category) = patch.category {
                    active.category = Set(Some(category));
                }
            })
            .await
            .map_err(Self::map_missing_event)?;
        Ok(updated)
    }

    pub async fn delete_event(
        &self,
        requester_id: &Uuid,
        requester_role: &Role,
        event_id: &Uuid,
    ) -> Result<(), AppError> {
        policy::require_role(Action::DeleteEvent, requester_role)?;

        let existing = self.find_event(event_id).await?;
        policy::require_scope(
            Action::DeleteEvent,
            requester_id,
            requester_role,
            &existing.organizer_id,
        )?;

        self.events
            .delete_with_registrations(event_id)
            .await
            .map_err(Self::map_missing_event)
    }

    pub async fn list_events(
        &self,
        filters: EventFilters,
        sort: Option<&str>,
        direction: Option<&str>,
    ) -> Result<Vec<event::Model>, AppError> {
        let order = match sort {
            Some(field) => {
                let column = sort_column(field)?;
                let order = if direction == Some("desc") {
                    Order::Desc
                } else {
                    Order::Asc
                };
                Some((column, order))
            }
            None => None,
        };

        Ok(self.events.list_events(filters, order).await?)
    }

    pub async fn page_events(&self, page: u64) -> Result<Vec<event::Model>, AppError> {
        Ok(self.events.page_events(page, EVENTS_PAGE_SIZE).await?)
    }

    pub async fn find_event(&self, event_id: &Uuid) -> Result<event::Model, AppError> {
        self.events
            .find_by_id(*event_id)
            .await
            .map_err(Self::map_missing_event)
    }

    fn map_missing_event(err: DaoLayerError) -> AppError {
        match err {
            DaoLayerError::NotFound { .. } => AppError::not_found("Event not found"),
            other => other.into(),
        }
    }
}
