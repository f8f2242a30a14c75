use uuid::Uuid;

use crate::{
    auth::{
        Role,
        policy::{self, Action},
    },
    db::dao::{DaoBase, DaoLayerError, EventDao, FeedbackDao, RegistrationDao},
    db::entities::{event, feedback, registration},
    error::AppError,
};

#[derive(Debug)]
pub enum FeedbackOutcome {
    Created(feedback::Model),
    Updated(feedback::Model),
}

#[derive(Clone)]
pub struct RegistrationService {
    registrations: RegistrationDao,
    events: EventDao,
    feedback: FeedbackDao,
}

impl RegistrationService {
    pub fn new(registrations: RegistrationDao, events: EventDao, feedback: FeedbackDao) -> Self {
        Self {
            registrations,
            events,
            feedback,
        }
    }

    pub async fn register(
        &self,
        user_id: &Uuid,
        event_id: &Uuid,
    ) -> Result<registration::Model, AppError> {
        self.find_event(event_id).await?;

        if self
            .registrations
            .find_by_user_and_event(user_id, event_id)
            .await?
            .is_some()
        {
            return Err(AppError::duplicate("Already registered for this event"));
        }

        Ok(self
            .registrations
            .create_registration(user_id, event_id)
            .await?)
    }

    pub async fn unregister(&self, user_id: &Uuid, event_id: &Uuid) -> Result<(), AppError> {
        let removed = self
            .registrations
            .delete_by_user_and_event(user_id, event_id)
            .await?;
        if removed == 0 {
            return Err(AppError::bad_request("Not registered for this event"));
        }
        Ok(())
    }

    pub async fn history(
        &self,
        user_id: &Uuid,
        requester_role: &Role,
    ) -> Result<Vec<(registration::Model, Option<event::Model>)>, AppError> {
        policy::require_role(Action::ViewHistory, requester_role)?;
        Ok(self.registrations.list_for_user_with_events(user_id).await?)
    }

    /// One feedback row per (user, event): a second submission overwrites the
    /// first instead of adding another.
    pub async fn submit_feedback(
        &self,
        user_id: &Uuid,
        event_id: &Uuid,
        body: &str,
    ) -> Result<FeedbackOutcome, AppError> {
        let body = body.trim();
        if body.is_empty() {
            return Err(AppError::bad_request("Feedback body is required"));
        }

        if self
            .registrations
            .find_by_user_and_event(user_id, event_id)
            .await?
            .is_none()
        {
            return Err(AppError::bad_request("Not registered for this event"));
        }

        match self
            .feedback
            .find_by_user_and_event(user_id, event_id)
            .await?
        {
            Some(existing) => {
                let updated = self.feedback.update_body(&existing.id, body).await?;
                Ok(FeedbackOutcome::Updated(updated))
            }
            None => {
                let created = self.feedback.create_feedback(user_id, event_id, body).await?;
                Ok(FeedbackOutcome::Created(created))
            }
        }
    }

    async fn find_event(&self, event_id: &Uuid) -> Result<event::Model, AppError> {
        self.events.find_by_id(*event_id).await.map_err(|err| match err {
            DaoLayerError::NotFound { .. } => AppError::not_found("Event not found"),
            other => other.into(),
        })
    }
}
