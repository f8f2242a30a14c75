use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use super::{DaoBase, DaoLayerError, DaoResult};
use crate::db::entities::{event, registration};

#[derive(Clone)]
pub struct RegistrationDao {
    db: DatabaseConnection,
}

impl DaoBase for RegistrationDao {
    type Entity = registration::Entity;

    fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl RegistrationDao {
    pub async fn find_by_user_and_event(
        &self,
        user_id: &Uuid,
        event_id: &Uuid,
    ) -> DaoResult<Option<registration::Model>> {
        let user_id = *user_id;
        let event_id = *event_id;
        self.find(1, 1, None, move |query| {
            query
                .filter(registration::Column::UserId.eq(user_id))
                .filter(registration::Column::EventId.eq(event_id))
        })
        .await
        .map(|response| response.data.into_iter().next())
    }

    pub async fn create_registration(
        &self,
        user_id: &Uuid,
        event_id: &Uuid,
    ) -> DaoResult<registration::Model> {
        let model = registration::ActiveModel {
            user_id: Set(*user_id),
            event_id: Set(*event_id),
            ..Default::default()
        };
        self.create(model).await
    }

    /// Returns the number of rows removed; zero means the pair was never
    /// registered.
    pub async fn delete_by_user_and_event(
        &self,
        user_id: &Uuid,
        event_id: &Uuid,
    ) -> DaoResult<u64> {
        let result = registration::Entity::delete_many()
            .filter(registration::Column::UserId.eq(*user_id))
            .filter(registration::Column::EventId.eq(*event_id))
            .exec(&self.db)
            .await
            .map_err(DaoLayerError::Db)?;
        Ok(result.rows_affected)
    }

    pub async fn list_for_user_with_events(
        &self,
        user_id: &Uuid,
    ) -> DaoResult<Vec<(registration::Model, Option<event::Model>)>> {
        registration::Entity::find()
            .filter(registration::Column::UserId.eq(*user_id))
            .find_also_related(event::Entity)
            .order_by_desc(registration::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(DaoLayerError::Db)
    }
}
