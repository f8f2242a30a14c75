use sea_orm::{ColumnTrait, DatabaseConnection, QueryFilter, Set};
use uuid::Uuid;

use super::{DaoBase, DaoResult};
use crate::db::entities::feedback;

#[derive(Clone)]
pub struct FeedbackDao {
    db: DatabaseConnection,
}

impl DaoBase for FeedbackDao {
    type Entity = feedback::Entity;

    fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl FeedbackDao {
    pub async fn find_by_user_and_event(
        &self,
        user_id: &Uuid,
        event_id: &Uuid,
    ) -> DaoResult<Option<feedback::Model>> {
        let user_id = *user_id;
        let event_id = *event_id;
        self.find(1, 1, None, move |query| {
            query
                .filter(feedback::Column::UserId.eq(user_id))
                .filter(feedback::Column::EventId.eq(event_id))
        })
        .await
        .map(|response| response.data.into_iter().next())
    }

    pub async fn create_feedback(
        &self,
        user_id: &Uuid,
        event_id: &Uuid,
        body: &str,
    ) -> DaoResult<feedback::Model> {
        let model = feedback::ActiveModel {
            user_id: Set(*user_id),
            event_id: Set(*event_id),
            body: Set(body.to_string()),
            ..Default::default()
        };
        self.create(model).await
    }

    pub async fn update_body(&self, id: &Uuid, body: &str) -> DaoResult<feedback::Model> {
        let body = body.to_string();
        self.update(*id, move |active| {
            active.body = Set(body);
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, TimeZone};
    use sea_orm::{DatabaseBackend, MockDatabase, Schema};
    use uuid::Uuid;

    use crate::db::entities::feedback;

    use super::FeedbackDao;
    use crate::db::dao::DaoBase;

    fn ts() -> chrono::DateTime<chrono::FixedOffset> {
        FixedOffset::east_opt(0)
            .expect("offset should be valid")
            .with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
            .single()
            .expect("timestamp should be valid")
    }

    fn feedback_model(user_id: Uuid, event_id: Uuid, body: &str) -> feedback::Model {
        let now = ts();
        feedback::Model {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            user_id,
            event_id,
            body: body.to_string(),
        }
    }

    #[test]
    fn store_enforces_one_feedback_per_user_and_event() {
        let backend = DatabaseBackend::Postgres;
        let schema = Schema::new(backend);

        let mut statements = vec![
            backend
                .build(&schema.create_table_from_entity(feedback::Entity))
                .sql,
        ];
        statements.extend(
            schema
                .create_index_from_entity(feedback::Entity)
                .iter()
                .map(|statement| backend.build(statement).sql),
        );

        assert!(
            statements.iter().any(|sql| sql.contains("UNIQUE")
                && sql.contains("user_id")
                && sql.contains("event_id")),
            "no composite unique key over (user_id, event_id) in: {statements:?}"
        );
    }

    #[tokio::test]
    async fn find_by_user_and_event_returns_existing_feedback() {
        let user_id = Uuid::new_v4();
        let event_id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[feedback_model(user_id, event_id, "great talk")]])
            .into_connection();
        let dao = FeedbackDao::new(&db);

        let found = dao
            .find_by_user_and_event(&user_id, &event_id)
            .await
            .expect("query should succeed")
            .expect("feedback should exist");
        assert_eq!(found.body, "great talk");
    }

    #[tokio::test]
    async fn update_body_overwrites_text() {
        let user_id = Uuid::new_v4();
        let event_id = Uuid::new_v4();
        let existing = feedback_model(user_id, event_id, "first impression");
        let mut updated = existing.clone();
        updated.body = "changed my mind".to_string();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[existing.clone()]])
            .append_query_results([[updated]])
            .into_connection();
        let dao = FeedbackDao::new(&db);

        let result = dao
            .update_body(&existing.id, "changed my mind")
            .await
            .expect("update should succeed");
        assert_eq!(result.body, "changed my mind");
    }
}
