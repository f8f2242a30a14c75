use chrono::NaiveDate;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, Order, QueryFilter, Set, TransactionTrait,
};
use uuid::Uuid;

use super::{DaoBase, DaoLayerError, DaoResult};
use crate::db::entities::{event, registration};

/// Exact-match filters applied as a conjunction; `None` fields do not filter.
#[derive(Debug, Clone, Default)]
pub struct EventFilters {
    pub category: Option<String>,
    pub location: Option<String>,
}

#[derive(Clone)]
pub struct EventDao {
    db: DatabaseConnection,
}

impl DaoBase for EventDao {
    type Entity = event::Entity;

    fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl EventDao {
    #[allow(clippy::too_many_arguments)]
    pub async fn create_event(
        &self,
        organizer_id: &Uuid,
        title: &str,
        description: Option<String>,
        date: NaiveDate,
        location: &str,
        category: Option<String>,
    ) -> DaoResult<event::Model> {
        let model = event::ActiveModel {
            title: Set(title.to_string()),
            description: Set(description),
            date: Set(date),
            location: Set(location.to_string()),
            category: Set(category),
            organizer_id: Set(*organizer_id),
            ..Default::default()
        };
        self.create(model).await
    }

    pub async fn list_events(
        &self,
        filters: EventFilters,
        order: Option<(event::Column, Order)>,
    ) -> DaoResult<Vec<event::Model>> {
        let mut pager = self.find_iter(None, order, move |query| {
            let query = match filters.category.clone() {
                Some(category) => query.filter(event::Column::Category.eq(category)),
                None => query,
            };
            match filters.location.clone() {
                Some(location) => query.filter(event::Column::Location.eq(location)),
                None => query,
            }
        });

        let mut events = Vec::new();
        while let Some(mut response) = pager.next_page().await? {
            events.append(&mut response.data);
        }
        Ok(events)
    }

    pub async fn page_events(&self, page: u64, page_size: u64) -> DaoResult<Vec<event::Model>> {
        self.find(
            page,
            page_size,
            Some((event::Column::Id, Order::Asc)),
            |query| query,
        )
        .await
        .map(|response| response.data)
    }

    /// Deletes the event and all registrations pointing at it in one
    /// transaction, so a crash cannot leave orphaned registrations.
    pub async fn delete_with_registrations(&self, id: &Uuid) -> DaoResult<()> {
        let txn = self.db.begin().await.map_err(DaoLayerError::Db)?;

        registration::Entity::delete_many()
            .filter(registration::Column::EventId.eq(*id))
            .exec(&txn)
            .await
            .map_err(DaoLayerError::Db)?;

        let result = event::Entity::delete_by_id(*id)
            .exec(&txn)
            .await
            .map_err(DaoLayerError::Db)?;

        if result.rows_affected == 0 {
            return Err(DaoLayerError::NotFound {
                entity: std::any::type_name::<event::Entity>(),
                id: *id,
            });
        }

        txn.commit().await.map_err(DaoLayerError::Db)?;
        Ok(())
    }
}
