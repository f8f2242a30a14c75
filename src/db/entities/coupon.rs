use sea_orm::entity::prelude::*;

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize, DeriveEntityModel)]
#[sea_orm(table_name = "coupons")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub code: String,
    // Percentage off, 0-100.
    pub discount: i32,
    pub valid_until: Date,
    #[sea_orm(indexed)]
    pub created_by_id: Uuid,
    #[sea_orm(default_expr = "Expr::current_timestamp()")]
    pub created_at: DateTimeWithTimeZone,
    #[sea_orm(default_expr = "Expr::current_timestamp()")]
    pub updated_at: DateTimeWithTimeZone,
    #[sea_orm(belongs_to, from = "created_by_id", to = "id", on_delete = "Cascade")]
    pub created_by: HasOne<super::user::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}

crate::base_entity_impls!();
