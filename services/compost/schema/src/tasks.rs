use sea_orm::entity::prelude::*;

/// Volunteer task tied to a bin: open -> accepted -> completed.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "tasks")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub bin_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub urgency: String,
    pub status: String,
    pub created_by: Uuid,
    pub accepted_by: Option<Uuid>,
    pub accepted_at: Option<chrono::DateTime<chrono::Utc>>,
    pub completed_at: Option<chrono::DateTime<chrono::Utc>>,
    pub due_date: Option<chrono::NaiveDate>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::bins::Entity",
        from = "Column::BinId",
        to = "super::bins::Column::Id"
    )]
    Bin,
}

impl Related<super::bins::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Bin.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
