use sea_orm::entity::prelude::*;

/// Compost bin with its most recent readings and derived health.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "bins")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub location: Option<String>,
    pub description: Option<String>,
    pub owner_id: Uuid,
    pub latest_temperature_c: Option<f64>,
    pub latest_moisture: Option<String>,
    pub health_status: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::bin_members::Entity")]
    BinMembers,
    #[sea_orm(has_many = "super::bin_logs::Entity")]
    BinLogs,
    #[sea_orm(has_many = "super::tasks::Entity")]
    Tasks,
}

impl Related<super::bin_members::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BinMembers.def()
    }
}

impl Related<super::bin_logs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BinLogs.def()
    }
}

impl Related<super::tasks::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tasks.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
