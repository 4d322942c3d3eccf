use sea_orm::entity::prelude::*;

/// Activity entry recorded against a bin.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "bin_logs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub bin_id: Uuid,
    pub user_id: Uuid,
    pub kind: String,
    pub temperature_c: Option<f64>,
    pub moisture: Option<String>,
    pub notes: Option<String>,
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
