use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub username: String,
    /// Argon2 hash in PHC string format, never the plain password.
    pub password: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::song_record::Entity")]
    SongRecord,
}

impl Related<super::song_record::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SongRecord.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
