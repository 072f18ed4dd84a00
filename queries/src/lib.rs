use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder,
};
use uuid::Uuid;

use entities::prelude::{SongRecord, User};
use entities::song_record_local_model::SongRecordModel;
use entities::user_local_model::UserModel;
use entities::{song_record, user};

pub async fn get_user_by_username(
    db: &DatabaseConnection,
    username: &str,
) -> Result<Option<user::Model>, DbErr> {
    User::find()
        .filter(user::Column::Username.eq(username))
        .one(db)
        .await
}

pub async fn get_user_by_id(
    db: &DatabaseConnection,
    user_id: Uuid,
) -> Result<Option<user::Model>, DbErr> {
    User::find_by_id(user_id).one(db).await
}

pub async fn add_user(db: &DatabaseConnection, model: UserModel) -> Result<user::Model, DbErr> {
    let mut active = model.into_active_model();
    active.id = Set(Uuid::new_v4());
    active.created_at = Set(Utc::now());
    active.insert(db).await
}

pub async fn update_user_password(
    db: &DatabaseConnection,
    user: user::Model,
    password: String,
) -> Result<user::Model, DbErr> {
    let mut active: user::ActiveModel = user.into();
    active.password = Set(password);
    active.update(db).await
}

pub async fn add_song_record(
    db: &DatabaseConnection,
    model: SongRecordModel,
) -> Result<song_record::Model, DbErr> {
    let mut active = model.into_active_model();
    active.id = Set(Uuid::new_v4());
    active.created_at = Set(Utc::now());
    active.insert(db).await
}

/// Returns false when no record matched the id.
pub async fn delete_song_record_by_id(db: &DatabaseConnection, id: Uuid) -> Result<bool, DbErr> {
    let ret = SongRecord::delete_by_id(id).exec(db).await?;
    Ok(ret.rows_affected > 0)
}

/// Page of a user's saved songs in insertion order, plus the total page
/// count. Pages are 1-based; a page past the end comes back empty.
pub async fn get_library_page(
    db: &DatabaseConnection,
    person_id: Uuid,
    page: u64,
    page_size: u64,
) -> Result<(Vec<song_record::Model>, u64), DbErr> {
    let paginator = SongRecord::find()
        .filter(song_record::Column::PersonId.eq(person_id))
        .order_by_asc(song_record::Column::CreatedAt)
        .paginate(db, page_size);
    let pages = paginator.num_pages().await?;
    let records = paginator.fetch_page(page.saturating_sub(1)).await?;
    Ok((records, pages))
}
