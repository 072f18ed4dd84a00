use chrono::NaiveDate;
use sea_orm::prelude::Uuid;
use sea_orm::DeriveIntoActiveModel;

use crate::song_record::ActiveModel;

#[derive(DeriveIntoActiveModel, PartialEq, Eq, Hash, Clone, Debug)]
pub struct SongRecordModel {
    pub artist: String,
    pub title: String,
    pub album: Option<String>,
    pub release_date: NaiveDate,
    pub person_id: Uuid,
}
