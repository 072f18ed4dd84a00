pub use super::song_record::Entity as SongRecord;
pub use super::user::Entity as User;
