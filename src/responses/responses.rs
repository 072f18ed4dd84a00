use serde::Serialize;
use uuid::Uuid;

use entities::song_record;

#[derive(Serialize, Clone)]
pub struct MessageResponse {
    pub(crate) message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Serialize, Clone)]
pub struct TokenResponse {
    pub(crate) token: String,
    pub(crate) expiration: i64,
}

#[derive(Serialize, Clone)]
pub struct RecommendationResponse {
    #[serde(rename = "songName")]
    pub(crate) song_name: String,
    #[serde(rename = "songArtist")]
    pub(crate) song_artist: String,
    #[serde(rename = "albumName")]
    pub(crate) album_name: String,
    #[serde(rename = "releaseDate")]
    pub(crate) release_date: String,
}

#[derive(Serialize, Clone)]
pub struct LibrarySong {
    #[serde(rename = "songId")]
    pub(crate) song_id: Uuid,
    #[serde(rename = "songName")]
    pub(crate) song_name: String,
    #[serde(rename = "songArtist")]
    pub(crate) song_artist: String,
    #[serde(rename = "albumName")]
    pub(crate) album_name: Option<String>,
    #[serde(rename = "releaseDate")]
    pub(crate) release_date: String,
}

impl LibrarySong {
    pub fn from_record(record: song_record::Model) -> Self {
        Self {
            song_id: record.id,
            song_name: record.title,
            song_artist: record.artist,
            album_name: record.album,
            release_date: record.release_date.format("%Y").to_string(),
        }
    }
}

#[derive(Serialize, Clone)]
pub struct LibraryResponse {
    pub(crate) songs: Vec<LibrarySong>,
    pub(crate) pages: u64,
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use uuid::Uuid;

    use super::*;

    #[test]
    fn test_library_song_wire_names() {
        let record = song_record::Model {
            id: Uuid::new_v4(),
            artist: "Queen".to_string(),
            title: "Innuendo".to_string(),
            album: Some("Innuendo".to_string()),
            release_date: NaiveDate::from_ymd_opt(1991, 1, 1).unwrap(),
            person_id: Uuid::new_v4(),
            created_at: chrono::Utc::now(),
        };
        let value = serde_json::to_value(LibrarySong::from_record(record)).unwrap();
        assert_eq!(value["songName"], "Innuendo");
        assert_eq!(value["songArtist"], "Queen");
        assert_eq!(value["releaseDate"], "1991");
        assert!(value.get("title").is_none());
    }

    #[test]
    fn test_recommendation_wire_names() {
        let response = RecommendationResponse {
            song_name: "Karma Police".to_string(),
            song_artist: "Radiohead".to_string(),
            album_name: "OK Computer".to_string(),
            release_date: "1997".to_string(),
        };
        let value = serde_json::to_value(response).unwrap();
        assert_eq!(value["songName"], "Karma Police");
        assert_eq!(value["albumName"], "OK Computer");
        assert_eq!(value["releaseDate"], "1997");
    }
}
