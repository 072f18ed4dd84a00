use std::time::Duration;

use log::info;
use serde::Deserialize;
use thiserror::Error;

use crate::errors::ApiError;

const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/api/token";
const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
const USER_AGENT: &str = "songvault/0.1.0";
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Upper bound on combined seeds, imposed by the provider.
pub const MAX_SEEDS: usize = 5;

#[derive(Debug, Error)]
pub enum RecommenderError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Provider returned {0}: {1}")]
    Api(u16, String),

    #[error("Parse error: {0}")]
    Parse(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecommendationsResponse {
    pub tracks: Vec<Track>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Track {
    pub name: String,
    pub artists: Vec<TrackArtist>,
    pub album: AlbumInfo,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrackArtist {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AlbumInfo {
    pub name: String,
    pub release_date: String,
}

/// The one track a `find_song` call settles on.
#[derive(Debug, Clone)]
pub struct RecommendedSong {
    pub song_name: String,
    pub song_artist: String,
    pub album_name: String,
    pub release_date: String,
}

/// Client for the external recommendation provider. Auth handshake first,
/// then one recommendation request; no retries.
pub struct RecommendationClient {
    http: reqwest::Client,
    client_id: String,
    client_secret: String,
    auth_url: String,
    api_url: String,
}

impl RecommendationClient {
    pub fn new(
        client_id: String,
        client_secret: String,
        auth_url: Option<String>,
        api_url: Option<String>,
    ) -> Result<Self, RecommenderError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|err| RecommenderError::Network(err.to_string()))?;

        Ok(Self {
            http,
            client_id,
            client_secret,
            auth_url: auth_url.unwrap_or_else(|| DEFAULT_AUTH_URL.to_string()),
            api_url: api_url.unwrap_or_else(|| DEFAULT_API_URL.to_string()),
        })
    }

    /// Client-credentials handshake, required before every recommendation
    /// call. The provider hands back a short-lived bearer token.
    pub async fn request_auth(&self) -> Result<AccessToken, RecommenderError> {
        let response = self
            .http
            .post(&self.auth_url)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(|err| RecommenderError::Network(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RecommenderError::Api(status.as_u16(), body));
        }
        response
            .json::<AccessToken>()
            .await
            .map_err(|err| RecommenderError::Parse(err.to_string()))
    }

    pub async fn get_recommendations(
        &self,
        token: &AccessToken,
        artists: &[String],
        genres: &[String],
        tracks: &[String],
        limit: u32,
    ) -> Result<RecommendationsResponse, RecommenderError> {
        let mut params: Vec<(&str, String)> = vec![("limit", limit.to_string())];
        if !artists.is_empty() {
            params.push(("seed_artists", artists.join(",")));
        }
        if !genres.is_empty() {
            params.push(("seed_genres", genres.join(",")));
        }
        if !tracks.is_empty() {
            params.push(("seed_tracks", tracks.join(",")));
        }

        let response = self
            .http
            .get(format!("{}/recommendations", self.api_url))
            .bearer_auth(&token.access_token)
            .query(&params)
            .send()
            .await
            .map_err(|err| RecommenderError::Network(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RecommenderError::Api(status.as_u16(), body));
        }
        response
            .json::<RecommendationsResponse>()
            .await
            .map_err(|err| RecommenderError::Parse(err.to_string()))
    }

    /// Splits the free-text seed fields, enforces the provider's seed
    /// ceiling, and asks for exactly one recommendation.
    pub async fn find_song(
        &self,
        artists_csv: &str,
        genres_csv: &str,
        tracks_csv: &str,
    ) -> Result<RecommendedSong, ApiError> {
        let artists = split_seeds(artists_csv);
        let genres = split_seeds(genres_csv);
        let tracks = split_seeds(tracks_csv);
        validate_seed_count(&artists, &genres, &tracks)?;

        info!(
            "Requesting a recommendation for {} seed(s)",
            artists.len() + genres.len() + tracks.len()
        );
        let token = self.request_auth().await?;
        let recommendations = self
            .get_recommendations(&token, &artists, &genres, &tracks, 1)
            .await?;

        let track = recommendations
            .tracks
            .into_iter()
            .next()
            .ok_or_else(|| ApiError::NotFound("No tracks found".to_string()))?;
        let artist = track
            .artists
            .into_iter()
            .next()
            .ok_or_else(|| ApiError::NotFound("No tracks found".to_string()))?;

        Ok(RecommendedSong {
            song_name: track.name,
            song_artist: artist.name,
            album_name: track.album.name,
            release_date: normalize_release_date(&track.album.release_date),
        })
    }
}

/// Empty input means no seeds at all, not one empty seed.
pub fn split_seeds(csv: &str) -> Vec<String> {
    if csv.is_empty() {
        return Vec::new();
    }
    csv.split(',').map(str::to_string).collect()
}

fn validate_seed_count(
    artists: &[String],
    genres: &[String],
    tracks: &[String],
) -> Result<(), ApiError> {
    if artists.len() + genres.len() + tracks.len() > MAX_SEEDS {
        return Err(ApiError::Validation(
            "Too many arguments, maximum number of arguments is 5".to_string(),
        ));
    }
    Ok(())
}

/// First four characters as a year, when they parse as one.
pub fn parse_release_year(value: &str) -> Option<i32> {
    value.get(..4)?.parse::<i32>().ok()
}

/// Providers report "1995-06-01", "1995-06" or plain "1995"; callers get
/// the 4-digit year string, or the raw value when no year leads it.
fn normalize_release_date(value: &str) -> String {
    match parse_release_year(value) {
        Some(year) => year.to_string(),
        None => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_seeds_empty_string_is_no_seeds() {
        assert!(split_seeds("").is_empty());
    }

    #[test]
    fn test_split_seeds_on_commas() {
        assert_eq!(
            split_seeds("queen,abba,toto"),
            vec!["queen", "abba", "toto"]
        );
        assert_eq!(split_seeds("rock"), vec!["rock"]);
    }

    #[test]
    fn test_six_combined_seeds_rejected() {
        let artists = split_seeds("a,b,c");
        let genres = split_seeds("rock,pop");
        let tracks = split_seeds("some song");
        let err = validate_seed_count(&artists, &genres, &tracks).unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[test]
    fn test_five_combined_seeds_accepted() {
        let artists = split_seeds("a,b,c");
        let genres = split_seeds("rock");
        let tracks = split_seeds("some song");
        assert!(validate_seed_count(&artists, &genres, &tracks).is_ok());
    }

    #[test]
    fn test_parse_release_year() {
        assert_eq!(parse_release_year("1995-06-01"), Some(1995));
        assert_eq!(parse_release_year("2020"), Some(2020));
        assert_eq!(parse_release_year("199"), None);
        assert_eq!(parse_release_year("unknown"), None);
    }

    #[test]
    fn test_normalize_release_date() {
        assert_eq!(normalize_release_date("1995-06-01"), "1995");
        assert_eq!(normalize_release_date("unknown"), "unknown");
    }

    #[test]
    fn test_decode_recommendations_response() {
        let body = r#"{
            "tracks": [{
                "name": "Karma Police",
                "artists": [{"name": "Radiohead"}, {"name": "Someone Else"}],
                "album": {"name": "OK Computer", "release_date": "1997-05-21"}
            }]
        }"#;
        let parsed: RecommendationsResponse = serde_json::from_str(body).unwrap();
        let track = &parsed.tracks[0];
        assert_eq!(track.name, "Karma Police");
        assert_eq!(track.artists[0].name, "Radiohead");
        assert_eq!(track.album.release_date, "1997-05-21");
    }

    #[test]
    fn test_decode_access_token() {
        let body = r#"{"access_token": "abc123", "token_type": "Bearer", "expires_in": 3600}"#;
        let parsed: AccessToken = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.access_token, "abc123");
        assert_eq!(parsed.expires_in, 3600);
    }
}
