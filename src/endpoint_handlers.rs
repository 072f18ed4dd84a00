use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Extension, Json};
use chrono::NaiveDate;
use log::info;
use serde::Deserialize;
use uuid::Uuid;

use entities::song_record_local_model::SongRecordModel;
use entities::user_local_model::UserModel;

use crate::auth_middleware::{issue_token, AuthenticatedUser, TOKEN_TTL_SECONDS};
use crate::errors::ApiError;
use crate::recommender;
use crate::responses::responses::{
    LibraryResponse, LibrarySong, MessageResponse, RecommendationResponse, TokenResponse,
};
use crate::AppState;

#[derive(Deserialize)]
pub struct SignupRequest {
    username: String,
    password: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    username: String,
    password: String,
}

#[derive(Deserialize)]
pub struct ChangePasswordRequest {
    #[serde(rename = "oldPassword")]
    old_password: String,
    #[serde(rename = "newPassword")]
    new_password: String,
}

#[derive(Deserialize, Default)]
pub struct MusicSelectionRequest {
    #[serde(default)]
    artists: String,
    #[serde(default)]
    genres: String,
    #[serde(default)]
    tracks: String,
}

#[derive(Deserialize)]
pub struct SaveMusicRequest {
    #[serde(rename = "songName")]
    song_name: String,
    #[serde(rename = "songArtist")]
    song_artist: String,
    #[serde(rename = "albumName")]
    album_name: Option<String>,
    #[serde(rename = "releaseDate")]
    release_date: String,
}

#[derive(Deserialize)]
pub struct DeleteSongRequest {
    #[serde(rename = "songId")]
    song_id: Uuid,
}

#[derive(Deserialize)]
pub struct GetLibraryRequest {
    page: Option<u64>,
}

const LIBRARY_PAGE_SIZE: u64 = 5;

pub async fn signup(
    State(state): State<AppState>,
    Json(body): Json<SignupRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if body.username.is_empty() {
        return Err(ApiError::Validation("Username is required".to_string()));
    }
    if body.password.len() <= 8 {
        return Err(ApiError::Validation("Password is too short".to_string()));
    }
    let existing = queries::get_user_by_username(&state.connection, &body.username).await?;
    if existing.is_some() {
        return Err(ApiError::Conflict("Username already taken".to_string()));
    }

    let password = hash_password(&body.password)?;
    let user = queries::add_user(
        &state.connection,
        UserModel {
            username: body.username,
            password,
        },
    )
    .await?;
    info!("New user signed up: {}", user.username);
    Ok(Json(MessageResponse::new("Signup Successful")))
}

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = queries::get_user_by_username(&state.connection, &body.username).await?;
    let Some(user) = user else {
        return Err(ApiError::Auth("Invalid username or password".to_string()));
    };
    if !verify_password(&user.password, &body.password) {
        return Err(ApiError::Auth("Invalid username or password".to_string()));
    }

    let token = issue_token(&state.jwt_secret, user.id)
        .map_err(|err| ApiError::Internal(format!("Token signing failed: {}", err)))?;
    Ok(Json(TokenResponse {
        token,
        expiration: TOKEN_TTL_SECONDS,
    }))
}

pub async fn change_password(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Json(body): Json<ChangePasswordRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = queries::get_user_by_id(&state.connection, auth.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Could not find user in database".to_string()))?;

    if !verify_password(&user.password, &body.old_password) {
        return Err(ApiError::Auth("Old password is incorrect".to_string()));
    }
    if body.new_password.len() <= 8 {
        return Err(ApiError::Validation(
            "New password length too short".to_string(),
        ));
    }

    let password = hash_password(&body.new_password)?;
    queries::update_user_password(&state.connection, user, password).await?;
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Password updated successfully")),
    ))
}

pub async fn verify(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> Result<impl IntoResponse, ApiError> {
    let user = queries::get_user_by_id(&state.connection, auth.id).await?;
    if user.is_none() {
        return Err(ApiError::NotFound("Could not verify user".to_string()));
    }
    Ok(Json(MessageResponse::new("Verified")))
}

pub async fn find_song(
    State(state): State<AppState>,
    body: Option<Json<MusicSelectionRequest>>,
) -> Result<impl IntoResponse, ApiError> {
    let Some(Json(body)) = body else {
        return Err(ApiError::Validation("No data provided".to_string()));
    };

    let song = state
        .recommender
        .find_song(&body.artists, &body.genres, &body.tracks)
        .await?;
    Ok(Json(RecommendationResponse {
        song_name: song.song_name,
        song_artist: song.song_artist,
        album_name: song.album_name,
        release_date: song.release_date,
    }))
}

pub async fn save_music(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Json(body): Json<SaveMusicRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = queries::get_user_by_id(&state.connection, auth.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let release_date = parse_release_date(&body.release_date)?;
    let record = queries::add_song_record(
        &state.connection,
        SongRecordModel {
            artist: body.song_artist,
            title: body.song_name,
            album: body.album_name,
            release_date,
            person_id: user.id,
        },
    )
    .await?;
    info!("Saved song {} for user {}", record.title, user.username);
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Music saved to database")),
    ))
}

pub async fn delete_song(
    State(state): State<AppState>,
    Extension(_auth): Extension<AuthenticatedUser>,
    Json(body): Json<DeleteSongRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let deleted = queries::delete_song_record_by_id(&state.connection, body.song_id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Song not found".to_string()));
    }
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_library(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Json(body): Json<GetLibraryRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let page = body.page.unwrap_or(1).max(1);
    let (records, pages) =
        queries::get_library_page(&state.connection, auth.id, page, LIBRARY_PAGE_SIZE).await?;

    // Zero saved songs is an empty page, not an error.
    let songs = records.into_iter().map(LibrarySong::from_record).collect();
    Ok(Json(LibraryResponse { songs, pages }))
}

fn hash_password(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| ApiError::Internal(format!("Password hashing failed: {}", err)))
}

fn verify_password(hash: &str, password: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

fn parse_release_date(value: &str) -> Result<NaiveDate, ApiError> {
    let year = recommender::parse_release_year(value)
        .ok_or_else(|| ApiError::Validation("Invalid release date".to_string()))?;
    NaiveDate::from_ymd_opt(year, 1, 1)
        .ok_or_else(|| ApiError::Validation("Invalid release date".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_round_trip() {
        let hash = hash_password("longpassword1").unwrap();
        assert_ne!(hash, "longpassword1");
        assert!(verify_password(&hash, "longpassword1"));
        assert!(!verify_password(&hash, "wrongpassword"));
    }

    #[test]
    fn test_verify_rejects_malformed_hash() {
        assert!(!verify_password("not-a-phc-string", "whatever"));
    }

    #[test]
    fn test_parse_release_date_takes_leading_year() {
        let date = parse_release_date("1995-06-01").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(1995, 1, 1).unwrap());
        assert_eq!(
            parse_release_date("2020").unwrap(),
            NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()
        );
    }

    #[test]
    fn test_parse_release_date_rejects_garbage() {
        assert!(matches!(
            parse_release_date("unknown"),
            Err(ApiError::Validation(_))
        ));
        assert!(matches!(
            parse_release_date("19"),
            Err(ApiError::Validation(_))
        ));
    }
}
