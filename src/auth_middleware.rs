use axum::extract::{Request, State};
use axum::http::{header, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use log::warn;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::responses::responses::MessageResponse;
use crate::AppState;

/// Tokens expire 30 minutes after issue.
pub const TOKEN_TTL_SECONDS: i64 = 30 * 60;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

/// Identity resolved by the middleware, handed to handlers as a request
/// extension. Handlers never see or re-validate the raw token.
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedUser {
    pub id: Uuid,
}

pub fn issue_token(secret: &str, user_id: Uuid) -> Result<String, jsonwebtoken::errors::Error> {
    let iat = Utc::now().timestamp();
    let claims = Claims {
        sub: user_id.to_string(),
        iat,
        exp: iat + TOKEN_TTL_SECONDS,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

pub fn decode_token(secret: &str, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
}

pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let bearer = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));
    let Some(token) = bearer else {
        warn!("Request without bearer token");
        return unauthorized();
    };

    let claims = match decode_token(&state.jwt_secret, token) {
        Ok(claims) => claims,
        Err(err) => {
            warn!("Rejected token: {}", err);
            return unauthorized();
        }
    };
    let user_id = match Uuid::parse_str(&claims.sub) {
        Ok(id) => id,
        Err(_) => {
            warn!("Token subject is not a user id");
            return unauthorized();
        }
    };

    request
        .extensions_mut()
        .insert(AuthenticatedUser { id: user_id });
    next.run(request).await
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(MessageResponse::new("Missing or invalid token")),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_round_trip() {
        let user_id = Uuid::new_v4();
        let token = issue_token("test-secret", user_id).unwrap();
        let claims = decode_token("test-secret", &token).unwrap();
        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.exp - claims.iat, TOKEN_TTL_SECONDS);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = issue_token("test-secret", Uuid::new_v4()).unwrap();
        assert!(decode_token("other-secret", &token).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        // Past the default decoding leeway of 60 seconds.
        let iat = Utc::now().timestamp() - TOKEN_TTL_SECONDS - 120;
        let claims = Claims {
            sub: Uuid::new_v4().to_string(),
            iat,
            exp: iat + TOKEN_TTL_SECONDS,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();
        assert!(decode_token("test-secret", &token).is_err());
    }

    #[test]
    fn test_garbage_token_rejected() {
        assert!(decode_token("test-secret", "not-a-token").is_err());
    }
}
