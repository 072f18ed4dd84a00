use std::fs;
use std::sync::Arc;

use axum::routing::{delete, get, post, put};
use axum::{middleware, Router};
use clap::Parser;
use log::{error, info};
use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection, DbErr};
use serde::Deserialize;
use tokio::main;
use tower_http::cors::CorsLayer;

use crate::auth_middleware::auth_middleware;
use crate::endpoint_handlers::{
    change_password, delete_song, find_song, get_library, login, save_music, signup, verify,
};
use crate::recommender::RecommendationClient;

mod auth_middleware;
mod endpoint_handlers;
mod errors;
mod recommender;
mod responses;

#[derive(Clone)]
pub struct AppState {
    pub connection: DatabaseConnection,
    pub jwt_secret: String,
    pub recommender: Arc<RecommendationClient>,
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(long, short, default_value_t = 3)]
    verbosity: usize,
    #[arg(long, short, default_value_t = false)]
    quiet: bool,
    #[arg(long, short)]
    config: String,
}

#[derive(Deserialize)]
struct Config {
    port: i32,
    postgres: String,
    secret_key: String,
    spotify_client_id: String,
    spotify_client_secret: String,
    #[serde(default)]
    spotify_auth_url: Option<String>,
    #[serde(default)]
    spotify_api_url: Option<String>,
}

#[main]
async fn main() -> Result<(), DbErr> {
    let args = Args::parse();
    stderrlog::new()
        .verbosity(args.verbosity)
        .quiet(args.quiet)
        .timestamp(stderrlog::Timestamp::Millisecond)
        .init()
        .unwrap();

    info!("Configuration path: {}", args.config);
    let config_string = match fs::read_to_string(&args.config) {
        Ok(contents) => contents,
        Err(err) => {
            error!("Error opening configuration file: {}", err);
            return Ok(());
        }
    };
    let config: Config = match serde_json::from_str(config_string.as_str()) {
        Ok(config) => config,
        Err(err) => {
            error!("Malformed configuration: {}", err);
            return Ok(());
        }
    };

    let connection = match Database::connect(config.postgres.as_str()).await {
        Ok(connection) => connection,
        Err(err) => {
            error!("Error connecting to database: {}", err);
            return Ok(());
        }
    };
    Migrator::up(&connection, None).await?;

    let recommender = match RecommendationClient::new(
        config.spotify_client_id,
        config.spotify_client_secret,
        config.spotify_auth_url,
        config.spotify_api_url,
    ) {
        Ok(client) => client,
        Err(err) => {
            error!("Error building recommendation client: {}", err);
            return Ok(());
        }
    };

    let state = AppState {
        connection,
        jwt_secret: config.secret_key,
        recommender: Arc::new(recommender),
    };

    let authenticated: Router = Router::new()
        .route("/change-password", put(change_password))
        .route("/verify", get(verify))
        .route("/save-music", post(save_music))
        .route("/delete-song", delete(delete_song))
        .route("/get-library", post(get_library))
        .layer(middleware::from_fn_with_state(
            state.to_owned(),
            auth_middleware,
        ))
        .with_state(state.to_owned());
    let app: Router = Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/music-selection", get(find_song).post(find_song))
        .with_state(state.to_owned())
        .merge(authenticated)
        .layer(CorsLayer::permissive());

    info!("Listening on 0.0.0.0:{}", config.port);
    info!("Welcome to Songvault!");

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port))
        .await
        .unwrap();
    Ok(axum::serve(listener, app).await.unwrap())
}
