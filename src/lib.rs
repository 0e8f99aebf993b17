pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod projects;
pub mod users;

use actix_web::{web, HttpResponse};
use std::sync::Arc;
use std::time::Duration;

pub use error::AppError;
pub type Result<T> = std::result::Result<T, AppError>;
pub use config::Settings;

pub use auth::{AuthService, AuthUser, TokenIssuer};
pub use db::{DbOperations, ProjectStore, PublicUser, Role, User, UserStore};

/// Health check endpoint handler
/// Returns a JSON response with server status and timestamp
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Application state shared across all components
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Settings>,
    pub auth: AuthService,
    pub users: Arc<dyn UserStore>,
    pub projects: Arc<dyn ProjectStore>,
}

impl AppState {
    pub async fn new(config: Settings) -> Result<Self> {
        let db = DbOperations::new_with_options(
            &config.database.url,
            config.database.max_connections,
            Duration::from_secs(5),
        )
        .await?;
        sqlx::migrate!().run(db.pool()).await?;
        let db = Arc::new(db);

        Ok(Self::with_stores(config, db.clone(), db))
    }

    /// Wires the state around explicit store implementations; the test
    /// suites use this with an in-memory double.
    pub fn with_stores(
        config: Settings,
        users: Arc<dyn UserStore>,
        projects: Arc<dyn ProjectStore>,
    ) -> Self {
        let tokens = TokenIssuer::from_settings(&config.auth);
        let auth = AuthService::new(users.clone(), tokens, config.auth.bcrypt_cost);

        Self {
            config: Arc::new(config),
            auth,
            users,
            projects,
        }
    }
}

/// Registers every route; shared by `main` and the integration tests so the
/// two can never drift apart.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .service(
            web::scope("/auth")
                .route("/register", web::post().to(auth::handlers::register))
                .route("/login", web::post().to(auth::handlers::login))
                .route("/refresh", web::post().to(auth::handlers::refresh))
                .route("/logout", web::post().to(auth::handlers::logout))
                .route("/me", web::get().to(auth::handlers::me))
                .route("/profile", web::put().to(auth::handlers::update_profile))
                .route("/change-password", web::post().to(auth::handlers::change_password)),
        )
        .service(
            web::scope("/api/users")
                .route("", web::post().to(users::handlers::create))
                .route("", web::get().to(users::handlers::list))
                .route("/{id}", web::get().to(users::handlers::get_detail))
                .route("/{id}", web::put().to(users::handlers::update))
                .route("/{id}", web::delete().to(users::handlers::remove)),
        )
        .service(
            web::scope("/api/projects")
                .route("", web::post().to(projects::handlers::create))
                .route("", web::get().to(projects::handlers::list))
                .route("/{id}", web::get().to(projects::handlers::get_detail))
                .route("/{id}", web::put().to(projects::handlers::update))
                .route("/{id}", web::delete().to(projects::handlers::remove)),
        );
}
