mod config;
mod domain;
mod infrastructure;
mod presentation;
mod usecase;

#[cfg(test)]
mod test_support;

use axum::{Router, extract::DefaultBodyLimit};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tokio::net::TcpListener;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::{
    config::AppConfig,
    infrastructure::{
        argon2_password_hasher::Argon2PasswordHasher,
        credit_card_repository::SeaOrmCreditCardRepository, local_photo_storage::LocalPhotoStorage,
        logging::init_logging, photo_repository::SeaOrmPhotoRepository, schema::create_schema,
        user_repository::SeaOrmUserRepository,
    },
    presentation::{handlers::user_handler::create_user_router, middleware::api_key::ApiKey},
    usecase::{
        query_user_usecase::QueryUserUsecase, register_user_usecase::RegisterUserUsecase,
        update_user_usecase::UpdateUserUsecase,
    },
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_env()?;
    init_logging(&config.logging);

    let mut opt = ConnectOptions::new(config.database_url.clone());
    opt.max_connections(config.db_max_connections)
        .min_connections(1)
        .sqlx_logging(true);

    let db = Database::connect(opt).await?;
    create_schema(&db).await?;
    tokio::fs::create_dir_all(&config.save_dir).await?;

    let app = build_app(db, &config);

    let addr = config.socket_addr();
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, save_dir = %config.save_dir.display(), "Listening");
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}

fn build_app(db: DatabaseConnection, config: &AppConfig) -> Router {
    let user_repository = SeaOrmUserRepository::new(db.clone());
    let credit_card_repository = SeaOrmCreditCardRepository::new();
    let photo_repository = SeaOrmPhotoRepository::new();
    let password_hasher = Argon2PasswordHasher::new();
    let photo_storage = LocalPhotoStorage::new(config.save_dir.clone());

    let register_user_usecase = RegisterUserUsecase::new(
        db.clone(),
        user_repository.clone(),
        credit_card_repository.clone(),
        photo_repository.clone(),
        password_hasher.clone(),
        photo_storage.clone(),
    );
    let update_user_usecase = UpdateUserUsecase::new(
        db,
        user_repository.clone(),
        credit_card_repository,
        photo_repository,
        password_hasher,
        photo_storage,
    );
    let query_user_usecase =
        QueryUserUsecase::new(user_repository, config.photo_url_prefix.clone());

    let mut app = Router::new().nest(
        "/user",
        create_user_router(
            register_user_usecase,
            update_user_usecase,
            query_user_usecase,
            ApiKey::new(config.api_key.as_str()),
        ),
    );

    // an absolute URL prefix means photos are served by something else
    let photo_route = config.photo_url_prefix.trim_end_matches('/');
    if photo_route.starts_with('/') {
        app = app.nest_service(photo_route, ServeDir::new(&config.save_dir));
    }

    app.layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(TraceLayer::new_for_http())
}
