use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::{
    header::{ACCEPT, CONTENT_TYPE},
    HeaderName, Method,
};
use common_auth::TokenSigner;
use sqlx::PgPool;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

use account_service::config::load_config;
use account_service::revocation::RedisRevocationStore;
use account_service::users::PgUserStore;
use account_service::{router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let config = load_config()?;

    let db_pool = PgPool::connect(&config.database_url).await?;
    let revocation = RedisRevocationStore::new(&config.redis_url).await?;

    let state = AppState {
        signer: Arc::new(TokenSigner::new(config.token.clone())),
        revocation: Arc::new(revocation),
        users: Arc::new(PgUserStore::new(db_pool)),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            ACCEPT,
            CONTENT_TYPE,
            HeaderName::from_static("authorization"),
        ]);

    let app = router(state).layer(cors);

    let ip: std::net::IpAddr = config.host.parse()?;
    let addr = SocketAddr::from((ip, config.port));

    tracing::info!(%addr, "starting account-service");
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
