use axum::{routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

use crate::config::app_conf::AppConfig;
use crate::config::mongo_conf::MongoConfig;
use crate::repository::quote_repo::MongoQuoteRepository;
use crate::repository::user_repo::MongoUserRepository;
use crate::router::quote_router::quote_router;
use crate::service::quote_service::QuoteServiceImpl;

pub struct App {
    config: AppConfig,
    router: Router,
    pub quote_service: Arc<QuoteServiceImpl>,
}

impl App {
    pub async fn new() -> Self {
        let config = AppConfig::from_env();
        let mongo_config = MongoConfig::from_env().expect("Mongo config error");

        let quote_repo = Arc::new(
            MongoQuoteRepository::new(&mongo_config)
                .await
                .expect("Quote repo error"),
        );
        let user_repo = Arc::new(
            MongoUserRepository::new(&mongo_config)
                .await
                .expect("User repo error"),
        );
        let quote_service = Arc::new(QuoteServiceImpl::new(quote_repo, user_repo));

        let router = Router::new()
            .merge(quote_router(quote_service.clone()))
            .route("/health", get(|| async { "OK" }));

        App {
            config,
            router,
            quote_service,
        }
    }

    pub async fn start(self) {
        let addr = SocketAddr::new(self.config.host.parse().expect("Invalid host"), self.config.port);
        info!("Server running at http://{}", addr);
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .expect("Failed to bind address");
        axum::serve(listener, self.router)
            .await
            .expect("Failed to start server");
    }
}
