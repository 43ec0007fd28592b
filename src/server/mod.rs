//! HTTP surface
//!
//! Routes:
//!
//! - `POST /tools/{tool}`: invoke a tool with the JSON body as input
//! - `GET /tools/{tool}/options`: declared options of a tool
//! - `GET /tools`: registered tool names
//! - `POST /api/v1/chat-tools?tool=` and `GET /api/v1/tools-options?tool_name=`:
//!   legacy spellings of the first two routes
//! - `GET /health`

mod error;
mod handlers;

use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::dispatch::ToolDispatcher;

pub use error::{ApiError, ApiErrorBody};
pub use handlers::ToolList;

pub(crate) struct AppState {
    pub(crate) dispatcher: Arc<ToolDispatcher>,
}

/// Builds the application router around a dispatcher
pub fn router(dispatcher: Arc<ToolDispatcher>) -> Router {
    let state = Arc::new(AppState { dispatcher });
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health))
        .route("/tools", get(handlers::list_tools))
        .route("/tools/:tool", post(handlers::invoke_tool))
        .route("/tools/:tool/options", get(handlers::tool_options))
        .route("/api/v1/chat-tools", post(handlers::legacy_invoke_tool))
        .route("/api/v1/tools-options", get(handlers::legacy_tool_options))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Bound HTTP server
pub struct Server {
    listener: TcpListener,
    router: Router,
}

impl Server {
    pub async fn bind(addr: SocketAddr, dispatcher: Arc<ToolDispatcher>) -> io::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        Ok(Self {
            listener,
            router: router(dispatcher),
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Serves requests until `shutdown` resolves
    pub async fn run_until<F>(self, shutdown: F) -> io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = self.local_addr()?;
        info!("toolgate listening on {}", addr);

        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await
    }
}
