use std::net::SocketAddr;
use std::path::PathBuf;

use axum::http::{header, HeaderValue};
use axum::routing::get;
use axum::Router;
use axum_server::tls_rustls::RustlsConfig;
use clap::Parser;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod boards;
mod handlers;
mod relay;
mod state;

use crate::handlers::{
    board_page_handler, index_handler, ping_handler, ws_default_handler, ws_handler,
};
use crate::state::{AppState, DEFAULT_MAX_FRAME_BYTES};

#[derive(Parser)]
#[command(author, version, about = "Relay server for the shared whiteboard")]
struct Args {
    #[arg(long, env = "PORT", default_value_t = 3000)]
    port: u16,
    #[arg(long, env = "PUBLIC_DIR")]
    public_dir: Option<PathBuf>,
    /// Frames above this size are dropped instead of relayed.
    #[arg(long, env = "MAX_FRAME_BYTES", default_value_t = DEFAULT_MAX_FRAME_BYTES)]
    max_frame_bytes: usize,
    #[arg(long, env = "TLS_CERT", requires = "tls_key")]
    tls_cert: Option<PathBuf>,
    #[arg(long, env = "TLS_KEY", requires = "tls_cert")]
    tls_key: Option<PathBuf>,
}

pub(crate) fn build_router(state: AppState, public_dir: PathBuf) -> Router {
    let index_file = public_dir.join("index.html");

    Router::new()
        .route("/", get(index_handler))
        .route("/s/:board_id", get(board_page_handler))
        .route("/ws", get(ws_default_handler))
        .route("/ws/:board_id", get(ws_handler))
        .route("/ping", get(ping_handler))
        .fallback_service(ServeDir::new(public_dir).append_index_html_on_directories(true))
        .layer(axum::Extension(index_file))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-cache"),
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "relayboard_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let public_dir = args
        .public_dir
        .unwrap_or_else(|| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../public"));
    let state = AppState::new(args.max_frame_bytes);
    let app = build_router(state, public_dir);

    let addr = SocketAddr::from(([0, 0, 0, 0], args.port));
    match (args.tls_cert, args.tls_key) {
        (Some(cert), Some(key)) => {
            let config = RustlsConfig::from_pem_file(cert, key).await?;
            info!("Whiteboard running at https://localhost:{}", args.port);
            axum_server::bind_rustls(addr, config)
                .serve(app.into_make_service())
                .await
        }
        _ => {
            let listener = tokio::net::TcpListener::bind(addr).await?;
            info!("Whiteboard running at http://localhost:{}", args.port);
            axum::serve(listener, app).await
        }
    }
}
