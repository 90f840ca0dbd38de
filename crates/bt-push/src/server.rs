//! HTTP routes and the per-connection WebSocket loop.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;
use tracing::{debug, info, warn};

use bt_core::GeoPoint;
use bt_route::{
    DirectionsProvider, Route, RouteProvider, RouteResult, RouteTable, StraightLineProvider,
    load_table_csv,
};

use crate::wire::{self, ServerMessage};
use crate::{PushResult, ServerConfig, Session};

// ── Provider selection ────────────────────────────────────────────────────────

/// The route provider chosen at startup: HTTP directions when a key is
/// configured, straight lines otherwise.
pub enum AnyProvider {
    Directions(DirectionsProvider),
    StraightLine(StraightLineProvider),
}

impl AnyProvider {
    pub fn from_config(config: &ServerConfig) -> PushResult<Self> {
        Ok(match &config.directions {
            Some(directions) => AnyProvider::Directions(DirectionsProvider::new(directions.clone())?),
            None => AnyProvider::StraightLine(StraightLineProvider::default()),
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            AnyProvider::Directions(_) => "directions",
            AnyProvider::StraightLine(_) => "straight-line",
        }
    }
}

impl RouteProvider for AnyProvider {
    fn resolve(
        &self,
        origin:      GeoPoint,
        destination: GeoPoint,
    ) -> impl Future<Output = RouteResult<Route>> + Send {
        async move {
            match self {
                AnyProvider::Directions(p) => p.resolve(origin, destination).await,
                AnyProvider::StraightLine(p) => p.resolve(origin, destination).await,
            }
        }
    }
}

// ── Shared state ──────────────────────────────────────────────────────────────

/// Everything a connection needs, shared across all of them.
#[derive(Clone)]
pub struct AppState {
    pub config:   Arc<ServerConfig>,
    pub provider: Arc<AnyProvider>,
    pub table:    Arc<RouteTable>,
    next_session: Arc<AtomicU64>,
}

impl AppState {
    /// Validate `config`, load the route table and pick the provider.
    pub fn from_config(config: ServerConfig) -> PushResult<Self> {
        config.validate()?;
        let table = match &config.route_table {
            Some(path) => load_table_csv(path)?,
            None => RouteTable::empty(),
        };
        let provider = AnyProvider::from_config(&config)?;
        info!(
            provider = provider.name(),
            lines = table.len(),
            fleet_size = config.fleet_size,
            "server state ready"
        );
        Ok(Self::new(config, provider, table))
    }

    pub fn new(config: ServerConfig, provider: AnyProvider, table: RouteTable) -> Self {
        Self {
            config:       Arc::new(config),
            provider:     Arc::new(provider),
            table:        Arc::new(table),
            next_session: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Open a fresh session with the next id.
    pub fn open_session(&self) -> PushResult<Session<AnyProvider>> {
        let id = self.next_session.fetch_add(1, Ordering::Relaxed);
        Session::new(
            id,
            Arc::clone(&self.provider),
            Arc::clone(&self.table),
            Arc::clone(&self.config),
        )
    }
}

// ── Routes ────────────────────────────────────────────────────────────────────

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/ws", get(ws_handler))
        .with_state(state)
        .layer(CorsLayer::permissive())
}

async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| serve_socket(socket, state))
}

/// Drive one client: answer requests and forward tick updates until the
/// socket closes, then stop the client's simulation.
async fn serve_socket(mut socket: WebSocket, state: AppState) {
    let mut session = match state.open_session() {
        Ok(session) => session,
        Err(e) => {
            warn!(error = %e, "could not open session");
            return;
        }
    };
    let mut updates = session.subscribe();
    info!(session = session.id(), "client connected");

    loop {
        tokio::select! {
            incoming = socket.recv() => {
                let reply = match incoming {
                    Some(Ok(Message::Text(text))) => match wire::decode(&text) {
                        Ok(request) => session.handle(request).await,
                        Err(e) => ServerMessage::error(e),
                    },
                    Some(Ok(Message::Close(_))) | None => break,
                    // Pings are answered by axum; binary frames are ignored.
                    Some(Ok(_)) => continue,
                    Some(Err(e)) => {
                        debug!(session = session.id(), error = %e, "socket error");
                        break;
                    }
                };
                if send(&mut socket, &reply).await.is_err() {
                    break;
                }
            }
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let update = updates.borrow_and_update().clone();
                if let Some(update) = update {
                    if send(&mut socket, &update).await.is_err() {
                        break;
                    }
                }
            }
        }
    }

    session.close();
    info!(session = session.id(), "client disconnected");
}

async fn send(socket: &mut WebSocket, message: &ServerMessage) -> PushResult<()> {
    let text = wire::encode(message)?;
    socket.send(Message::Text(text.into())).await?;
    Ok(())
}
