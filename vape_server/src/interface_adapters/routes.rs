use crate::interface_adapters::handlers::game::{game_view, recent_hits};
use crate::interface_adapters::handlers::players::{
    dismiss_dialog, player_view, recent_transactions, submit_action,
};
use crate::interface_adapters::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/game", get(game_view))
        .route("/game/hits", get(recent_hits))
        .route("/game/players/{address}", get(player_view))
        .route("/game/players/{address}/{action}", post(submit_action))
        .route(
            "/game/players/{address}/{action}/dismiss",
            post(dismiss_dialog),
        )
        .route(
            "/game/players/{address}/transactions",
            get(recent_transactions),
        )
        .with_state(state)
}
