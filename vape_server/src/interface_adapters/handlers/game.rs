use crate::interface_adapters::handlers::{ErrorReply, error_response};
use crate::interface_adapters::protocol::{GameView, HitRecord, HitsQuery};
use crate::interface_adapters::state::AppState;
use crate::use_cases::{RecentHitsUseCase, build_game_view};
use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use std::sync::Arc;

#[tracing::instrument(name = "game_view", skip_all)]
pub async fn game_view(State(state): State<Arc<AppState>>) -> Json<GameView> {
    let snapshot = state.snapshot();
    let now = state.clock.now_epoch_seconds();

    Json(build_game_view(&snapshot, &state.chain, now))
}

#[tracing::instrument(name = "recent_hits", skip_all, fields(from_block = ?query.from_block))]
pub async fn recent_hits(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HitsQuery>,
) -> Result<Json<Vec<HitRecord>>, ErrorReply> {
    let use_case = RecentHitsUseCase {
        reader: state.reader.as_ref(),
        chain: &state.chain,
        lookback_blocks: state.hit_lookback_blocks,
    };

    let hits = use_case.execute(query.from_block).await.map_err(|e| {
        tracing::error!(error = %e, "failed to load recent hits");
        error_response(StatusCode::BAD_GATEWAY, "failed to load recent hits")
    })?;

    Ok(Json(hits))
}
