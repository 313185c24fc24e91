use crate::domain::ChainError;
use crate::interface_adapters::handlers::{ErrorReply, error_response, parse_player};
use crate::interface_adapters::protocol::{ActionResponse, PlayerView, RecentTransactionResponse};
use crate::interface_adapters::state::AppState;
use crate::use_cases::game_view::dialog;
use crate::use_cases::{ActionError, GameAction, PlayerViewUseCase, SubmitActionUseCase};
use alloy::primitives::Address;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use std::sync::Arc;

#[tracing::instrument(name = "player_view", skip(state))]
pub async fn player_view(
    State(state): State<Arc<AppState>>,
    Path(address): Path<String>,
) -> Result<Json<PlayerView>, ErrorReply> {
    let player = parse_player(&address)?;
    let snapshot = state.snapshot();

    let use_case = PlayerViewUseCase {
        reader: state.reader.as_ref(),
        desk: &state.desk,
        chain: &state.chain,
        gate: state.gate,
    };

    Ok(Json(use_case.execute(player, &snapshot).await))
}

// Submits `hit` or `dividend` for the player.
#[tracing::instrument(name = "submit_action", skip(state))]
pub async fn submit_action(
    State(state): State<Arc<AppState>>,
    Path((address, action)): Path<(String, String)>,
) -> Result<Json<ActionResponse>, ErrorReply> {
    let player = parse_player(&address)?;
    let action = parse_action(&action)?;
    submit(&state, player, action).await
}

#[tracing::instrument(name = "dismiss_dialog", skip(state))]
pub async fn dismiss_dialog(
    State(state): State<Arc<AppState>>,
    Path((address, action)): Path<(String, String)>,
) -> Result<Json<ActionResponse>, ErrorReply> {
    let player = parse_player(&address)?;
    let action = parse_action(&action)?;

    let flow = state.desk.dismiss(player, action);

    Ok(Json(ActionResponse {
        action: action.slug(),
        phase: flow.phase_name(),
        dialog: dialog(action, &flow, &state.chain),
    }))
}

#[tracing::instrument(name = "recent_transactions", skip(state))]
pub async fn recent_transactions(
    State(state): State<Arc<AppState>>,
    Path(address): Path<String>,
) -> Result<Json<Vec<RecentTransactionResponse>>, ErrorReply> {
    let player = parse_player(&address)?;

    let recent = state
        .desk
        .recent(player)
        .into_iter()
        .map(|tx| RecentTransactionResponse {
            hash: tx.hash.to_string(),
            description: tx.description,
            submitted_at: tx.submitted_at,
            explorer_link: state.chain.tx_link(tx.hash),
        })
        .collect();

    Ok(Json(recent))
}

fn parse_action(raw: &str) -> Result<GameAction, ErrorReply> {
    raw.parse::<GameAction>()
        .map_err(|e| error_response(StatusCode::NOT_FOUND, format!("unknown action: {}", e.0)))
}

async fn submit(
    state: &AppState,
    player: Address,
    action: GameAction,
) -> Result<Json<ActionResponse>, ErrorReply> {
    let snapshot = state.snapshot();

    let use_case = SubmitActionUseCase {
        reader: state.reader.as_ref(),
        wallet: state.wallet.as_ref(),
        clock: state.clock.as_ref(),
        desk: &state.desk,
        chain: &state.chain,
        gate: state.gate,
    };

    let receipt = use_case
        .execute(player, action, &snapshot)
        .await
        .map_err(map_action_error)?;

    Ok(Json(ActionResponse {
        action: receipt.action.slug(),
        phase: receipt.flow.phase_name(),
        dialog: receipt.dialog,
    }))
}

fn map_action_error(err: ActionError) -> ErrorReply {
    match err {
        ActionError::Paused
        | ActionError::PriceUnavailable
        | ActionError::NotEligible
        | ActionError::NothingToClaim
        | ActionError::InFlight
        | ActionError::Flow(_)
        | ActionError::NotPrepared(_)
        | ActionError::Rejected(ChainError::Rejected(_)) => {
            error_response(StatusCode::CONFLICT, err.to_string())
        }
        ActionError::Chain(ref e) | ActionError::Rejected(ref e) => {
            tracing::error!(error = %e, "chain unavailable during submission");
            error_response(StatusCode::BAD_GATEWAY, "chain node unavailable")
        }
    }
}
