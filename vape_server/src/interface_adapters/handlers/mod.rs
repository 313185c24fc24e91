pub mod game;
pub mod players;

use crate::interface_adapters::protocol::ErrorResponse;
use alloy::primitives::Address;
use axum::{Json, http::StatusCode};

pub type ErrorReply = (StatusCode, Json<ErrorResponse>);

// Helper to build a JSON error response.
pub(crate) fn error_response(status: StatusCode, message: impl Into<String>) -> ErrorReply {
    (
        status,
        Json(ErrorResponse {
            message: message.into(),
        }),
    )
}

// Any 20-byte hex string, checksummed or not.
pub(crate) fn parse_player(raw: &str) -> Result<Address, ErrorReply> {
    raw.parse::<Address>().map_err(|_| {
        error_response(
            StatusCode::BAD_REQUEST,
            format!("invalid player address: {raw}"),
        )
    })
}
