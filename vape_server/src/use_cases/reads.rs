// Typed reads on top of the generic contract call.

use crate::domain::ports::{saturating_u64, single_address, single_bool, single_uint};
use crate::domain::{ChainError, ChainReader, ContractCall, ReadState};
use crate::use_cases::types::PlayerSnapshot;
use alloy::primitives::{Address, U256};

pub async fn read_uint(reader: &dyn ChainReader, call: ContractCall) -> Result<U256, ChainError> {
    let function = call.function;
    reader
        .read(&call)
        .await
        .and_then(single_uint)
        .inspect_err(|error| tracing::warn!(function, %error, "contract read failed"))
}

pub async fn read_seconds(
    reader: &dyn ChainReader,
    call: ContractCall,
) -> Result<u64, ChainError> {
    read_uint(reader, call).await.map(saturating_u64)
}

pub async fn read_bool(reader: &dyn ChainReader, call: ContractCall) -> Result<bool, ChainError> {
    let function = call.function;
    reader
        .read(&call)
        .await
        .and_then(single_bool)
        .inspect_err(|error| tracing::warn!(function, %error, "contract read failed"))
}

pub async fn read_address(
    reader: &dyn ChainReader,
    call: ContractCall,
) -> Result<Address, ChainError> {
    let function = call.function;
    reader
        .read(&call)
        .await
        .and_then(single_address)
        .inspect_err(|error| tracing::warn!(function, %error, "contract read failed"))
}

// Reads everything the player widgets need, concurrently.
pub async fn load_player(reader: &dyn ChainReader, player: Address) -> PlayerSnapshot {
    let (token_balance, dividend, has_enough_zoomer) = tokio::join!(
        read_uint(reader, ContractCall::token("balanceOf").address_arg(player)),
        read_uint(reader, ContractCall::game("getMyDividend").address_arg(player)),
        read_bool(reader, ContractCall::game("hasEnoughZoomer").address_arg(player)),
    );

    PlayerSnapshot {
        token_balance: ReadState::from(token_balance),
        dividend: ReadState::from(dividend),
        has_enough_zoomer: ReadState::from(has_enough_zoomer),
    }
}
