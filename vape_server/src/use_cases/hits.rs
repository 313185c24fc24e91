use crate::domain::amount::eth_display;
use crate::domain::{ChainContext, ChainError, ChainReader, ContractKind, DecodedLog};
use crate::interface_adapters::protocol::HitRecord;
use alloy::dyn_abi::DynSolValue;
use alloy::primitives::U256;

const HIT_EVENT: &str = "TookAHit";

// Feed of recent TookAHit events, newest first.
pub struct RecentHitsUseCase<'a> {
    pub reader: &'a dyn ChainReader,
    pub chain: &'a ChainContext,
    pub lookback_blocks: u64,
}

impl RecentHitsUseCase<'_> {
    pub async fn execute(&self, from_block: Option<u64>) -> Result<Vec<HitRecord>, ChainError> {
        let from_block = match from_block {
            Some(block) => block,
            None => self
                .reader
                .block_number()
                .await?
                .saturating_sub(self.lookback_blocks),
        };

        let logs = self
            .reader
            .events(ContractKind::Game, HIT_EVENT, from_block)
            .await?;
        tracing::debug!(from_block, count = logs.len(), "hit logs fetched");

        let mut records = logs
            .iter()
            .map(|log| hit_record(log, self.chain))
            .collect::<Result<Vec<_>, _>>()?;
        records.sort_by(|a, b| b.block_number.cmp(&a.block_number));
        Ok(records)
    }
}

fn hit_record(log: &DecodedLog, chain: &ChainContext) -> Result<HitRecord, ChainError> {
    let player = match log.field("user") {
        Some(DynSolValue::Address(address)) => *address,
        _ => return Err(missing("user")),
    };

    Ok(HitRecord {
        player: player.to_string(),
        amount: eth_display(uint_field(log, "amount")?),
        pot_value: eth_display(uint_field(log, "potValueETH")?),
        next_hit_price: eth_display(uint_field(log, "nextHitPrice")?),
        block_number: log.block_number,
        tx_hash: log.tx_hash.to_string(),
        explorer_link: chain.tx_link(log.tx_hash),
    })
}

fn uint_field(log: &DecodedLog, name: &str) -> Result<U256, ChainError> {
    match log.field(name) {
        Some(DynSolValue::Uint(value, _)) => Ok(*value),
        _ => Err(missing(name)),
    }
}

fn missing(name: &str) -> ChainError {
    ChainError::Decode(format!("{HIT_EVENT} log has no {name} field"))
}
