// Generic binding surface: one ABI description per contract and a single
// encode/decode path instead of a wrapper per ABI entry.

use crate::domain::{ChainError, ContractCall, ContractKind};
use alloy::dyn_abi::{DynSolValue, EventExt, FunctionExt, JsonAbiExt};
use alloy::json_abi::{Event, Function, JsonAbi};
use alloy::primitives::{B256, Bytes, Selector};

const VAPE_GAME_ABI: &str = include_str!("../../abi/vape_game.json");
const ZOOMER_COIN_ABI: &str = include_str!("../../abi/zoomer_coin.json");

#[derive(Debug, Clone)]
pub struct AbiRegistry {
    game: JsonAbi,
    token: JsonAbi,
}

impl AbiRegistry {
    // ABIs bundled with the binary.
    pub fn embedded() -> Result<Self, ChainError> {
        Self::from_json(VAPE_GAME_ABI, ZOOMER_COIN_ABI)
    }

    pub fn from_json(game: &str, token: &str) -> Result<Self, ChainError> {
        let parse = |kind: ContractKind, raw: &str| {
            serde_json::from_str::<JsonAbi>(raw)
                .map_err(|e| ChainError::Abi(format!("invalid {kind} abi: {e}")))
        };

        Ok(Self {
            game: parse(ContractKind::Game, game)?,
            token: parse(ContractKind::Token, token)?,
        })
    }

    fn abi(&self, contract: ContractKind) -> &JsonAbi {
        match contract {
            ContractKind::Game => &self.game,
            ContractKind::Token => &self.token,
        }
    }

    /// Looks up a function by name, picking the overload whose arity matches.
    pub fn function(
        &self,
        contract: ContractKind,
        name: &str,
        arity: usize,
    ) -> Result<&Function, ChainError> {
        self.abi(contract)
            .function(name)
            .and_then(|overloads| overloads.iter().find(|f| f.inputs.len() == arity))
            .ok_or_else(|| {
                ChainError::Abi(format!("{contract} has no function {name} taking {arity} args"))
            })
    }

    pub fn function_by_selector(
        &self,
        contract: ContractKind,
        selector: Selector,
    ) -> Option<&Function> {
        self.abi(contract)
            .functions()
            .find(|function| function.selector() == selector)
    }

    pub fn event(&self, contract: ContractKind, name: &str) -> Result<&Event, ChainError> {
        self.abi(contract)
            .event(name)
            .and_then(|overloads| overloads.first())
            .ok_or_else(|| ChainError::Abi(format!("{contract} has no event {name}")))
    }

    pub fn encode_call(&self, call: &ContractCall) -> Result<Bytes, ChainError> {
        let function = self.function(call.contract, call.function, call.args.len())?;
        function
            .abi_encode_input(&call.args)
            .map(Bytes::from)
            .map_err(|e| ChainError::Abi(format!("failed to encode {}: {e}", call.function)))
    }

    pub fn decode_output(
        &self,
        call: &ContractCall,
        data: &[u8],
    ) -> Result<Vec<DynSolValue>, ChainError> {
        let function = self.function(call.contract, call.function, call.args.len())?;
        function
            .abi_decode_output(data)
            .map_err(|e| ChainError::Decode(format!("failed to decode {}: {e}", call.function)))
    }

    pub fn event_topic(&self, contract: ContractKind, name: &str) -> Result<B256, ChainError> {
        Ok(self.event(contract, name)?.selector())
    }

    /// Decodes a log into `(name, value)` pairs in ABI input order.
    pub fn decode_log(
        &self,
        contract: ContractKind,
        name: &str,
        topics: &[B256],
        data: &[u8],
    ) -> Result<Vec<(String, DynSolValue)>, ChainError> {
        let event = self.event(contract, name)?;
        let decoded = event
            .decode_log_parts(topics.iter().copied(), data)
            .map_err(|e| ChainError::Decode(format!("failed to decode {name} log: {e}")))?;

        let mut indexed = decoded.indexed.into_iter();
        let mut body = decoded.body.into_iter();
        event
            .inputs
            .iter()
            .map(|input| {
                let value = if input.indexed {
                    indexed.next()
                } else {
                    body.next()
                };
                value
                    .map(|value| (input.name.clone(), value))
                    .ok_or_else(|| ChainError::Decode(format!("{name} log is missing {}", input.name)))
            })
            .collect()
    }
}
