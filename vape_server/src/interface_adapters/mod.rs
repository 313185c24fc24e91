// Interface adapters: ABI codec, JSON-RPC clients and the HTTP surface.

pub mod abi;
pub mod clients;
pub mod handlers;
pub mod protocol;
pub mod routes;
pub mod state;
