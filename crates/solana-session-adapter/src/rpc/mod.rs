/*
[INPUT]:  RPC endpoint configuration
[OUTPUT]: Balance queries against the network RPC endpoint
[POS]:    RPC layer - read-only network access
[UPDATE]: When adding new RPC read calls
*/

pub mod client;

pub use client::{lamports_to_sol, RpcClient, RpcConfig, LAMPORTS_PER_SOL};
