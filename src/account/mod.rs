//! RunPod account API: typed snapshot plus the one-shot GraphQL client.

pub mod client;
pub mod snapshot;
