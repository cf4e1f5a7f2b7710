//! Demo bootstrap binary for the town session core: wires a [`town_core::TownRegistry`]
//! to a stub media-token broker and drives it from a line-oriented console.

pub mod broker;
pub mod command;
pub mod config;
pub mod server;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use town_core::TownRegistry;

use broker::StubTokenBroker;
use server::Server;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let registry = Arc::new(TownRegistry::new(Arc::new(StubTokenBroker)));
    Server::new(registry).run();
}
