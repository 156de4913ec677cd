pub mod config;
pub mod party;
pub mod relay;
pub mod runner;
pub mod transport;

// protocol buffers via tonic
pub mod proto {
    tonic::include_proto!("sumd");
}

// error handling
pub type SumdResult<Success> = anyhow::Result<Success>;

use std::net::SocketAddr;

pub fn addr(port: u16) -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], port))
}

#[cfg(test)]
mod tests;
