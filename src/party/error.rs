//! Custom error types for [crate::party]

use std::time::Duration;

/// Failure of one participant agent. Every variant names the failing call so
/// a timed-out call is never mistaken for a successful zero-value response.
#[derive(thiserror::Error, Debug)]
pub enum PartyError {
    #[error("[{to}] {call} timed out after {timeout:?}")]
    Timeout {
        call: &'static str,
        to: String,
        timeout: Duration,
    },
    #[error("[{to}] {call} failed: {status}")]
    Rpc {
        call: &'static str,
        to: String,
        status: tonic::Status,
    },
    #[error("peers did not reach the {round} barrier within {timeout:?}")]
    Barrier {
        round: &'static str,
        timeout: Duration,
    },
    #[error("cannot reach relay: {0}")]
    Connect(#[from] tonic::transport::Error),
}

pub type PartyResult<Success> = Result<Success, PartyError>;
