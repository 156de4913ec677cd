//! The participant side of the relay: input splitting and the two-round
//! protocol a party runs against the coordinating service.

mod agent;
mod error;
mod split;

pub use agent::Party;
pub use error::PartyError;
pub use split::split_into_parts;

#[cfg(test)]
mod tests;
