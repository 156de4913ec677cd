//! The coordinating-service side of the relay: a run-scoped accumulator and
//! the gRPC service wrapped around it.

mod service;
mod store;

pub use service::RelayService;
pub use store::AggregationStore;

#[cfg(test)]
mod tests;
