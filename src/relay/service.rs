use std::sync::Arc;

use tonic::{Request, Response, Status};

use crate::proto;

use super::store::AggregationStore;

// logging
use tracing::info;

/// `RelayService` is the gRPC wrapper around [AggregationStore].
///
/// Every rpc answers from the current store state: submissions accumulate,
/// queries return whatever has arrived so far. The service never waits for
/// "all expected senders"; round ordering is the participants' job.
#[derive(Clone)]
pub struct RelayService {
    store: Arc<AggregationStore>,
    #[cfg(test)]
    response_delay: Option<std::time::Duration>,
}

impl RelayService {
    /// Creates a service over an explicitly constructed, run-scoped store.
    pub fn new(store: Arc<AggregationStore>) -> Self {
        Self {
            store,
            #[cfg(test)]
            response_delay: None,
        }
    }

    /// Service that stalls every response, to exercise client-side timeouts.
    #[cfg(test)]
    pub(crate) fn with_response_delay(
        store: Arc<AggregationStore>,
        delay: std::time::Duration,
    ) -> Self {
        Self {
            store,
            response_delay: Some(delay),
        }
    }

    async fn stall(&self) {
        #[cfg(test)]
        if let Some(delay) = self.response_delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[tonic::async_trait]
impl proto::share_relay_server::ShareRelay for RelayService {
    async fn submit_share(
        &self,
        request: Request<proto::Share>,
    ) -> Result<Response<proto::Ack>, Status> {
        self.stall().await;
        let share = request.into_inner();

        let total = self.store.add_share(&share.to, share.part);
        info!(
            "[{}] share from [{}] accumulated, running total {}",
            share.to, share.from, total
        );

        Ok(Response::new(proto::Ack {
            message: "share received".to_string(),
        }))
    }

    async fn submit_out_share(
        &self,
        request: Request<proto::OutShare>,
    ) -> Result<Response<proto::Ack>, Status> {
        self.stall().await;
        let out_share = request.into_inner();

        let total = self.store.add_out_share(&out_share.to, out_share.data);
        info!(
            "[{}] out-share from [{}] accumulated, running total {}",
            out_share.to, out_share.from, total
        );

        Ok(Response::new(proto::Ack {
            message: "out-share received".to_string(),
        }))
    }

    async fn get_aggregated_shares(
        &self,
        request: Request<proto::AggregateRequest>,
    ) -> Result<Response<proto::AggregateResponse>, Status> {
        self.stall().await;
        let request = request.into_inner();

        let total = self.store.shares_for(&request.participant);
        info!("[{}] aggregated shares queried: {}", request.participant, total);

        Ok(Response::new(proto::AggregateResponse { total }))
    }

    async fn get_aggregated_out_shares(
        &self,
        request: Request<proto::AggregateRequest>,
    ) -> Result<Response<proto::AggregateResponse>, Status> {
        self.stall().await;
        let request = request.into_inner();

        let total = self.store.out_shares_for(&request.participant);
        info!(
            "[{}] aggregated out-shares queried: {}",
            request.participant, total
        );

        Ok(Response::new(proto::AggregateResponse { total }))
    }
}
