use std::{future::Future, sync::Arc, time::Duration};

use futures_util::future::try_join_all;
use tokio::sync::Barrier;
use tonic::transport::Channel;

use crate::proto::{self, share_relay_client::ShareRelayClient};

use super::{
    error::{PartyError, PartyResult},
    split::split_into_parts,
};

// logging
use tracing::info;

/// One participant of the two-round sum protocol.
///
/// A party splits its private input into one part per participant, retains
/// one part, relays the rest through the coordinating service, and combines
/// the retained part with the aggregates it queries back. The shared barrier
/// is the round boundary: no party queries a round's aggregate until every
/// party has finished that round's sends, which is what makes the final sums
/// deterministic rather than timing-dependent.
pub struct Party {
    uid: String,
    input: i64,
    peers: Vec<String>,
    client: ShareRelayClient<Channel>,
    barrier: Arc<Barrier>,
    call_timeout: Duration,
}

impl Party {
    /// `barrier` must be sized to the total participant count (peers + 1) and
    /// shared by every party of the run.
    pub fn new(
        uid: String,
        input: i64,
        peers: Vec<String>,
        client: ShareRelayClient<Channel>,
        barrier: Arc<Barrier>,
        call_timeout: Duration,
    ) -> Self {
        Self {
            uid,
            input,
            peers,
            client,
            barrier,
            call_timeout,
        }
    }

    /// Runs the protocol to completion and returns this party's final sum,
    /// which equals the sum of all participants' private inputs.
    pub async fn run(mut self) -> PartyResult<i64> {
        // round 1: split, fan out one share per peer, retain the first part
        let parts = split_into_parts(self.input, self.peers.len() + 1);
        let retained = parts[0];

        let sends = self.peers.iter().zip(&parts[1..]).map(|(peer, part)| {
            let share = proto::Share {
                from: self.uid.clone(),
                to: peer.clone(),
                part: *part,
            };
            let mut client = self.client.clone();
            let peer = peer.clone();
            let timeout = self.call_timeout;
            async move {
                with_timeout("SubmitShare", &peer, timeout, client.submit_share(share)).await
            }
        });
        try_join_all(sends).await?;

        self.wait_at_barrier("share").await?;

        let aggregated = with_timeout(
            "GetAggregatedShares",
            &self.uid,
            self.call_timeout,
            self.client.get_aggregated_shares(proto::AggregateRequest {
                participant: self.uid.clone(),
            }),
        )
        .await?
        .total;
        let partial_sum = retained + aggregated;
        info!("[{}] round 1 complete, partial sum {}", self.uid, partial_sum);

        // round 2: fan out the partial sum, then query the peers' partials
        let sends = self.peers.iter().map(|peer| {
            let out_share = proto::OutShare {
                from: self.uid.clone(),
                to: peer.clone(),
                data: partial_sum,
            };
            let mut client = self.client.clone();
            let peer = peer.clone();
            let timeout = self.call_timeout;
            async move {
                with_timeout(
                    "SubmitOutShare",
                    &peer,
                    timeout,
                    client.submit_out_share(out_share),
                )
                .await
            }
        });
        try_join_all(sends).await?;

        self.wait_at_barrier("out-share").await?;

        let aggregated_out = with_timeout(
            "GetAggregatedOutShares",
            &self.uid,
            self.call_timeout,
            self.client
                .get_aggregated_out_shares(proto::AggregateRequest {
                    participant: self.uid.clone(),
                }),
        )
        .await?
        .total;
        let final_sum = partial_sum + aggregated_out;
        info!("[{}] round 2 complete, final sum {}", self.uid, final_sum);

        Ok(final_sum)
    }

    /// Round barrier between a round's sends and its aggregate query. The
    /// wait is bounded so a peer that died before its sends surfaces here as
    /// an error instead of a hang.
    async fn wait_at_barrier(&self, round: &'static str) -> PartyResult<()> {
        tokio::time::timeout(self.call_timeout, self.barrier.wait())
            .await
            .map(|_| ())
            .map_err(|_| PartyError::Barrier {
                round,
                timeout: self.call_timeout,
            })
    }
}

/// Awaits one rpc under the per-call timeout, mapping both failure modes to
/// a diagnostic that names the call and its target.
async fn with_timeout<T>(
    call: &'static str,
    to: &str,
    timeout: Duration,
    fut: impl Future<Output = Result<tonic::Response<T>, tonic::Status>>,
) -> PartyResult<T> {
    match tokio::time::timeout(timeout, fut).await {
        Ok(Ok(response)) => Ok(response.into_inner()),
        Ok(Err(status)) => Err(PartyError::Rpc {
            call,
            to: to.to_string(),
            status,
        }),
        Err(_) => Err(PartyError::Timeout {
            call,
            to: to.to_string(),
            timeout,
        }),
    }
}
