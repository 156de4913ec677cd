//! Launches one [Party] per participant and waits for all of them.

use std::{sync::Arc, time::Duration};

use tokio::sync::Barrier;
use tonic::transport::{Channel, ClientTlsConfig, Endpoint};

use crate::{
    config::PartyConfig,
    party::{Party, PartyError},
    proto::share_relay_client::ShareRelayClient,
    SumdResult,
};

/// Terminal state of one participant: its final sum, or the failure that
/// aborted it.
pub struct PartyOutcome {
    pub uid: String,
    pub result: Result<i64, PartyError>,
}

/// Runs the full two-round protocol for `parties` against the relay at
/// `endpoint`, one concurrent task per participant.
///
/// A failing agent is confined to its own [PartyOutcome]; the others keep
/// running (a failure before the round barrier shows up at the peers as a
/// barrier timeout). Parties exchange nothing through the runner; all
/// communication goes through the relay.
pub async fn run_parties(
    endpoint: &str,
    tls: Option<ClientTlsConfig>,
    parties: &[PartyConfig],
    call_timeout: Duration,
) -> SumdResult<Vec<PartyOutcome>> {
    let names: Vec<String> = parties.iter().map(|p| p.name.clone()).collect();
    let barrier = Arc::new(Barrier::new(parties.len()));

    let handles: Vec<_> = parties
        .iter()
        .map(|party| {
            let uid = party.name.clone();
            let input = party.input;
            let peers = names
                .iter()
                .filter(|name| **name != party.name)
                .cloned()
                .collect();
            let endpoint = endpoint.to_string();
            let tls = tls.clone();
            let barrier = barrier.clone();

            tokio::spawn(async move {
                let result =
                    connect_and_run(endpoint, tls, uid.clone(), input, peers, barrier, call_timeout)
                        .await;
                PartyOutcome { uid, result }
            })
        })
        .collect();

    let mut outcomes = Vec::with_capacity(handles.len());
    for handle in handles {
        outcomes.push(handle.await?);
    }
    Ok(outcomes)
}

// Each party holds its own channel to the relay, as the original deployment
// gives each participant its own client connection.
async fn connect_and_run(
    endpoint: String,
    tls: Option<ClientTlsConfig>,
    uid: String,
    input: i64,
    peers: Vec<String>,
    barrier: Arc<Barrier>,
    call_timeout: Duration,
) -> Result<i64, PartyError> {
    let channel = connect(endpoint, tls).await?;
    let client = ShareRelayClient::new(channel);
    Party::new(uid, input, peers, client, barrier, call_timeout)
        .run()
        .await
}

async fn connect(endpoint: String, tls: Option<ClientTlsConfig>) -> Result<Channel, PartyError> {
    let mut endpoint = Endpoint::from_shared(endpoint)?;
    if let Some(tls) = tls {
        endpoint = endpoint.tls_config(tls)?;
    }
    Ok(endpoint.connect().await?)
}
