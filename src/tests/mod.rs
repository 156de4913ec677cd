//! End-to-end runs of the two-round protocol against an in-process relay.

use std::{sync::Arc, time::Duration};

use rand::Rng;
use tokio::sync::Barrier;

use crate::{
    config::PartyConfig,
    party::{Party, PartyError},
    relay::{AggregationStore, RelayService},
    runner::run_parties,
};

mod relay_harness;
use relay_harness::TestRelay;

const CALL_TIMEOUT: Duration = Duration::from_secs(10);

fn parties(specs: &[(&str, i64)]) -> Vec<PartyConfig> {
    specs
        .iter()
        .map(|(name, input)| PartyConfig {
            name: name.to_string(),
            input: *input,
        })
        .collect()
}

#[tokio::test(flavor = "multi_thread")]
async fn three_parties_compute_the_reference_sum() {
    let store = Arc::new(AggregationStore::default());
    let relay = TestRelay::start(RelayService::new(store.clone())).await;

    let parties = parties(&[("alice", 30), ("bob", 300), ("carol", 100)]);
    let outcomes = run_parties(relay.endpoint(), None, &parties, CALL_TIMEOUT)
        .await
        .unwrap();

    assert_eq!(outcomes.len(), 3);
    for outcome in &outcomes {
        let sum = outcome.result.as_ref().unwrap();
        assert_eq!(*sum, 430, "party {} disagrees on the sum", outcome.uid);
    }

    // every party received one share from each of its two peers
    for party in ["alice", "bob", "carol"] {
        assert_ne!(store.shares_for(party), 0);
    }

    relay.shutdown().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn five_parties_with_mixed_sign_inputs() {
    let relay = TestRelay::start(RelayService::new(Arc::new(AggregationStore::default()))).await;

    let parties = parties(&[
        ("a", 7),
        ("b", -13),
        ("c", 0),
        ("d", 101),
        ("e", 5),
    ]);
    let outcomes = run_parties(relay.endpoint(), None, &parties, CALL_TIMEOUT)
        .await
        .unwrap();

    for outcome in &outcomes {
        assert_eq!(*outcome.result.as_ref().unwrap(), 100);
    }

    relay.shutdown().await;
}

#[tokio::test]
async fn single_party_run_yields_its_own_input() {
    let relay = TestRelay::start(RelayService::new(Arc::new(AggregationStore::default()))).await;

    let parties = parties(&[("loner", 42)]);
    let outcomes = run_parties(relay.endpoint(), None, &parties, CALL_TIMEOUT)
        .await
        .unwrap();

    assert_eq!(*outcomes[0].result.as_ref().unwrap(), 42);

    relay.shutdown().await;
}

// Parties start with random per-party delays. Without the round barrier a
// fast party would query its aggregate before a slow party's shares have
// landed and the sums would diverge.
#[tokio::test(flavor = "multi_thread")]
async fn staggered_parties_still_agree() {
    let relay = TestRelay::start(RelayService::new(Arc::new(AggregationStore::default()))).await;

    let specs = [("alice", 30i64), ("bob", 300), ("carol", 100)];
    let names: Vec<String> = specs.iter().map(|(name, _)| name.to_string()).collect();
    let barrier = Arc::new(Barrier::new(specs.len()));

    let mut handles = Vec::new();
    for (name, input) in specs {
        let peers = names.iter().filter(|n| *n != name).cloned().collect();
        let client = relay.connect().await;
        let party = Party::new(
            name.to_string(),
            input,
            peers,
            client,
            barrier.clone(),
            CALL_TIMEOUT,
        );
        let jitter = Duration::from_millis(rand::thread_rng().gen_range(0..150));
        handles.push(tokio::spawn(async move {
            tokio::time::sleep(jitter).await;
            party.run().await.unwrap()
        }));
    }

    for handle in handles {
        assert_eq!(handle.await.unwrap(), 430);
    }

    relay.shutdown().await;
}

#[tokio::test]
async fn slow_relay_surfaces_timeout_not_zero() {
    let service = RelayService::with_response_delay(
        Arc::new(AggregationStore::default()),
        Duration::from_millis(500),
    );
    let relay = TestRelay::start(service).await;

    let client = relay.connect().await;
    let party = Party::new(
        "alice".to_string(),
        30,
        Vec::new(),
        client,
        Arc::new(Barrier::new(1)),
        Duration::from_millis(50),
    );

    match party.run().await {
        Err(PartyError::Timeout {
            call: "GetAggregatedShares",
            ..
        }) => (),
        other => panic!("expected a timeout, got {:?}", other),
    }

    relay.shutdown().await;
}

#[tokio::test]
async fn missing_peer_surfaces_barrier_timeout() {
    let relay = TestRelay::start(RelayService::new(Arc::new(AggregationStore::default()))).await;

    // barrier sized for two parties but only one ever shows up
    let client = relay.connect().await;
    let party = Party::new(
        "alice".to_string(),
        30,
        Vec::new(),
        client,
        Arc::new(Barrier::new(2)),
        Duration::from_millis(100),
    );

    let result = party.run().await;
    assert!(matches!(
        result,
        Err(PartyError::Barrier { round: "share", .. })
    ));

    relay.shutdown().await;
}
