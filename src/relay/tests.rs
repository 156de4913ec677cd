use std::sync::Arc;

use futures_util::future::join_all;
use tonic::Request;

use crate::proto::{self, share_relay_server::ShareRelay};

use super::{AggregationStore, RelayService};

#[test]
fn fresh_store_reads_zero() {
    let store = AggregationStore::default();
    assert_eq!(store.shares_for("alice"), 0);
    assert_eq!(store.out_shares_for("alice"), 0);
    // any name outside the participant set also reads zero, not an error
    assert_eq!(store.shares_for("nobody"), 0);
}

#[test]
fn reads_are_idempotent() {
    let store = AggregationStore::default();
    store.add_share("alice", 7);
    assert_eq!(store.shares_for("alice"), 7);
    assert_eq!(store.shares_for("alice"), 7);
    store.add_out_share("alice", -3);
    assert_eq!(store.out_shares_for("alice"), -3);
    assert_eq!(store.out_shares_for("alice"), -3);
}

#[test]
fn shares_and_out_shares_accumulate_separately() {
    let store = AggregationStore::default();
    store.add_share("alice", 10);
    store.add_out_share("alice", 100);
    assert_eq!(store.shares_for("alice"), 10);
    assert_eq!(store.out_shares_for("alice"), 100);
}

#[test]
fn running_total_is_returned() {
    let store = AggregationStore::default();
    assert_eq!(store.add_share("bob", 5), 5);
    assert_eq!(store.add_share("bob", -2), 3);
    assert_eq!(store.add_out_share("bob", 8), 8);
}

#[tokio::test(flavor = "multi_thread")]
async fn concurrent_adds_sum_regardless_of_order() {
    let store = Arc::new(AggregationStore::default());

    let tasks = (1..=100i64).map(|part| {
        let store = store.clone();
        tokio::spawn(async move {
            store.add_share("alice", part);
            store.add_share("bob", 2 * part);
        })
    });
    join_all(tasks).await.into_iter().for_each(|r| r.unwrap());

    assert_eq!(store.shares_for("alice"), 5050);
    assert_eq!(store.shares_for("bob"), 10100);
}

#[tokio::test]
async fn service_routes_to_the_right_accumulator() {
    let store = Arc::new(AggregationStore::default());
    let service = RelayService::new(store.clone());

    let ack = service
        .submit_share(Request::new(proto::Share {
            from: "bob".to_string(),
            to: "alice".to_string(),
            part: 11,
        }))
        .await
        .unwrap()
        .into_inner();
    assert_eq!(ack.message, "share received");

    let ack = service
        .submit_out_share(Request::new(proto::OutShare {
            from: "bob".to_string(),
            to: "alice".to_string(),
            data: 200,
        }))
        .await
        .unwrap()
        .into_inner();
    assert_eq!(ack.message, "out-share received");

    let shares = service
        .get_aggregated_shares(Request::new(proto::AggregateRequest {
            participant: "alice".to_string(),
        }))
        .await
        .unwrap()
        .into_inner();
    assert_eq!(shares.total, 11);

    let out_shares = service
        .get_aggregated_out_shares(Request::new(proto::AggregateRequest {
            participant: "alice".to_string(),
        }))
        .await
        .unwrap()
        .into_inner();
    assert_eq!(out_shares.total, 200);
}
