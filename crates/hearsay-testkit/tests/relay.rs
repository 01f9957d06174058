//! A message passed along a chain of nodes keeps its id.

use http::header::LOCATION;
use http::{Method, StatusCode};

use hearsay_core::text;
use hearsay_store::{Store, Visibility};
use hearsay_testkit::peer_fixtures;

#[tokio::test]
async fn test_relay_chain_preserves_identity() {
    let peers = peer_fixtures(4);
    let origin = &peers[0];
    let id = origin
        .node
        .compose(origin.make_signed("passed along"), Visibility::Public)
        .await
        .unwrap();
    let uri = hearsay::message_path(&id);

    for (hop, pair) in peers.windows(2).enumerate() {
        let (from, to) = (&pair[0], &pair[1]);
        let forwarded = from.node.relay(&id).await.unwrap().unwrap();
        assert_eq!(forwarded.n_hops, (hop + 1).to_string());

        let response = to
            .request(Method::POST, &uri, Some("text/hearsay"), text::serialize(&forwarded))
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(response.headers()[LOCATION], uri.as_str());

        let stored = to.node.get(&id).await.unwrap().unwrap();
        assert_eq!(stored.id, id.to_hex());
        assert_eq!(stored.n_hops, (hop + 1).to_string());
    }

    for peer in &peers {
        assert_eq!(peer.node.store().count().await.unwrap(), 1);
    }
}

#[tokio::test]
async fn test_second_copy_is_a_no_op() {
    let peers = peer_fixtures(2);
    let draft = peers[0].make_message("twice");

    let first = peers[1].post_new(&draft).await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let mut again = draft.clone();
    again.n_hops = "5".to_string();
    let second = peers[1].post_new(&again).await;
    assert_eq!(second.status(), StatusCode::OK);

    // The first copy wins.
    let stored = peers[1].node.get(&draft.content_id()).await.unwrap().unwrap();
    assert_eq!(stored.n_hops, "0");
}
