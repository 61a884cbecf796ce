//! Seed client against a mocked GraphQL endpoint.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use roteiro_cli::seed::{self, GraphqlClient, SeedError};
use serde_json::{json, Value};
use wiremock::matchers::{body_string_contains, header, method};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

fn client(server: &MockServer) -> GraphqlClient {
    GraphqlClient::new(&server.uri())
        .expect("client")
        .with_token("test-token")
}

fn bodies(requests: &[Request]) -> Vec<Value> {
    requests
        .iter()
        .map(|r| serde_json::from_slice(&r.body).expect("json body"))
        .collect()
}

fn count(bodies: &[Value], needle: &str) -> usize {
    bodies
        .iter()
        .filter(|b| b["query"].as_str().unwrap_or_default().contains(needle))
        .count()
}

#[tokio::test]
async fn clear_deletes_every_record_kind() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(header("authorization", "Bearer test-token"))
        .and(body_string_contains("submissions { id }"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "submissions": [{ "id": "s1" }, { "id": "s2" }],
                "transitions": [{ "id": "tr1" }],
                "positions": [{ "id": "p1" }],
                "tags": [{ "id": "t1" }],
                "topics": [{ "id": "to1" }, { "id": "to2" }]
            }
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(body_string_contains("mutation Delete"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": { "deleted": "id" } })))
        .mount(&server)
        .await;

    let report = seed::clear(&client(&server)).await.expect("clear");
    assert_eq!(report.submissions, 2);
    assert_eq!(report.transitions, 1);
    assert_eq!(report.positions, 1);
    assert_eq!(report.tags, 1);
    assert_eq!(report.topics, 2);
    assert_eq!(report.total(), 7);

    let sent = bodies(&server.received_requests().await.unwrap());
    assert_eq!(count(&sent, "deleteSubmission"), 2);
    assert_eq!(count(&sent, "deleteTransition"), 1);
    assert_eq!(count(&sent, "deletePosition"), 1);
    assert_eq!(count(&sent, "deleteTag("), 1);
    assert_eq!(count(&sent, "deleteTopic"), 2);
}

#[tokio::test]
async fn fill_creates_the_full_graph() {
    let server = MockServer::start().await;
    let next_id = Arc::new(AtomicUsize::new(0));

    let ids = next_id.clone();
    Mock::given(method("POST"))
        .respond_with(move |req: &Request| {
            let body: Value = serde_json::from_slice(&req.body).unwrap();
            let query = body["query"].as_str().unwrap();
            let field = [
                "createPosition",
                "createTag",
                "createSubmission",
                "createTransition",
                "createTopic",
            ]
            .into_iter()
            .find(|f| query.contains(f))
            .unwrap();
            let id = format!("id-{}", ids.fetch_add(1, Ordering::SeqCst));
            ResponseTemplate::new(200).set_body_json(json!({ "data": { field: { "id": id } } }))
        })
        .mount(&server)
        .await;

    let mut rng = StdRng::seed_from_u64(42);
    let report = seed::fill(&client(&server), &mut rng).await.expect("fill");
    assert_eq!(report.positions, seed::POSITIONS);
    assert_eq!(report.tags, seed::TAGS);
    assert_eq!(report.topics, seed::TOPICS);
    assert_eq!(report.submissions, seed::POSITIONS * seed::SUBMISSIONS_PER_POSITION);
    assert_eq!(report.transitions, seed::POSITIONS * seed::TRANSITIONS_PER_POSITION);

    let sent = bodies(&server.received_requests().await.unwrap());
    assert_eq!(sent.len(), report.total());
    for body in sent.iter().filter(|b| b["query"].as_str().unwrap().contains("createTransition")) {
        let vars = &body["variables"];
        assert_ne!(vars["startPosition"], vars["endPosition"]);
        assert_eq!(vars["tags"].as_array().unwrap().len(), seed::TAGS_PER_RECORD);
    }
    for body in sent.iter().filter(|b| b["query"].as_str().unwrap().contains("createSubmission")) {
        let tags = body["variables"]["tags"].as_array().unwrap();
        assert_eq!(tags.len(), seed::TAGS_PER_RECORD);
        assert_ne!(tags[0], tags[1]);
    }
}

#[tokio::test]
async fn graphql_errors_surface() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": null,
            "errors": [{ "message": "Unauthorised!", "extensions": { "code": "UNAUTHENTICATED" } }]
        })))
        .mount(&server)
        .await;

    let err = seed::clear(&client(&server)).await.unwrap_err();
    match err {
        SeedError::Graphql { messages } => assert_eq!(messages, vec!["Unauthorised!"]),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn http_failure_is_a_network_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let err = seed::clear(&client(&server)).await.unwrap_err();
    assert!(matches!(err, SeedError::Network { .. }), "{err:?}");
}

#[tokio::test]
async fn authenticate_keeps_the_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_string_contains("authenticateUser"))
        .and(body_string_contains("right-pw"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "authenticateUser": { "__typename": "AuthPayload", "token": "fresh" } }
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(body_string_contains("authenticateUser"))
        .and(body_string_contains("wrong-pw"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "authenticateUser": { "__typename": "AuthFailure", "message": "Incorrect password!" } }
        })))
        .mount(&server)
        .await;

    let mut client = GraphqlClient::new(&server.uri()).unwrap();
    client.authenticate("a@b.com", "right-pw").await.unwrap();
    assert_eq!(client.token(), Some("fresh"));

    let mut client = GraphqlClient::new(&server.uri()).unwrap();
    let err = client.authenticate("a@b.com", "wrong-pw").await.unwrap_err();
    match err {
        SeedError::Auth { message } => assert_eq!(message, "Incorrect password!"),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(client.token(), None);
}

#[test]
fn invalid_endpoint_is_a_config_error() {
    let err = GraphqlClient::new("not a url").unwrap_err();
    assert!(matches!(err, SeedError::Config { .. }));
}
