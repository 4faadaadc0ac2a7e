//! Integration tests for fetching targets using wiremock
//!
//! These tests drive the models, views and router against mocked endpoints,
//! checking request counts, response shapes and error handling.

use serde_json::json;
use ttargets::api::client::ApiClient;
use ttargets::resource::{FetchState, Fetchable, Target, TargetCollection};
use ttargets::router::{RouteRequest, Router};
use ttargets::view::{ActiveView, Renderable};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> ApiClient {
    ApiClient::new(&server.uri()).expect("mock server URI should be valid")
}

/// Tests for the raw client against the service
mod api_client_tests {
    use super::*;

    #[tokio::test]
    async fn test_get_sends_json_accept_header() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/targets/"))
            .and(header("accept", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let response = client_for(&server)
            .get("/targets/")
            .await
            .expect("Request should succeed");

        assert_eq!(response, json!([]));
    }

    #[tokio::test]
    async fn test_base_url_prefix_is_kept() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/targets/7"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "7"})))
            .expect(1)
            .mount(&server)
            .await;

        let client = ApiClient::new(&format!("{}/api/", server.uri())).unwrap();
        let response = client.get("/targets/7").await.expect("Request should succeed");

        assert_eq!(response["id"], "7");
    }

    #[tokio::test]
    async fn test_unreachable_server_is_reported() {
        let client = ApiClient::new("http://127.0.0.1:9").unwrap();
        let err = client.get("/targets/").await.unwrap_err();

        assert_eq!(
            ttargets::api::client::format_api_error(&err),
            "Could not reach the server. Check the URL and your network."
        );
    }
}

/// Tests for the collection and model fetches
mod fetch_tests {
    use super::*;

    #[tokio::test]
    async fn test_collection_fetch_builds_models_in_order() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/targets/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": "1", "name": "A"},
                {"id": "2", "name": "B"}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let mut collection = TargetCollection::new();
        let deferred = collection.fetch(&client_for(&server));
        assert!(deferred.wait().await.is_ok());

        assert!(collection.sync());
        assert_eq!(collection.fetch_state(), FetchState::Resolved);
        assert_eq!(collection.len(), 2);
        assert_eq!(collection.get(0).and_then(Target::id), Some("1"));
        assert_eq!(collection.get(1).map(|t| t.get("name")).as_deref(), Some("B"));
    }

    #[tokio::test]
    async fn test_collection_accepts_items_envelope() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/targets/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [
                    {"id": "CTCF-human", "label": "CTCF"},
                    {"id": "POLR2A-human", "label": "POLR2A"},
                    {"id": "EP300-human", "label": "EP300"}
                ],
                "total": 3
            })))
            .mount(&server)
            .await;

        let mut collection = TargetCollection::new();
        collection.fetch(&client_for(&server)).wait().await.unwrap();
        collection.sync();

        let ids: Vec<_> = collection.models().iter().filter_map(Target::id).collect();
        assert_eq!(ids, vec!["CTCF-human", "POLR2A-human", "EP300-human"]);
    }

    #[tokio::test]
    async fn test_model_from_route_fetches_once() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/targets/42"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "42",
                "label": "CTCF",
                "aliases": ["CCCTC", "MRD21"]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let mut target = Target::from_route_args(&client_for(&server), &["42".to_string()])
            .expect("id argument should be accepted");
        assert_eq!(target.id(), Some("42"));

        let deferred = target.deferred().cloned().expect("fetch should be issued");
        assert!(deferred.wait().await.is_ok());

        assert!(target.sync());
        assert_eq!(target.get("label"), "CTCF");
        assert_eq!(target.get("aliases_display"), "CCCTC, MRD21");
    }

    #[tokio::test]
    async fn test_id_is_percent_encoded_in_path() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/targets/H3K4me3%20human"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "H3K4me3 human"})))
            .expect(1)
            .mount(&server)
            .await;

        let mut target = Target::with_id("H3K4me3 human");
        target.fetch(&client_for(&server)).wait().await.unwrap();
    }

    #[tokio::test]
    async fn test_404_rejects_with_display_message() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/targets/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "status": "error",
                "code": 404,
                "title": "Not Found"
            })))
            .mount(&server)
            .await;

        let mut target = Target::with_id("missing");
        let deferred = target.fetch(&client_for(&server));
        assert!(deferred.wait().await.is_err());

        assert!(!target.sync());
        assert_eq!(
            target.fetch_state(),
            FetchState::Rejected("Resource not found.".to_string())
        );
    }

    #[tokio::test]
    async fn test_non_json_body_rejects() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/targets/"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
            .mount(&server)
            .await;

        let mut collection = TargetCollection::new();
        let deferred = collection.fetch(&client_for(&server));
        assert!(deferred.wait().await.is_err());

        assert_eq!(
            collection.fetch_state(),
            FetchState::Rejected("Server returned a response that is not JSON.".to_string())
        );
        assert!(collection.is_empty());
    }

    #[tokio::test]
    async fn test_server_error_rejects() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/targets/"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let mut collection = TargetCollection::new();
        let _ = collection.fetch(&client_for(&server)).wait().await;

        assert_eq!(
            collection.fetch_state(),
            FetchState::Rejected("Server temporarily unavailable. Please try again.".to_string())
        );
    }
}

/// Tests for navigation through the router
mod router_tests {
    use super::*;

    #[tokio::test]
    async fn test_targets_route_renders_rows() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/targets/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": "1", "label": "A"},
                {"id": "2", "label": "B"}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let router = Router::with_default_routes();
        let view = router
            .navigate(&client_for(&server), &RouteRequest::new("targets", vec![]))
            .expect("targets route should exist");

        let ActiveView::List(mut list) = view else {
            panic!("targets route should open the list view");
        };
        assert_eq!(list.fetch_state(), FetchState::Pending);

        list.collection()
            .deferred()
            .cloned()
            .expect("collection should be fetching")
            .wait()
            .await
            .unwrap();
        assert!(list.sync());

        let fragment = list.render();
        assert_eq!(fragment.rows.len(), 2);
        assert_eq!(fragment.rows[0].id.as_deref(), Some("1"));
        assert_eq!(fragment.rows[1].id.as_deref(), Some("2"));
        assert!(fragment.message.is_none());
    }

    #[tokio::test]
    async fn test_target_route_shares_model_fetch() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/targets/42"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"id": "42", "label": "CTCF"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let router = Router::with_default_routes();
        let view = router
            .navigate(&client_for(&server), &RouteRequest::new("target", vec!["42".into()]))
            .expect("target route should exist");

        let ActiveView::Item(mut item) = view else {
            panic!("target route should open the item view");
        };

        let view_handle = item.deferred().cloned().unwrap();
        let model_handle = item.model().deferred().cloned().unwrap();
        assert!(view_handle.ptr_eq(&model_handle));

        view_handle.wait().await.unwrap();
        assert!(item.sync());
        assert_eq!(item.render().title, "CTCF");
    }

    #[tokio::test]
    async fn test_unknown_route_is_an_error() {
        let server = MockServer::start().await;
        let router = Router::with_default_routes();

        let err = router
            .navigate(&client_for(&server), &RouteRequest::new("experiments", vec![]))
            .unwrap_err();
        assert!(err.to_string().contains("Unknown route"));
    }

    #[tokio::test]
    async fn test_item_view_requires_an_id() {
        let server = MockServer::start().await;
        let err = Router::with_default_routes()
            .navigate(&client_for(&server), &RouteRequest::new("target", vec![]))
            .unwrap_err();
        assert!(format!("{:#}", err).contains("id is required"));

        assert!(server.received_requests().await.unwrap_or_default().is_empty());
    }
}
