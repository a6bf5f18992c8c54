use paperless_mcp::{
    BulkEditMethod, BulkEditRequest, DocumentQuery, EntityKind, McpError, NameFilter, NewEntity,
    PaperlessApi, PaperlessClient, PaperlessConfig,
};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> PaperlessClient {
    let config = PaperlessConfig::new(Some(&server.uri()), Some("s3cret"), 5).unwrap();
    PaperlessClient::new(&config).unwrap()
}

#[tokio::test]
async fn list_follows_pagination_with_token() {
    let server = MockServer::start().await;
    let page2 = format!("{}/api/tags/?page=2", server.uri());

    Mock::given(method("GET"))
        .and(path("/api/tags/"))
        .and(query_param("page", "2"))
        .and(header("authorization", "Token s3cret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 3,
            "next": null,
            "previous": null,
            "results": [{ "id": 3, "name": "Tax", "document_count": 1 }]
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/tags/"))
        .and(query_param("page_size", "100"))
        .and(header("authorization", "Token s3cret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 3,
            "next": page2,
            "previous": null,
            "results": [
                { "id": 1, "name": "Invoice", "document_count": 12, "color": "#a6cee3" },
                { "id": 2, "name": "Receipt", "document_count": 4 }
            ]
        })))
        .mount(&server)
        .await;

    let tags = client(&server).list(EntityKind::Tag).await.unwrap();
    let names: Vec<&str> = tags.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["Invoice", "Receipt", "Tax"]);
    assert_eq!(tags[0].color.as_deref(), Some("#a6cee3"));
    assert_eq!(tags[0].document_count, 12);
}

#[tokio::test]
async fn list_fails_when_pages_link_in_a_cycle() {
    let server = MockServer::start().await;
    let page1 = format!("{}/api/tags/?page=1", server.uri());
    let page2 = format!("{}/api/tags/?page=2", server.uri());

    Mock::given(method("GET"))
        .and(path("/api/tags/"))
        .and(query_param("page_size", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 2, "next": page2, "previous": null,
            "results": [{ "id": 1, "name": "Invoice", "document_count": 0 }]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/tags/"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 2, "next": page1, "previous": page1,
            "results": [{ "id": 2, "name": "Receipt", "document_count": 0 }]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/tags/"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 2, "next": page2, "previous": null,
            "results": [{ "id": 1, "name": "Invoice", "document_count": 0 }]
        })))
        .mount(&server)
        .await;

    let result = tokio::time::timeout(
        std::time::Duration::from_secs(5),
        client(&server).list(EntityKind::Tag),
    )
    .await
    .expect("listing did not terminate");

    let err = result.unwrap_err();
    assert!(matches!(err, McpError::Decode(_)), "{:?}", err);
    assert_eq!(err.kind(), "remote_error");
    assert_eq!(server.received_requests().await.unwrap().len(), 3);
}

#[tokio::test]
async fn search_sends_only_present_filters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/documents/"))
        .and(query_param("correspondent__name__icontains", "acme"))
        .and(query_param("tags__id__all", "4"))
        .and(query_param("page_size", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 1,
            "next": null,
            "previous": null,
            "results": [{
                "id": 42,
                "title": "March invoice",
                "content": "Total due",
                "tags": [4],
                "correspondent": 7,
                "document_type": null,
                "created": "2024-03-01",
                "added": "2024-03-02T10:00:00Z"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let query = DocumentQuery {
        correspondent: Some(NameFilter::Contains("acme".to_string())),
        tag: Some(NameFilter::Id(4)),
        page_size: 10,
        ..Default::default()
    };
    let page = client(&server).search_documents(&query).await.unwrap();
    assert_eq!(page.count, 1);
    assert_eq!(page.results[0].id, 42);
    assert_eq!(page.results[0].correspondent, Some(7));

    let received = server.received_requests().await.unwrap();
    let url = received[0].url.as_str();
    assert!(!url.contains("title__icontains"));
    assert!(!url.contains("created__date"));
}

#[tokio::test]
async fn bulk_edit_posts_method_and_parameters() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/documents/bulk_edit/"))
        .and(body_json(json!({
            "documents": [1, 2],
            "method": "set_document_type",
            "parameters": { "document_type": 9 }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "result": "OK" })))
        .expect(1)
        .mount(&server)
        .await;

    let request = BulkEditRequest {
        documents: vec![1, 2],
        method: BulkEditMethod::SetDocumentType(9),
    };
    let result = client(&server).bulk_edit(&request).await.unwrap();
    assert_eq!(result, json!({ "result": "OK" }));
}

#[tokio::test]
async fn create_posts_to_the_kind_collection() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/correspondents/"))
        .and(body_json(json!({ "name": "Tax Office" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 15, "name": "Tax Office", "slug": "tax-office", "document_count": 0
        })))
        .mount(&server)
        .await;

    let created = client(&server)
        .create(
            EntityKind::Correspondent,
            &NewEntity {
                name: "Tax Office".to_string(),
                color: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(created.id, 15);
}

#[tokio::test]
async fn non_success_status_is_an_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/tags/"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({ "name": ["Tag with this name already exists."] })),
        )
        .mount(&server)
        .await;

    let err = client(&server)
        .create(
            EntityKind::Tag,
            &NewEntity {
                name: "Invoice".to_string(),
                color: Some("#ff0000".to_string()),
            },
        )
        .await
        .unwrap_err();
    match err {
        McpError::Api { status, body } => {
            assert_eq!(status, 400);
            assert!(body.contains("already exists"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn ping_rejects_bad_tokens() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tags/"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Invalid token."))
        .mount(&server)
        .await;

    let err = client(&server).ping().await.unwrap_err();
    assert!(matches!(err, McpError::Api { status: 401, .. }));
    assert_eq!(err.kind(), "remote_error");
}

#[tokio::test]
async fn malformed_bodies_are_decode_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/document_types/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
        .mount(&server)
        .await;

    let err = client(&server).list(EntityKind::DocumentType).await.unwrap_err();
    assert!(matches!(err, McpError::Decode(_)));
}
