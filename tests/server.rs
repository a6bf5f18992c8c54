mod common;

use common::{loaded_session, FakeApi};
use paperless_mcp::{JsonRpcResponse, McpServer, PROTOCOL_VERSION};
use serde_json::{json, Value as JsonValue};
use tokio::io::BufReader;

async fn server() -> (McpServer, FakeApi) {
    let api = FakeApi::with_tags(&[(1, "Invoice"), (2, "Receipt")]);
    let session = loaded_session(&api).await;
    (McpServer::new(session), api)
}

async fn call(server: &McpServer, request: JsonValue) -> JsonRpcResponse {
    server
        .handle_line(&request.to_string())
        .await
        .expect("expected a response")
}

#[tokio::test]
async fn initialize_reports_tools_capability() {
    let (server, _) = server().await;
    let response = call(
        &server,
        json!({ "jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {} }),
    )
    .await;

    let result = response.result.unwrap();
    assert_eq!(result["protocolVersion"], json!(PROTOCOL_VERSION));
    assert!(result["capabilities"]["tools"].is_object());
    assert_eq!(result["serverInfo"]["name"], json!("paperless-mcp"));
}

#[tokio::test]
async fn tools_list_publishes_schemas() {
    let (server, _) = server().await;
    let response = call(&server, json!({ "jsonrpc": "2.0", "id": "a", "method": "tools/list" })).await;

    assert_eq!(response.id, json!("a"));
    let tools = response.result.unwrap()["tools"].as_array().unwrap().clone();
    assert_eq!(tools.len(), 8);

    let edit = tools
        .iter()
        .find(|t| t["name"] == json!("edit_documents"))
        .unwrap();
    assert_eq!(
        edit["inputSchema"]["required"],
        json!(["documentIds", "method"])
    );
    assert_eq!(
        edit["inputSchema"]["properties"]["method"]["enum"],
        json!(["set_correspondent", "set_document_type", "modify_tags", "delete"])
    );
}

#[tokio::test]
async fn tools_call_returns_text_envelope() {
    let (server, _) = server().await;
    let response = call(
        &server,
        json!({
            "jsonrpc": "2.0",
            "id": 2,
            "method": "tools/call",
            "params": { "name": "list_tags" }
        }),
    )
    .await;

    let result = response.result.unwrap();
    assert!(result.get("isError").is_none());
    assert_eq!(result["content"][0]["type"], json!("text"));
    let body: JsonValue = serde_json::from_str(result["content"][0]["text"].as_str().unwrap()).unwrap();
    assert_eq!(body["count"], json!(2));
}

#[tokio::test]
async fn validation_failures_are_tool_errors_not_protocol_errors() {
    let (server, api) = server().await;
    let response = call(
        &server,
        json!({
            "jsonrpc": "2.0",
            "id": 3,
            "method": "tools/call",
            "params": { "name": "get_documents", "arguments": {} }
        }),
    )
    .await;

    assert!(response.error.is_none());
    assert_eq!(response.result.unwrap()["isError"], json!(true));
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn unknown_tool_is_a_protocol_error() {
    let (server, _) = server().await;
    let response = call(
        &server,
        json!({
            "jsonrpc": "2.0",
            "id": 4,
            "method": "tools/call",
            "params": { "name": "format_disk", "arguments": {} }
        }),
    )
    .await;

    let error = response.error.unwrap();
    assert_eq!(error.code, -32602);
    assert!(error.message.contains("format_disk"));
}

#[tokio::test]
async fn malformed_messages() {
    let (server, _) = server().await;

    let response = server.handle_line("{not json").await.unwrap();
    assert_eq!(response.error.unwrap().code, -32700);
    assert_eq!(response.id, JsonValue::Null);

    let response = call(&server, json!({ "jsonrpc": "2.0", "id": 5 })).await;
    assert_eq!(response.error.unwrap().code, -32600);
    assert_eq!(response.id, json!(5));

    let response = call(&server, json!({ "jsonrpc": "2.0", "id": 6, "method": "resources/list" })).await;
    assert_eq!(response.error.unwrap().code, -32601);

    let response = call(
        &server,
        json!({
            "jsonrpc": "2.0",
            "id": 7,
            "method": "tools/call",
            "params": { "name": "list_tags", "arguments": [1, 2] }
        }),
    )
    .await;
    assert_eq!(response.error.unwrap().code, -32602);
}

#[tokio::test]
async fn notifications_get_no_response() {
    let (server, _) = server().await;
    let none = server
        .handle_line(&json!({ "jsonrpc": "2.0", "method": "notifications/initialized" }).to_string())
        .await;
    assert!(none.is_none());
}

#[tokio::test]
async fn serve_answers_each_request_on_its_own_line() {
    let (server, _) = server().await;
    let input = [
        json!({ "jsonrpc": "2.0", "id": 1, "method": "initialize" }).to_string(),
        json!({ "jsonrpc": "2.0", "method": "notifications/initialized" }).to_string(),
        String::new(),
        json!({ "jsonrpc": "2.0", "id": 2, "method": "ping" }).to_string(),
    ]
    .join("\n");

    let mut output = Vec::new();
    server
        .serve(BufReader::new(input.as_bytes()), &mut output)
        .await
        .unwrap();

    let lines: Vec<JsonRpcResponse> = String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].id, json!(1));
    assert_eq!(lines[1].id, json!(2));
    assert_eq!(lines[1].result, Some(json!({})));
}
