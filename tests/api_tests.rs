use actix_http::Request;
use actix_web::{
    body::BoxBody,
    dev::{Service, ServiceResponse},
    http::header,
    middleware::NormalizePath,
    test, web, App,
};
use serde_json::json;

use resume_render_api::{
    constants::{API_KEY_HEADER, MAX_JSON_PAYLOAD_BYTES},
    handlers::json_error::{json_error_handler, not_found},
    middlewares::{auth::ApiKeyMiddleware, host::HostFilter},
    routes::configure_routes,
    settings::{AppConfig, AppEnvironment},
    AppState,
};

const TEST_SECRET: &str = "test-secret";

fn test_config(render_command: &str) -> AppConfig {
    AppConfig {
        env: AppEnvironment::Testing,
        name: "Resume-Render-API-Test".to_string(),
        port: 0,
        host: "127.0.0.1".to_string(),
        worker_count: 1,
        api_secret: TEST_SECRET.to_string(),
        cors_allowed_origins: vec!["http://localhost:3000".to_string()],
        allowed_hosts: vec!["localhost".to_string(), "127.0.0.1".to_string()],
        trust_x_forwarded_for: false,
        render_command: render_command.to_string(),
    }
}

async fn spawn_app(
    config: AppConfig,
) -> impl Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error> {
    let state = web::Data::new(AppState::new(&config));
    test::init_service(
        App::new()
            .app_data(state)
            .app_data(
                web::JsonConfig::default()
                    .limit(MAX_JSON_PAYLOAD_BYTES)
                    .error_handler(json_error_handler),
            )
            .wrap(NormalizePath::trim())
            .wrap(ApiKeyMiddleware)
            .wrap(HostFilter)
            .configure(configure_routes)
            .default_service(web::route().to(not_found)),
    )
    .await
}

fn authed_post(uri: &str, body: serde_json::Value) -> Request {
    test::TestRequest::post()
        .uri(uri)
        .insert_header((API_KEY_HEADER, TEST_SECRET))
        .set_json(body)
        .to_request()
}

#[actix_web::test]
async fn health_is_public() {
    let app = spawn_app(test_config("/bin/true")).await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
    assert_eq!(resp.status(), 200);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({"status": "healthy"}));
}

#[actix_web::test]
async fn missing_api_key_is_rejected_before_validation() {
    let app = spawn_app(test_config("/bin/true")).await;

    // Body is invalid too; the auth gate must answer first.
    let req = test::TestRequest::post()
        .uri("/yaml")
        .set_json(json!({}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 403);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["detail"], "Could not validate credentials");
}

#[actix_web::test]
async fn wrong_api_key_gets_the_same_rejection() {
    let app = spawn_app(test_config("/bin/true")).await;

    let req = test::TestRequest::post()
        .uri("/yaml")
        .insert_header((API_KEY_HEADER, "nope"))
        .set_json(json!({"name": "John Doe"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 403);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["detail"], "Could not validate credentials");
}

#[actix_web::test]
async fn valid_key_with_invalid_body_reaches_validation() {
    let app = spawn_app(test_config("/bin/true")).await;

    let resp = test::call_service(&app, authed_post("/yaml", json!({}))).await;
    assert_eq!(resp.status(), 422);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["detail"], "Please fix the following issues:");
    assert_eq!(body["errors"], json!(["Name: This field is required"]));
}

#[actix_web::test]
async fn yaml_endpoint_returns_attachment() {
    let app = spawn_app(test_config("/bin/true")).await;

    let resp = test::call_service(&app, authed_post("/yaml", json!({"name": "John Doe"}))).await;
    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/x-yaml"
    );
    let disposition = resp
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(disposition.contains("John_Doe_CV.yaml"));

    let body = test::read_body(resp).await;
    let yaml = std::str::from_utf8(&body).unwrap();
    assert!(yaml.contains("name: John Doe"));
    assert!(yaml.contains("theme: classic"));
}

#[actix_web::test]
async fn multiple_validation_errors_come_back_together() {
    let app = spawn_app(test_config("/bin/true")).await;

    let resp = test::call_service(
        &app,
        authed_post(
            "/yaml",
            json!({
                "name": "John Doe",
                "email": "bad",
                "website": "also bad",
                "phone": "12345"
            }),
        ),
    )
    .await;
    assert_eq!(resp.status(), 422);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert!(body["errors"].as_array().unwrap().len() >= 2);
}

#[actix_web::test]
async fn yaml_render_rejects_empty_content() {
    let app = spawn_app(test_config("/bin/true")).await;

    let resp =
        test::call_service(&app, authed_post("/yaml/render", json!({"yaml_content": ""}))).await;
    assert_eq!(resp.status(), 422);
}

#[actix_web::test]
async fn unmatched_route_is_404() {
    let app = spawn_app(test_config("/bin/true")).await;

    let req = test::TestRequest::get()
        .uri("/nope")
        .insert_header((API_KEY_HEADER, TEST_SECRET))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
}

#[actix_web::test]
async fn disallowed_host_is_rejected() {
    let app = spawn_app(test_config("/bin/true")).await;

    let req = test::TestRequest::get()
        .uri("/health")
        .insert_header((header::HOST, "evil.example.com"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}

#[actix_web::test]
async fn renderer_failure_is_surfaced_as_server_error() {
    let app = spawn_app(test_config("/bin/false")).await;

    let resp =
        test::call_service(&app, authed_post("/generate", json!({"name": "John Doe"}))).await;
    assert_eq!(resp.status(), 500);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert!(body["detail"].as_str().unwrap().contains("rendercv failed"));
}

#[actix_web::test]
async fn renderer_without_output_is_a_distinct_server_error() {
    let app = spawn_app(test_config("/bin/true")).await;

    let resp =
        test::call_service(&app, authed_post("/generate", json!({"name": "John Doe"}))).await;
    assert_eq!(resp.status(), 500);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert!(body["detail"]
        .as_str()
        .unwrap()
        .contains("Output directory not created"));
}

#[actix_web::test]
async fn pdf_endpoint_rate_limit_trips_after_five() {
    let app = spawn_app(test_config("/bin/true")).await;

    for _ in 0..5 {
        let resp =
            test::call_service(&app, authed_post("/generate", json!({"name": "John Doe"}))).await;
        // Renderer fails (no output), but each attempt consumes the limit.
        assert_eq!(resp.status(), 500);
    }

    let resp =
        test::call_service(&app, authed_post("/generate", json!({"name": "John Doe"}))).await;
    assert_eq!(resp.status(), 429);
    assert!(resp.headers().get(header::RETRY_AFTER).is_some());
}

#[actix_web::test]
async fn generate_and_raw_render_budgets_are_independent() {
    let app = spawn_app(test_config("/bin/true")).await;

    for _ in 0..5 {
        let resp =
            test::call_service(&app, authed_post("/generate", json!({"name": "John Doe"}))).await;
        assert_eq!(resp.status(), 500);
    }
    let resp =
        test::call_service(&app, authed_post("/generate", json!({"name": "John Doe"}))).await;
    assert_eq!(resp.status(), 429);

    // /yaml/render still has its full window.
    let resp = test::call_service(
        &app,
        authed_post("/yaml/render", json!({"yaml_content": "cv:\n  name: Test\n"})),
    )
    .await;
    assert_eq!(resp.status(), 500);
}

#[actix_web::test]
async fn unknown_path_without_credentials_is_still_gated() {
    let app = spawn_app(test_config("/bin/true")).await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/nope").to_request()).await;
    assert_eq!(resp.status(), 403);
}

#[actix_web::test]
async fn oversized_payload_is_rejected_before_parsing() {
    let app = spawn_app(test_config("/bin/true")).await;

    let oversized = format!(r#"{{"name": "{}"}}"#, "a".repeat(MAX_JSON_PAYLOAD_BYTES + 1));
    let req = test::TestRequest::post()
        .uri("/yaml")
        .insert_header((API_KEY_HEADER, TEST_SECRET))
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_payload(oversized)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 413);
}
