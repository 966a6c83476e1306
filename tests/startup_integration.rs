use std::sync::Arc;

use figment::{
    providers::{Format, Yaml},
    Figment,
};
use mockito::{Matcher, Server};
use usersync::config::{Config, ConfigV1};
use usersync::startup::run_with_input;

fn load_test_config(yaml: &str) -> ConfigV1 {
    let config: Config = Figment::new()
        .merge(Yaml::string(yaml))
        .extract()
        .expect("Failed to parse test config YAML");
    config.into()
}

const MEMORY_CONFIG: &str = r#"
version: "1.0.0"
logging:
  level: "debug"
  format: "json"
remote:
  type: memory
"#;

const EVENTS: &str = r#"
{"type":"navigate","path":"/"}
{"type":"auth","is_ready":false}
{"type":"auth","is_ready":true,"identity":{"id":"u1","full_name":"Ada Lovelace","primary_email":"ada@x.com"}}
this line is not an event
{"type":"navigate","path":"/courses"}
{"type":"navigate","path":"/courses"}
"#;

#[tokio::test]
async fn test_event_feed_against_memory_remote() {
    let config = Arc::new(load_test_config(MEMORY_CONFIG));
    let user = run_with_input(config, EVENTS.as_bytes())
        .await
        .expect("run should succeed");

    assert!(!user.is_placeholder());
    assert_eq!(user.clerk_id, "u1");
    assert_eq!(user.name, "Ada Lovelace");
    assert_eq!(user.email, "ada@x.com");
}

#[tokio::test]
async fn test_consumer_overwrite_in_event_feed() {
    let config = Arc::new(load_test_config(MEMORY_CONFIG));
    let events = r#"
{"type":"auth","is_ready":true,"identity":{"id":"u2","full_name":null,"primary_email":"grace@x.com"}}
{"type":"set_user","user":{"id":"local","clerkId":"u2","name":"Grace","email":"grace@x.com","college_name":"Yale","createdAt":"2024-03-01T10:00:00Z","updatedAt":"2024-03-01T10:00:00Z"}}
"#;
    let user = run_with_input(config, events.as_bytes())
        .await
        .expect("run should succeed");

    assert_eq!(user.id, "local");
    assert_eq!(user.college_name, "Yale");
}

#[tokio::test]
async fn test_event_feed_against_http_remote() {
    let mut server = Server::new_async().await;
    let m = server
        .mock("POST", "/api/trpc/user.createUser")
        .match_body(Matcher::PartialJson(serde_json::json!({
            "json": {"clerkId": "u1", "email": "ada@x.com"}
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"result":{"data":{"json":{
                "id":"db1","clerkId":"u1","name":"Ada Lovelace","email":"ada@x.com",
                "college_name":"","createdAt":"2024-03-01T10:00:00.000Z",
                "updatedAt":"2024-03-01T10:00:00.000Z"}}}}"#,
        )
        // one call for the auth change, one for the navigation to /courses
        .expect(2)
        .create_async()
        .await;

    let yaml = format!(
        r#"
version: "1.0.0"
logging:
  level: "info"
  format: "console"
remote:
  type: http
  uri: {}/api/trpc
  timeout_in_ms: 3000
"#,
        server.url()
    );
    let config = Arc::new(load_test_config(&yaml));
    let user = run_with_input(config, EVENTS.as_bytes())
        .await
        .expect("run should succeed");

    m.assert_async().await;
    assert_eq!(user.id, "db1");
    assert_eq!(user.clerk_id, "u1");
}

#[tokio::test]
async fn test_http_remote_failure_keeps_placeholder() {
    let mut server = Server::new_async().await;
    let m = server
        .mock("POST", "/api/trpc/user.createUser")
        .with_status(500)
        .with_body(r#"{"error":{"json":{"message":"boom"}}}"#)
        .expect(1)
        .create_async()
        .await;

    let yaml = format!(
        r#"
version: "1.0.0"
logging:
  level: "info"
  format: "console"
remote:
  type: http
  uri: {}/api/trpc
"#,
        server.url()
    );
    let config = Arc::new(load_test_config(&yaml));
    let events = r#"{"type":"auth","is_ready":true,"identity":{"id":"u1","full_name":"Ada Lovelace","primary_email":"ada@x.com"}}"#;
    let user = run_with_input(config, events.as_bytes())
        .await
        .expect("run should succeed even when the remote fails");

    m.assert_async().await;
    assert!(user.is_placeholder());
}
