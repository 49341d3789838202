use anyhow::Result;

use super::DirectResponse;
use super::EnvelopeResponse;
use super::Lambda;
use crate::domain::models::ChatError;
use crate::domain::models::Gateway;
use crate::domain::models::Identity;

impl Lambda {
    fn with_url(url: String) -> Lambda {
        return Lambda {
            url,
            timeout: "30000".to_string(),
        };
    }
}

fn identity_fixture() -> Identity {
    return Identity {
        id: "user_123".to_string(),
        display_name: "Sam".to_string(),
        avatar_url: None,
    };
}

#[tokio::test]
async fn it_successfully_health_checks() {
    let gateway = Lambda::with_url("http://localhost:9000/ask".to_string());
    assert!(gateway.health_check().await.is_ok());
}

#[tokio::test]
async fn it_fails_health_checks_without_a_url() {
    let gateway = Lambda::with_url("".to_string());
    assert!(gateway.health_check().await.is_err());
}

#[tokio::test]
async fn it_asks_with_a_direct_response() -> Result<()> {
    let body = serde_json::to_string(&DirectResponse {
        response: Some("hi".to_string()),
        message: None,
        error: None,
    })?;

    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/")
        .with_status(200)
        .with_body(body)
        .create();

    let gateway = Lambda::with_url(server.url());
    let answer = gateway
        .ask("Say hi", Some(&identity_fixture()))
        .await
        .unwrap();

    assert_eq!(answer.text, "hi");
    assert!(!answer.markdown);
    mock.assert();
    return Ok(());
}

#[tokio::test]
async fn it_normalizes_envelope_responses() -> Result<()> {
    let inner = serde_json::to_string(&DirectResponse {
        response: Some("hi ``` code ```".to_string()),
        message: None,
        error: None,
    })?;
    let body = serde_json::to_string(&EnvelopeResponse {
        status_code: 200,
        body: inner,
        error: None,
    })?;

    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/")
        .with_status(200)
        .with_body(body)
        .create();

    let gateway = Lambda::with_url(server.url());
    let answer = gateway
        .ask("Say hi", Some(&identity_fixture()))
        .await
        .unwrap();

    assert_eq!(answer.text, "hi ``` code ```");
    assert!(answer.markdown);
    mock.assert();
    return Ok(());
}

#[tokio::test]
async fn it_surfaces_remote_function_errors() -> Result<()> {
    let body = serde_json::to_string(&EnvelopeResponse {
        status_code: 500,
        body: "{\"error\":\"boom\"}".to_string(),
        error: None,
    })?;

    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/")
        .with_status(200)
        .with_body(body)
        .create();

    let gateway = Lambda::with_url(server.url());
    let res = gateway.ask("Say hi", Some(&identity_fixture())).await;

    assert_eq!(res, Err(ChatError::RemoteFunction("boom".to_string())));
    mock.assert();
    return Ok(());
}

#[tokio::test]
async fn it_falls_back_to_the_raw_body_on_errors() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/")
        .with_status(200)
        .with_body("{\"statusCode\": 502, \"body\": \"Bad Gateway\"}")
        .create();

    let gateway = Lambda::with_url(server.url());
    let res = gateway.ask("Say hi", Some(&identity_fixture())).await;

    assert_eq!(
        res,
        Err(ChatError::RemoteFunction("Bad Gateway".to_string()))
    );
    mock.assert();
}

#[tokio::test]
async fn it_flags_unparseable_payloads() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/")
        .with_status(200)
        .with_body("not json at all")
        .create();

    let gateway = Lambda::with_url(server.url());
    let res = gateway.ask("Say hi", Some(&identity_fixture())).await;

    assert_eq!(res, Err(ChatError::InvalidResponse));
    mock.assert();
}

#[tokio::test]
async fn it_fails_without_an_identity() {
    let gateway = Lambda::with_url("http://localhost:9000/ask".to_string());
    let res = gateway.ask("Say hi", None).await;

    assert_eq!(res, Err(ChatError::Unauthenticated));
}

#[tokio::test]
async fn it_fails_when_not_configured() {
    let gateway = Lambda::with_url("".to_string());
    let res = gateway.ask("Say hi", Some(&identity_fixture())).await;

    assert_eq!(res, Err(ChatError::NotConfigured));
}

#[test]
fn it_prefers_the_function_level_error() {
    let shape = super::decode_shape(
        "{\"statusCode\": 200, \"body\": \"{}\", \"error\": \"function exploded\"}",
    )
    .unwrap();
    let res = super::normalize(shape);

    assert_eq!(
        res,
        Err(ChatError::RemoteFunction("function exploded".to_string()))
    );
}

#[test]
fn it_accepts_message_shaped_payloads() {
    let shape = super::decode_shape("{\"message\": \"from the message field\"}").unwrap();
    let answer = super::normalize(shape).unwrap();

    assert_eq!(answer.text, "from the message field");
}
