use anyhow::Result;
use crm_handoff::apis::{ApolloClient, HubSpotClient};
use crm_handoff::config::LeadSyncConfig;
use crm_handoff::error::HandoffError;
use crm_handoff::types::{ContactProperties, ContactSource, CrmSink};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Serves a single canned response and hands back the raw request it saw.
async fn serve_once(status: &'static str, body: &'static str) -> Result<(String, JoinHandle<String>)> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let url = format!("http://{}/", listener.local_addr()?);

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            if request_complete(&buf) {
                break;
            }
        }

        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();
        String::from_utf8_lossy(&buf).to_string()
    });

    Ok((url, handle))
}

fn request_complete(buf: &[u8]) -> bool {
    let text = String::from_utf8_lossy(buf);
    let Some(header_end) = text.find("\r\n\r\n") else {
        return false;
    };
    let content_length = text[..header_end]
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);
    buf.len() >= header_end + 4 + content_length
}

fn config(url: &str) -> LeadSyncConfig {
    LeadSyncConfig {
        source_url: url.to_string(),
        target_url: url.to_string(),
        source_api_key: "apollo-test-key".into(),
        target_api_key: "hubspot-test-key".into(),
        timeout_seconds: 5,
        ..Default::default()
    }
}

fn properties() -> ContactProperties {
    ContactProperties {
        email: "ada@engines.io".into(),
        firstname: "Ada".into(),
        lastname: "Lovelace".into(),
        company: "Engines".into(),
        phone: "".into(),
        jobtitle: "CTO".into(),
        lead_score: 100,
        lead_source: "Apollo Cold Outreach".into(),
        hs_lead_status: "QUALIFIED".into(),
    }
}

#[tokio::test]
async fn hubspot_created_is_success() -> Result<()> {
    let (url, server) = serve_once("201 Created", r#"{"id":"501"}"#).await?;
    let client = HubSpotClient::new(&config(&url))?;

    client.create_contact(&properties()).await?;

    let request = server.await?;
    assert!(request.starts_with("POST / HTTP/1.1"));
    assert!(request.to_lowercase().contains("authorization: bearer hubspot-test-key"));
    assert!(request.contains(r#""properties":{"#));
    assert!(request.contains(r#""hs_lead_status":"QUALIFIED""#));
    Ok(())
}

#[tokio::test]
async fn hubspot_ok_without_create_is_a_failure() -> Result<()> {
    let (url, server) = serve_once("200 OK", "{}").await?;
    let client = HubSpotClient::new(&config(&url))?;

    let err = client.create_contact(&properties()).await.unwrap_err();

    assert!(matches!(err, HandoffError::Api { status: 200, .. }));
    server.await?;
    Ok(())
}

#[tokio::test]
async fn hubspot_conflict_is_a_failure() -> Result<()> {
    let (url, server) = serve_once("409 Conflict", r#"{"message":"Contact already exists"}"#).await?;
    let client = HubSpotClient::new(&config(&url))?;

    let err = client.create_contact(&properties()).await.unwrap_err();

    match err {
        HandoffError::Api { status, message } => {
            assert_eq!(status, 409);
            assert!(message.contains("Contact already exists"));
        }
        other => panic!("unexpected error: {other}"),
    }
    server.await?;
    Ok(())
}

#[tokio::test]
async fn apollo_server_error_fails_the_fetch() -> Result<()> {
    let (url, server) = serve_once("500 Internal Server Error", r#"{"error":"boom"}"#).await?;
    let client = ApolloClient::new(&config(&url))?;

    let err = client.fetch_replies().await.unwrap_err();

    assert!(matches!(err, HandoffError::Api { status: 500, .. }));
    server.await?;
    Ok(())
}

#[tokio::test]
async fn apollo_keeps_readable_contacts_from_a_mixed_body() -> Result<()> {
    let body = r#"{"contacts":[
        {"email":"ada@engines.io","organization":{"employees":150.0,"technologies":["AWS",null]}},
        {"email":42},
        {"email":"lee@acme.io","organization":{"technologies":[{"name":"PyTorch"}]}}
    ]}"#;
    let (url, server) = serve_once("200 OK", body).await?;
    let client = ApolloClient::new(&config(&url))?;

    let contacts = client.fetch_replies().await?;

    assert_eq!(contacts.len(), 2);
    assert_eq!(contacts[0].organization.employees, 150);
    assert_eq!(contacts[1].email, "lee@acme.io");

    let request = server.await?;
    assert!(request.starts_with("GET / HTTP/1.1"));
    assert!(request.to_lowercase().contains("x-api-key: apollo-test-key"));
    Ok(())
}
