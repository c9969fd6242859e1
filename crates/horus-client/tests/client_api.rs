//! Client behavior against a local stand-in for the registry API.

use horus_client::{HorusClient, LookupStatus};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Serve each queued `(status_line, body)` response to one connection,
/// in order.
async fn serve_responses(responses: Vec<(&'static str, &'static str)>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        for (status, body) in responses {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = stream.read(&mut buf).await;
            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).await.unwrap();
            stream.shutdown().await.ok();
        }
    });

    format!("http://{addr}")
}

#[tokio::test]
async fn login_stores_token_and_lookup_parses_record() {
    let base = serve_responses(vec![
        ("200 OK", r#"{"token":"abc123"}"#),
        (
            "200 OK",
            r#"{"primer_nombre":"ANA","primer_apellido":"GARCIA","estado_afiliado":{"nombre":"ACTIVO"},"ips":{"nombre":"IPS NORTE"}}"#,
        ),
    ])
    .await;

    let mut client =
        HorusClient::with_endpoints(&format!("{base}/login"), &format!("{base}/afiliados"));
    client.login("user@clinic.co", "secret").await.unwrap();
    assert!(client.is_authenticated());

    let row = client.lookup("CC123456").await;
    match row.status {
        LookupStatus::Found { name, status, ips } => {
            assert_eq!(name, "ANA GARCIA");
            assert_eq!(status, "ACTIVO");
            assert_eq!(ips, "IPS NORTE");
        }
        other => panic!("unexpected status: {other:?}"),
    }
}

#[tokio::test]
async fn login_without_token_is_an_auth_error() {
    let base = serve_responses(vec![("200 OK", r#"{"message":"bad credentials"}"#)]).await;

    let mut client = HorusClient::with_endpoints(&format!("{base}/login"), &format!("{base}/x"));
    let err = client.login("user@clinic.co", "wrong").await.unwrap_err();
    assert!(err.to_string().contains("Invalid credentials"));
    assert!(!client.is_authenticated());
}

#[tokio::test]
async fn unauthorized_lookup_drops_the_token() {
    let base = serve_responses(vec![
        ("200 OK", r#"{"token":"abc123"}"#),
        ("401 Unauthorized", r#"{}"#),
    ])
    .await;

    let mut client =
        HorusClient::with_endpoints(&format!("{base}/login"), &format!("{base}/afiliados"));
    client.login("user@clinic.co", "secret").await.unwrap();

    let row = client.lookup("CC123456").await;
    assert_eq!(row.status, LookupStatus::Unauthorized);
    assert!(!client.is_authenticated());
}

#[tokio::test]
async fn lookup_without_login_short_circuits() {
    let mut client = HorusClient::with_endpoints("http://127.0.0.1:9/x", "http://127.0.0.1:9/y");
    let row = client.lookup("CC123").await;
    assert_eq!(row.status, LookupStatus::NotLoggedIn);
}

#[tokio::test]
async fn invalid_document_never_hits_the_network() {
    let base = serve_responses(vec![("200 OK", r#"{"token":"abc123"}"#)]).await;

    let mut client =
        HorusClient::with_endpoints(&format!("{base}/login"), "http://127.0.0.1:9/afiliados");
    client.login("user@clinic.co", "secret").await.unwrap();

    let row = client.lookup("XX-no-digits").await;
    assert_eq!(row.status, LookupStatus::InvalidFormat);
}

#[tokio::test]
async fn bulk_lookup_reports_progress_in_order() {
    let base = serve_responses(vec![
        ("200 OK", r#"{"token":"abc123"}"#),
        ("200 OK", r#"{"primer_nombre":"ANA"}"#),
        ("404 Not Found", r#"{}"#),
    ])
    .await;

    let mut client =
        HorusClient::with_endpoints(&format!("{base}/login"), &format!("{base}/afiliados"));
    client.login("user@clinic.co", "secret").await.unwrap();
    client.set_delay_ms(0, 0);

    let documents = vec!["CC1".to_string(), "CC2".to_string()];
    let mut seen = Vec::new();
    let rows = client
        .lookup_all(&documents, |done, total, row| {
            seen.push((done, total, row.document.clone()));
        })
        .await;

    assert_eq!(rows.len(), 2);
    assert!(matches!(rows[0].status, LookupStatus::Found { .. }));
    assert_eq!(rows[1].status, LookupStatus::Rejected(404));
    assert_eq!(seen, vec![(1, 2, "CC1".into()), (2, 2, "CC2".into())]);
}
