//! HTTP availability adapter against a local socket.
//!
//! Each test binds a loopback listener that answers one request with a
//! canned response, so status mapping and error translation run over a real
//! connection.

use std::time::Duration;

use mailbox_forms::domain::ports::{
    AvailabilityQuery, MailboxAvailability, MailboxAvailabilityChecker, MailboxAvailabilityError,
};
use mailbox_forms::outbound::availability::{HttpAvailabilityChecker, HttpAvailabilityIdentity};
use rstest::rstest;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use url::Url;

async fn serve_once(status: &'static str, body: &'static str) -> (Url, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.expect("accept");
        let request = read_head(&mut socket).await;
        let response = format!(
            "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );
        socket
            .write_all(response.as_bytes())
            .await
            .expect("write response");
        socket.shutdown().await.expect("shutdown");
        request
    });
    let url = Url::parse(&format!("http://{addr}/wpcom/v2")).expect("base url");
    (url, handle)
}

async fn read_head(socket: &mut tokio::net::TcpStream) -> String {
    let mut head = Vec::new();
    let mut chunk = [0_u8; 1024];
    while !head.windows(4).any(|window| window == b"\r\n\r\n") {
        let read = socket.read(&mut chunk).await.expect("read request");
        if read == 0 {
            break;
        }
        head.extend_from_slice(&chunk[..read]);
    }
    String::from_utf8_lossy(&head).into_owned()
}

fn checker(base_url: Url, timeout: Duration) -> HttpAvailabilityChecker {
    HttpAvailabilityChecker::with_identity(
        base_url,
        timeout,
        HttpAvailabilityIdentity {
            user_agent: "mailbox-forms-tests/1".to_owned(),
        },
    )
    .expect("client builds")
}

fn query() -> AvailabilityQuery {
    AvailabilityQuery::new("example.com", "john.doe")
}

#[rstest]
#[tokio::test]
async fn ok_response_means_available() {
    let (url, server) = serve_once("200 OK", r#"{"message":"Mailbox is available."}"#).await;

    let answer = checker(url, Duration::from_secs(5))
        .check(&query())
        .await
        .expect("check succeeds");
    assert_eq!(answer, MailboxAvailability::Available);

    let request = server.await.expect("server task");
    assert!(
        request.starts_with(
            "GET /wpcom/v2/emails/titan/example.com/check-mailbox-availability/john.doe "
        ),
        "unexpected request line: {request}"
    );
    assert!(
        request
            .to_ascii_lowercase()
            .contains("user-agent: mailbox-forms-tests/1"),
        "user agent missing: {request}"
    );
}

#[rstest]
#[tokio::test]
async fn error_response_carries_service_message() {
    let (url, server) = serve_once(
        "409 Conflict",
        r#"{"code":"mailbox_taken","message":"john.doe@example.com is not available."}"#,
    )
    .await;

    let answer = checker(url, Duration::from_secs(5))
        .check(&query())
        .await
        .expect("check succeeds");
    assert_eq!(
        answer,
        MailboxAvailability::Unavailable {
            message: "john.doe@example.com is not available.".to_owned()
        }
    );
    server.await.expect("server task");
}

#[rstest]
#[tokio::test]
async fn silent_server_times_out() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    let server = tokio::spawn(async move {
        let (socket, _) = listener.accept().await.expect("accept");
        tokio::time::sleep(Duration::from_secs(2)).await;
        drop(socket);
    });
    let url = Url::parse(&format!("http://{addr}/")).expect("base url");

    let error = checker(url, Duration::from_millis(200))
        .check(&query())
        .await
        .expect_err("silent server must time out");
    assert!(
        matches!(error, MailboxAvailabilityError::Timeout { .. }),
        "unexpected error: {error:?}"
    );
    server.abort();
}

#[rstest]
#[tokio::test]
async fn refused_connection_is_a_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    let url = Url::parse(&format!("http://{addr}/")).expect("base url");

    let error = checker(url, Duration::from_secs(5))
        .check(&query())
        .await
        .expect_err("closed port must fail");
    assert!(
        matches!(error, MailboxAvailabilityError::Transport { .. }),
        "unexpected error: {error:?}"
    );
}
