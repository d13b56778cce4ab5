use std::net::SocketAddr;
use std::time::Duration;

use cosmograph::session::{
	ErrorKind, FetchError, GatewayConfig, HttpGateway, SearchGateway, Summary,
};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

fn gateway(addr: SocketAddr, timeout: Duration) -> HttpGateway {
	HttpGateway::new(GatewayConfig {
		base_url: format!("http://{addr}"),
		top_k: 50,
		request_timeout: timeout,
	})
}

/// Reads one HTTP request (headers plus `content-length` body) and returns the body.
async fn read_request(socket: &mut TcpStream) -> String {
	let mut buf = Vec::new();
	let mut chunk = [0u8; 1024];
	loop {
		let n = socket.read(&mut chunk).await.unwrap();
		assert!(n > 0, "client closed before sending a full request");
		buf.extend_from_slice(&chunk[..n]);

		let text = String::from_utf8_lossy(&buf).to_string();
		let Some(end) = text.find("\r\n\r\n") else {
			continue;
		};
		let length = text[..end]
			.lines()
			.find_map(|line| {
				let (name, value) = line.split_once(':')?;
				name.eq_ignore_ascii_case("content-length")
					.then(|| value.trim().parse::<usize>().ok())
					.flatten()
			})
			.unwrap_or(0);
		if buf.len() >= end + 4 + length {
			return text[end + 4..end + 4 + length].to_string();
		}
	}
}

/// Serves a single connection with `status` and `body`, handing back what the client sent.
async fn serve_once(
	status: &'static str,
	body: &'static str,
) -> (SocketAddr, tokio::task::JoinHandle<String>) {
	let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
	let addr = listener.local_addr().unwrap();
	let handle = tokio::spawn(async move {
		let (mut socket, _) = listener.accept().await.unwrap();
		let request = read_request(&mut socket).await;
		let response = format!(
			"HTTP/1.1 {status}\r\n\
			 content-type: text/plain\r\n\
			 content-length: {}\r\n\
			 connection: close\r\n\r\n{body}",
			body.len()
		);
		socket.write_all(response.as_bytes()).await.unwrap();
		socket.shutdown().await.unwrap();
		request
	});
	(addr, handle)
}

#[tokio::test]
async fn silent_server_times_out() {
	let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
	let addr = listener.local_addr().unwrap();
	let server = tokio::spawn(async move {
		let (socket, _) = listener.accept().await.unwrap();
		tokio::time::sleep(Duration::from_secs(5)).await;
		drop(socket);
	});

	let err = gateway(addr, Duration::from_millis(200))
		.fetch_graph("mars", 50)
		.await
		.unwrap_err();
	assert_eq!(err, FetchError::Timeout);
	assert_eq!(err.kind(), ErrorKind::TransportFailure);
	server.abort();
}

#[tokio::test]
async fn error_status_is_reported_with_body() {
	let (addr, server) = serve_once("503 Service Unavailable", "down").await;

	let err = gateway(addr, Duration::from_secs(5))
		.fetch_summary("mars", 50)
		.await
		.unwrap_err();
	assert_eq!(
		err,
		FetchError::Status {
			code: 503,
			body: "down".to_string()
		}
	);
	assert_eq!(err.kind(), ErrorKind::TransportFailure);
	server.await.unwrap();
}

#[tokio::test]
async fn unreachable_service_is_a_transport_failure() {
	let addr = {
		let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
		listener.local_addr().unwrap()
	};

	let err = gateway(addr, Duration::from_secs(5))
		.fetch_graph("mars", 50)
		.await
		.unwrap_err();
	assert!(matches!(err, FetchError::Transport { .. }), "got {err:?}");
	assert_eq!(err.kind(), ErrorKind::TransportFailure);
}

#[tokio::test]
async fn graph_request_carries_query_and_top_k() {
	let (addr, server) = serve_once(
		"200 OK",
		r#"{
			"nodes": [{"id": "mars", "label": "mars", "group": 4}],
			"links": [],
			"publications": []
		}"#,
	)
	.await;

	let payload = gateway(addr, Duration::from_secs(5))
		.fetch_graph("water on mars", 25)
		.await
		.unwrap();
	assert_eq!(payload.nodes.len(), 1);
	assert_eq!(payload.nodes[0].group, 4);

	let request: serde_json::Value = serde_json::from_str(&server.await.unwrap()).unwrap();
	assert_eq!(request, serde_json::json!({"query": "water on mars", "top_k": 25}));
}

#[tokio::test]
async fn incomplete_graph_is_malformed_not_empty() {
	let (addr, server) = serve_once("200 OK", r#"{"nodes": [], "links": []}"#).await;

	let err = gateway(addr, Duration::from_secs(5))
		.fetch_graph("mars", 50)
		.await
		.unwrap_err();
	assert_eq!(err.kind(), ErrorKind::MalformedResponse);
	server.await.unwrap();
}

#[tokio::test]
async fn plain_text_summary_is_accepted() {
	let (addr, server) = serve_once("200 OK", "Plants grow slower in microgravity.").await;

	let summary = gateway(addr, Duration::from_secs(5))
		.fetch_summary("plants", 50)
		.await
		.unwrap();
	assert_eq!(
		summary,
		Summary::Text("Plants grow slower in microgravity.".to_string())
	);
	server.await.unwrap();
}
