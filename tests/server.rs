//! Tests for the server command

mod common;

use clap::Parser;
use poll_forecaster::{
	commands::{server::serve, types::ServerConfig},
	feed::parse_feed,
};
use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;

/// Test server command help works
#[test]
fn server_help_works() {
	use assert_cmd::Command;
	let mut cmd = Command::new(assert_cmd::cargo::cargo_bin(env!("CARGO_PKG_NAME")));
	cmd.args(["server", "--help"]);
	cmd.assert().success();
}

/// Test ServerConfig parsing
#[test]
fn server_config_parsing() {
	// Test default port
	let config = ServerConfig::try_parse_from(["server"]).unwrap();
	assert_eq!(config.port, 8080);

	// Test custom port
	let config = ServerConfig::try_parse_from(["server", "--port", "9090"]).unwrap();
	assert_eq!(config.port, 9090);

	// Test environment variable
	unsafe { std::env::set_var("PORT", "7070") };
	let config = ServerConfig::try_parse_from(["server"]).unwrap();
	assert_eq!(config.port, 7070);
	unsafe { std::env::remove_var("PORT") };
}

async fn spawn_server() -> SocketAddr {
	common::init_logger();
	let feed = parse_feed(common::SAMPLE_FEED.as_bytes()).unwrap();

	let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
	let addr = listener.local_addr().unwrap();
	tokio::spawn(serve(listener, Arc::new(feed.store)));
	addr
}

#[tokio::test]
async fn server_forecasts_per_request() {
	let addr = spawn_server().await;
	let client = reqwest::Client::new();

	let response = client
		.post(format!("http://{addr}/forecast"))
		.body(r#"{"candidate1": "Joe Biden", "candidate2": "Donald Trump", "bias": 10}"#)
		.send()
		.await
		.unwrap();
	assert_eq!(response.status(), 200);
	assert_eq!(response.headers()["content-type"], "application/json");

	let forecast: serde_json::Value = serde_json::from_str(&response.text().await.unwrap()).unwrap();
	assert_eq!(forecast["metadata"]["bias"], 10.0);
	assert_eq!(forecast["regions"][2]["region"], "Ohio");
	assert_eq!(forecast["regions"][2]["winner"], "Donald Trump");

	// the store is reused, a second request sees the same polls
	let response = client
		.post(format!("http://{addr}/forecast"))
		.body(r#"{"candidate1": "Joe Biden", "candidate2": "Donald Trump"}"#)
		.send()
		.await
		.unwrap();
	let forecast: serde_json::Value = serde_json::from_str(&response.text().await.unwrap()).unwrap();
	assert_eq!(forecast["regions"][2]["winner"], "Joe Biden");
}

#[tokio::test]
async fn server_rejects_bad_requests() {
	let addr = spawn_server().await;
	let client = reqwest::Client::new();

	let status = |body: &'static str| {
		let client = client.clone();
		async move {
			client
				.post(format!("http://{addr}/forecast"))
				.body(body)
				.send()
				.await
				.unwrap()
				.status()
		}
	};

	assert_eq!(status("not json").await, 400);
	assert_eq!(status(r#"{"candidate1": "Joe Biden"}"#).await, 400);
	assert_eq!(status(r#"{"candidate1": "Joe Biden", "candidate2": "Joe Biden"}"#).await, 400);

	let response = client.get(format!("http://{addr}/forecast")).send().await.unwrap();
	assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn server_health() {
	let addr = spawn_server().await;

	let response = reqwest::get(format!("http://{addr}/health")).await.unwrap();
	assert_eq!(response.status(), 200);

	let health: serde_json::Value = serde_json::from_str(&response.text().await.unwrap()).unwrap();
	assert_eq!(health["status"], "ok");
	assert_eq!(health["polls"], 15);
}
