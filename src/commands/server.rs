// Copyright 2021-2024 Parity Technologies (UK) Ltd.
// This file is part of poll-forecaster.

// poll-forecaster is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

// poll-forecaster is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.

// You should have received a copy of the GNU General Public License
// along with poll-forecaster.  If not, see <http://www.gnu.org/licenses/>.

//! Server command implementation for the REST API.
//!
//! The feed is loaded once at startup, every `POST /forecast` re-runs the pipeline over it with
//! the parameters from the request body.

use crate::{
	commands::types::{ForecastParams, ServerConfig},
	error::Error,
	forecast,
	prelude::LOG_TARGET,
	store::PollStore,
};
use http_body_util::{BodyExt, Full};
use hyper::{
	Method, Request, Response, StatusCode,
	body::Bytes,
	header::{CONTENT_TYPE, HeaderValue},
	service::service_fn,
};
use hyper_util::{
	rt::{TokioExecutor, TokioIo},
	server::conn::auto::Builder,
};
use serde::Serialize;
use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;

type Body = Full<Bytes>;

fn text(status: StatusCode, body: impl Into<Bytes>) -> Response<Body> {
	let mut response = Response::new(Full::new(body.into()));
	*response.status_mut() = status;
	response
}

fn json<T: Serialize>(status: StatusCode, value: &T) -> Response<Body> {
	match serde_json::to_vec(value) {
		Ok(body) => {
			let mut response = text(status, body);
			response.headers_mut().insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
			response
		},
		Err(e) => text(StatusCode::INTERNAL_SERVER_ERROR, format!("Failed to encode response: {e}")),
	}
}

async fn handle_request(
	store: Arc<PollStore>,
	req: Request<hyper::body::Incoming>,
) -> Result<Response<Body>, hyper::Error> {
	match (req.method(), req.uri().path()) {
		(&Method::GET, "/health") =>
			Ok(json(StatusCode::OK, &serde_json::json!({ "status": "ok", "polls": store.len() }))),
		(&Method::POST, "/forecast") => {
			let body_bytes = match req.collect().await {
				Ok(collected) => collected.to_bytes(),
				Err(e) => return Ok(text(StatusCode::BAD_REQUEST, format!("Failed to read body: {e}"))),
			};

			let params: ForecastParams = match serde_json::from_slice(&body_bytes) {
				Ok(params) => params,
				Err(e) => return Ok(text(StatusCode::BAD_REQUEST, format!("Invalid JSON: {e}"))),
			};

			log::info!(target: LOG_TARGET, "Received /forecast request with params: {params:?}");

			let settings = match params.settings() {
				Ok(settings) => settings,
				Err(e) => return Ok(text(StatusCode::BAD_REQUEST, e.to_string())),
			};

			match tokio::task::spawn_blocking(move || forecast::run(&store, &settings)).await {
				Ok(forecast) => Ok(json(StatusCode::OK, &forecast)),
				Err(e) => {
					log::error!(target: LOG_TARGET, "Forecast failed: {e:?}");
					Ok(text(StatusCode::INTERNAL_SERVER_ERROR, format!("Forecast failed: {e}")))
				},
			}
		},
		_ => Ok(text(StatusCode::NOT_FOUND, "Not Found")),
	}
}

/// Serve the REST API on an already bound listener until the task is dropped.
pub async fn serve(listener: TcpListener, store: Arc<PollStore>) -> Result<(), Error> {
	loop {
		let (stream, _) = match listener.accept().await {
			Ok(conn) => conn,
			Err(e) => {
				log::error!(target: LOG_TARGET, "Failed to accept connection: {e}");
				continue;
			},
		};

		let store = store.clone();
		let io = TokioIo::new(stream);
		let builder = Builder::new(TokioExecutor::new());
		let conn = builder
			.serve_connection_with_upgrades(
				io,
				service_fn(move |req| handle_request(store.clone(), req)),
			)
			.into_owned();

		tokio::spawn(async move {
			if let Err(e) = conn.await {
				log::error!(target: LOG_TARGET, "Error serving connection: {e}");
			}
		});
	}
}

pub async fn server_cmd(store: PollStore, config: ServerConfig) -> Result<(), Error> {
	let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
	let listener = TcpListener::bind(&addr)
		.await
		.map_err(|e| Error::Other(format!("Failed to bind to port {}: {}", config.port, e)))?;

	log::info!(target: LOG_TARGET, "REST API server listening on http://{addr}");

	serve(listener, Arc::new(store)).await
}
