//! Fixed-window request counters keyed by client IP.

use std::{
	collections::HashMap,
	net::{IpAddr, Ipv4Addr, SocketAddr},
	sync::{Arc, Mutex},
	time::{Duration, Instant},
};

use axum::{
	extract::{ConnectInfo, Request, State},
	middleware::Next,
	response::{IntoResponse, Response},
};

use crate::error::ApiError;

const PRUNE_THRESHOLD: usize = 4_096;

#[derive(Debug, Clone, Copy)]
struct Window {
	started: Instant,
	count: u32,
}

/// Counts are per process and approximate. Nothing is shared across instances.
#[derive(Debug)]
pub struct RateLimiter {
	window: Duration,
	max_requests: u32,
	message: &'static str,
	windows: Mutex<HashMap<IpAddr, Window>>,
}
impl RateLimiter {
	pub fn new(window: Duration, max_requests: u32, message: &'static str) -> Self {
		Self { window, max_requests, message, windows: Mutex::new(HashMap::new()) }
	}

	/// Records one request and returns whether it fits in the client's current window.
	pub fn check(&self, client: IpAddr, now: Instant) -> bool {
		let mut windows = self.windows.lock().unwrap_or_else(|err| err.into_inner());

		if windows.len() >= PRUNE_THRESHOLD {
			windows.retain(|_, window| now.duration_since(window.started) < self.window);
		}

		let window = windows.entry(client).or_insert(Window { started: now, count: 0 });

		if now.duration_since(window.started) >= self.window {
			*window = Window { started: now, count: 0 };
		}
		if window.count >= self.max_requests {
			return false;
		}

		window.count += 1;

		true
	}

	pub fn message(&self) -> &'static str {
		self.message
	}
}

pub async fn enforce(State(limiter): State<Arc<RateLimiter>>, req: Request, next: Next) -> Response {
	let client = client_ip(&req);

	if !limiter.check(client, Instant::now()) {
		tracing::warn!(%client, path = %req.uri().path(), "Rate limit exceeded.");

		return ApiError::rate_limited(limiter.message()).into_response();
	}

	next.run(req).await
}

/// Peer address from the connection, or the unspecified address when the server was not started
/// with connect info.
fn client_ip(req: &Request) -> IpAddr {
	req.extensions()
		.get::<ConnectInfo<SocketAddr>>()
		.map(|ConnectInfo(addr)| addr.ip())
		.unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED))
}
