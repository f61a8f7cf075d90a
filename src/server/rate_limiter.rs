use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tokio::sync::Mutex;

use crate::server::handlers::AppState;

const WINDOW: Duration = Duration::from_secs(60);
/// Most client windows tracked at once. Expired windows are swept first,
/// then the oldest window is evicted.
const MAX_TRACKED_CLIENTS: usize = 10_000;

/// Fixed one-minute window per client IP.
pub struct RateLimiter {
    state: Arc<Mutex<HashMap<IpAddr, WindowState>>>,
    requests_per_minute: u32,
    trust_forwarded_for: bool,
}

struct WindowState {
    requests_this_minute: u32,
    minute_start: Instant,
}

impl RateLimiter {
    pub fn new(requests_per_minute: u32) -> Self {
        Self {
            state: Arc::new(Mutex::new(HashMap::new())),
            requests_per_minute,
            trust_forwarded_for: false,
        }
    }

    /// Keys clients on the first `X-Forwarded-For` hop. Only safe behind a
    /// proxy that overwrites the header.
    pub fn trust_forwarded_for(mut self, trust: bool) -> Self {
        self.trust_forwarded_for = trust;
        self
    }

    /// Counts a request. `Err` carries the seconds until the window resets.
    pub async fn check(&self, ip: IpAddr) -> std::result::Result<(), u64> {
        self.check_at(ip, Instant::now()).await
    }

    pub async fn check_at(&self, ip: IpAddr, now: Instant) -> std::result::Result<(), u64> {
        let mut state = self.state.lock().await;

        if state.len() >= MAX_TRACKED_CLIENTS && !state.contains_key(&ip) {
            state.retain(|_, w| now.saturating_duration_since(w.minute_start) < WINDOW);
            if state.len() >= MAX_TRACKED_CLIENTS {
                let oldest = state
                    .iter()
                    .min_by_key(|(_, w)| w.minute_start)
                    .map(|(ip, _)| *ip);
                if let Some(oldest) = oldest {
                    state.remove(&oldest);
                }
            }
        }

        let window = state.entry(ip).or_insert(WindowState {
            requests_this_minute: 0,
            minute_start: now,
        });

        let elapsed = now.saturating_duration_since(window.minute_start);
        if elapsed >= WINDOW {
            window.requests_this_minute = 0;
            window.minute_start = now;
        }

        if window.requests_this_minute >= self.requests_per_minute {
            let wait = WINDOW.saturating_sub(elapsed);
            tracing::debug!("Rate limited {}, retry in {:?}", ip, wait);
            return Err(wait.as_secs().max(1));
        }

        window.requests_this_minute += 1;
        Ok(())
    }

    #[cfg(test)]
    async fn tracked_clients(&self) -> usize {
        self.state.lock().await.len()
    }
}

/// Client address: the peer address, or loopback when the connection info
/// is missing. With `trust_forwarded_for` the first `X-Forwarded-For` hop
/// wins.
pub fn client_ip(request: &Request, trust_forwarded_for: bool) -> IpAddr {
    if trust_forwarded_for {
        let forwarded = request
            .headers()
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .and_then(|v| v.trim().parse::<IpAddr>().ok());
        if let Some(ip) = forwarded {
            return ip;
        }
    }

    if let Some(ConnectInfo(addr)) = request.extensions().get::<ConnectInfo<SocketAddr>>() {
        return addr.ip();
    }

    IpAddr::V4(Ipv4Addr::LOCALHOST)
}

pub async fn rate_limit(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let ip = client_ip(&request, state.rate_limiter.trust_forwarded_for);
    match state.rate_limiter.check(ip).await {
        Ok(()) => next.run(request).await,
        Err(retry_after) => (
            StatusCode::TOO_MANY_REQUESTS,
            [(header::RETRY_AFTER, retry_after.to_string())],
            Json(json!({ "error": "Too many requests" })),
        )
            .into_response(),
    }
}
