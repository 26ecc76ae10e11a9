//! Realtime-database adapter.
//!
//! Implements [`RemotePort`] and [`FeedPort`] over the database's REST
//! surface:
//!
//! | Operation      | Request                                   |
//! |----------------|-------------------------------------------|
//! | push           | `PUT  <url>/awning/<key>.json?auth=<tok>` |
//! | poll_snapshot  | `GET  <url>/awning.json?auth=<tok>`       |
//!
//! Snapshots are requested at most once per `feed_poll_interval_ms`.
//!
//! ## cfg gating
//!
//! - **`espidf`**: `EspHttpConnection` wrapped in the `embedded_svc`
//!   HTTP client, TLS via the certificate bundle.
//! - **host**: an in-memory store with injectable failures.

use log::{debug, info};
use serde_json::Value;

use crate::app::ports::{FeedPort, RemotePort};
use crate::config::SystemConfig;
use crate::error::TransportError;
use crate::remote::paths::{ROOT, RemotePath};
use crate::scheduler::IntervalGate;

#[cfg(feature = "espidf")]
use embedded_svc::http::{Method, client::Client as HttpClient};
#[cfg(feature = "espidf")]
use esp_idf_svc::http::client::{Configuration as HttpConfiguration, EspHttpConnection};
#[cfg(feature = "espidf")]
use esp_idf_svc::io::{Write, utils::try_read_full};

/// Largest snapshot body accepted.
#[cfg(feature = "espidf")]
const MAX_BODY: usize = 1024;

/// REST URL for `path` (absolute, e.g. `/awning/status`).
pub fn rest_url(base: &str, path: &str, auth: &str) -> String {
    if auth.is_empty() {
        format!("{}{}.json", base, path)
    } else {
        format!("{}{}.json?auth={}", base, path, auth)
    }
}

pub struct RtdbAdapter {
    base_url: heapless::String<96>,
    #[cfg_attr(not(feature = "espidf"), allow(dead_code))]
    auth: heapless::String<64>,
    poll_gate: IntervalGate,
    link_up: bool,
    #[cfg(feature = "espidf")]
    client: HttpClient<EspHttpConnection>,
    #[cfg(not(feature = "espidf"))]
    sim: SimStore,
}

// ───────────────────────────────────────────────────────────────
// ESP-IDF backend
// ───────────────────────────────────────────────────────────────

#[cfg(feature = "espidf")]
impl RtdbAdapter {
    pub fn new(config: &SystemConfig) -> anyhow::Result<Self> {
        let connection = EspHttpConnection::new(&HttpConfiguration {
            buffer_size: Some(1024),
            timeout: Some(core::time::Duration::from_secs(5)),
            crt_bundle_attach: Some(esp_idf_svc::sys::esp_crt_bundle_attach),
            ..Default::default()
        })?;
        info!("Rtdb: client ready for {}", config.database_url);
        Ok(Self {
            base_url: config.database_url.clone(),
            auth: config.database_auth.clone(),
            poll_gate: IntervalGate::new(u64::from(config.feed_poll_interval_ms)),
            link_up: false,
            client: HttpClient::wrap(connection),
        })
    }

    fn put(&mut self, path: &str, body: &str) -> Result<(), TransportError> {
        let url = rest_url(&self.base_url, path, &self.auth);
        let len = body.len().to_string();
        let headers = [
            ("content-type", "application/json"),
            ("content-length", len.as_str()),
        ];
        let mut request = self
            .client
            .request(Method::Put, &url, &headers)
            .map_err(|_| TransportError::Io)?;
        request
            .write_all(body.as_bytes())
            .map_err(|_| TransportError::Io)?;
        let response = request.submit().map_err(|_| TransportError::Io)?;
        match response.status() {
            200..=299 => Ok(()),
            code => Err(TransportError::Http(code)),
        }
    }

    fn get(&mut self, path: &str) -> Result<Value, TransportError> {
        let url = rest_url(&self.base_url, path, &self.auth);
        let request = self
            .client
            .request(Method::Get, &url, &[("accept", "application/json")])
            .map_err(|_| TransportError::Io)?;
        let mut response = request.submit().map_err(|_| TransportError::Io)?;
        let status = response.status();
        if !(200..300).contains(&status) {
            return Err(TransportError::Http(status));
        }
        let mut buf = [0u8; MAX_BODY];
        let n = try_read_full(&mut response, &mut buf).map_err(|_| TransportError::Io)?;
        if n == MAX_BODY {
            log::warn!("Rtdb: snapshot truncated at {} bytes", MAX_BODY);
            return Err(TransportError::BadResponse);
        }
        serde_json::from_slice(&buf[..n]).map_err(|_| TransportError::BadResponse)
    }
}

// ───────────────────────────────────────────────────────────────
// Host backend
// ───────────────────────────────────────────────────────────────

#[cfg(not(feature = "espidf"))]
#[derive(Debug, Default)]
struct SimStore {
    values: std::collections::BTreeMap<&'static str, i64>,
    failure: Option<TransportError>,
    writes: std::vec::Vec<(RemotePath, i64)>,
}

#[cfg(not(feature = "espidf"))]
impl RtdbAdapter {
    pub fn new(config: &SystemConfig) -> anyhow::Result<Self> {
        info!("Rtdb: simulation backend");
        Ok(Self {
            base_url: config.database_url.clone(),
            auth: config.database_auth.clone(),
            poll_gate: IntervalGate::new(u64::from(config.feed_poll_interval_ms)),
            link_up: true,
            sim: SimStore::default(),
        })
    }

    fn put(&mut self, path: &str, body: &str) -> Result<(), TransportError> {
        if let Some(e) = self.sim.failure {
            return Err(e);
        }
        let key = path
            .strip_prefix(ROOT)
            .and_then(|p| p.strip_prefix('/'))
            .and_then(RemotePath::from_key)
            .ok_or(TransportError::Http(400))?;
        let value: i64 = body.parse().map_err(|_| TransportError::Http(400))?;
        self.sim.values.insert(key.key(), value);
        self.sim.writes.push((key, value));
        Ok(())
    }

    fn get(&mut self, _path: &str) -> Result<Value, TransportError> {
        if let Some(e) = self.sim.failure {
            return Err(e);
        }
        let obj: serde_json::Map<String, Value> = self
            .sim
            .values
            .iter()
            .map(|(k, v)| ((*k).to_owned(), Value::from(*v)))
            .collect();
        Ok(Value::Object(obj))
    }

    /// Write a value as an external client (phone app) would.
    pub fn sim_set(&mut self, path: RemotePath, value: i64) {
        self.sim.values.insert(path.key(), value);
    }

    pub fn sim_get(&self, path: RemotePath) -> Option<i64> {
        self.sim.values.get(path.key()).copied()
    }

    /// Make every request fail with `error` until cleared with `None`.
    pub fn sim_fail(&mut self, error: Option<TransportError>) {
        self.sim.failure = error;
    }

    /// Successful pushes in order.
    pub fn sim_writes(&self) -> &[(RemotePath, i64)] {
        &self.sim.writes
    }
}

// ───────────────────────────────────────────────────────────────
// Ports
// ───────────────────────────────────────────────────────────────

impl RtdbAdapter {
    /// Base URL this adapter targets.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Requests fail fast with [`TransportError::NotConnected`] while the
    /// link is down instead of blocking on a socket timeout.
    pub fn set_link_up(&mut self, up: bool) {
        self.link_up = up;
    }

    fn ready(&self) -> Result<(), TransportError> {
        if !self.link_up || (cfg!(feature = "espidf") && self.base_url.is_empty()) {
            return Err(TransportError::NotConnected);
        }
        Ok(())
    }
}

impl RemotePort for RtdbAdapter {
    fn push(&mut self, path: RemotePath, value: i64) -> Result<(), TransportError> {
        self.ready()?;
        let body = value.to_string();
        self.put(path.full(), &body)
            .inspect(|_| debug!("Rtdb: PUT {} = {}", path.full(), body))
    }
}

impl FeedPort for RtdbAdapter {
    fn poll_snapshot(&mut self, now_ms: u64) -> Result<Option<Value>, TransportError> {
        if !self.poll_gate.poll(now_ms) {
            return Ok(None);
        }
        self.ready()?;
        self.get(ROOT).map(Some)
    }
}
