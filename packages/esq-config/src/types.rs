use std::time::Duration;

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
	pub connection: Connection,
	#[serde(default)]
	pub service: Service,
}

/// Where and how search requests are sent.
///
/// The request builder only reads this record. Network access belongs to whatever transport
/// consumes the rendered request.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct Connection {
	/// Base URL of the search backend, e.g. "http://localhost:9200".
	pub endpoint: String,
	pub timeout_ms: u64,
	/// Optional. When absent, request paths omit the index segment.
	pub index: Option<String>,
	/// Optional. Asks the backend for indented responses.
	#[serde(default)]
	pub pretty: bool,
}
impl Connection {
	pub fn new(endpoint: impl Into<String>) -> Self {
		Self {
			endpoint: endpoint.into(),
			timeout_ms: DEFAULT_TIMEOUT_MS,
			index: None,
			pretty: false,
		}
	}

	pub fn with_index(mut self, index: impl Into<String>) -> Self {
		self.index = Some(index.into());

		self
	}

	pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
		self.timeout_ms = timeout_ms;

		self
	}

	pub fn with_pretty(mut self, pretty: bool) -> Self {
		self.pretty = pretty;

		self
	}

	pub fn timeout(&self) -> Duration {
		Duration::from_millis(self.timeout_ms)
	}
}

#[derive(Debug, Deserialize)]
pub struct Service {
	#[serde(default = "default_log_level")]
	pub log_level: String,
}
impl Default for Service {
	fn default() -> Self {
		Self { log_level: default_log_level() }
	}
}

pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

fn default_log_level() -> String {
	"info".to_string()
}
