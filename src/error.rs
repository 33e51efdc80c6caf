//! Gate-level error types shared across the governor, transport, and lookup layers.

// self
use crate::{_prelude::*, governor::QuotaEpoch, upstream::PathError};

/// Gate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical gate error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Resource path or query could not be built.
	#[error(transparent)]
	InvalidPath(#[from] PathError),

	/// The daily admission ceiling has been reached for the current epoch.
	#[error("Daily quota of {limit} requests exhausted for {epoch}.")]
	QuotaExceeded {
		/// Configured number of admissions per epoch.
		limit: u32,
		/// Epoch whose quota is exhausted.
		epoch: QuotaEpoch,
	},
	/// Upstream answered with a non-success status.
	#[error("Upstream API returned HTTP {status}: {body}")]
	Upstream {
		/// HTTP status code.
		status: u16,
		/// Response body, verbatim.
		body: String,
	},
	/// Upstream answered with a success status but the body is not JSON.
	#[error("Upstream API returned HTTP {status} with a malformed JSON body.")]
	Decode {
		/// HTTP status code.
		status: u16,
		/// Underlying parsing failure.
		#[source]
		source: serde_json::Error,
	},
}
impl Error {
	/// Returns `true` when the error is the daily quota gate.
	pub fn is_quota_exceeded(&self) -> bool {
		matches!(self, Self::QuotaExceeded { .. })
	}

	/// HTTP status attached to the error, when the upstream produced one.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Upstream { status, .. } | Self::Decode { status, .. } => Some(*status),
			_ => None,
		}
	}
}

/// Configuration and validation failures raised while setting up the gate.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// No API key was supplied.
	#[error("The {var} environment variable must hold a non-empty API key.")]
	MissingApiKey {
		/// Environment variable consulted.
		var: &'static str,
	},
	/// Base URL cannot be parsed.
	#[error("Base URL is invalid.")]
	InvalidBaseUrl {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Base URL parsed but cannot carry the resource path.
	#[error("Base URL `{url}` must use http(s) and accept path segments.")]
	UnsupportedBaseUrl {
		/// Offending URL.
		url: String,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
impl From<url::ParseError> for ConfigError {
	fn from(e: url::ParseError) -> Self {
		Self::InvalidBaseUrl { source: e }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the upstream API: {source}")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the upstream API: {0}")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		// The request URL carries the API key.
		Self::network(e.without_url())
	}
}
