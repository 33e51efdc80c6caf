//! Transport primitives for upstream lookups.
//!
//! [`UpstreamTransport`] is the crate's only dependency on an HTTP stack. The upstream
//! caller hands it a fully assembled URL and expects back the status code and the textual
//! body, whatever the status. Implementations must not retry: every call to
//! [`UpstreamTransport::get`] maps to at most one request on the wire, because the
//! governor has already counted it against the daily quota.

// self
use crate::{_prelude::*, error::TransportError};

/// Boxed future returned by [`UpstreamTransport::get`].
pub type TransportFuture<'a> =
	Pin<Box<dyn Future<Output = Result<UpstreamResponse, TransportError>> + 'a + Send>>;

/// Abstraction over HTTP transports capable of executing upstream GET requests.
///
/// Implementations must be `Send + Sync + 'static` so a single transport can be shared
/// (typically behind `Arc<T>`) by every caller of the upstream client.
pub trait UpstreamTransport
where
	Self: 'static + Send + Sync,
{
	/// Performs one GET request against `url`.
	///
	/// Non-success statuses are returned as [`UpstreamResponse`] values; only failures to
	/// obtain a response at all surface as [`TransportError`].
	fn get(&self, url: Url) -> TransportFuture<'_>;
}

/// Status and body of an upstream response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpstreamResponse {
	/// HTTP status code.
	pub status: u16,
	/// Response body decoded as text.
	pub body: String,
}
impl UpstreamResponse {
	/// Creates a response from its parts.
	pub fn new(status: u16, body: impl Into<String>) -> Self {
		Self { status, body: body.into() }
	}

	/// Whether the status is in the 2xx range.
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Builds a client identifying itself with the crate's user agent.
	pub fn try_new() -> Result<Self, crate::error::ConfigError> {
		let client = ReqwestClient::builder()
			.user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
			.build()?;

		Ok(Self(client))
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl UpstreamTransport for ReqwestHttpClient {
	fn get(&self, url: Url) -> TransportFuture<'_> {
		Box::pin(async move {
			let response = self
				.0
				.get(url)
				.header(reqwest::header::ACCEPT, "application/json")
				.send()
				.await?;
			let status = response.status().as_u16();
			let body = response.text().await?;

			Ok(UpstreamResponse { status, body })
		})
	}
}
