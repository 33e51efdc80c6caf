//! Upstream caller: one governed network call per invocation.
//!
//! [`UpstreamClient::perform_request`] is the single path to the network. It takes an
//! admission permit before assembling the request, performs exactly one GET, hands the
//! permit back whatever the outcome, and folds every failure into [`Error`]. Nothing is
//! retried.

pub mod params;
pub mod path;

pub use params::*;
pub use path::*;

// self
use crate::{
	_prelude::*,
	config::{self, ClientConfig},
	governor::Governor,
	http::UpstreamTransport,
	obs::{self, GateOp, GateOutcome, GateSpan},
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

#[cfg(feature = "reqwest")]
/// Upstream client specialized for the crate's default reqwest transport.
pub type ReqwestUpstreamClient = UpstreamClient<ReqwestHttpClient>;

/// Governed client for the upstream API.
///
/// Cloning is cheap and every clone shares the same governor, so the usage limits hold
/// across all of them.
pub struct UpstreamClient<C>
where
	C: ?Sized + UpstreamTransport,
{
	/// HTTP transport used for every outbound request.
	pub http_client: Arc<C>,
	/// Admission governor consulted before each request.
	pub governor: Arc<Governor>,
	config: ClientConfig,
}
impl<C> UpstreamClient<C>
where
	C: ?Sized + UpstreamTransport,
{
	/// Creates a client over the caller-provided transport and governor.
	pub fn with_http_client(
		config: ClientConfig,
		governor: Arc<Governor>,
		http_client: impl Into<Arc<C>>,
	) -> Result<Self> {
		config::validate_base_url(&config.base_url)?;

		Ok(Self { http_client: http_client.into(), governor, config })
	}

	/// Configuration the client was built with.
	pub fn config(&self) -> &ClientConfig {
		&self.config
	}

	/// Assembles `base_url + path + api_key + params` for one request.
	pub fn request_url(&self, path: &ResourcePath, params: &QueryParams) -> Result<Url> {
		let mut url = self.config.base_url.clone();

		url.path_segments_mut()
			.map_err(|_| crate::error::ConfigError::UnsupportedBaseUrl {
				url: self.config.base_url.to_string(),
			})?
			.pop_if_empty()
			.extend(path.segments())
			.push("");
		url.set_query(None);

		{
			let mut query = url.query_pairs_mut();

			query.append_pair(API_KEY_PARAM, self.config.api_key.expose());

			for (key, value) in params.iter() {
				query.append_pair(key, value);
			}
		}

		Ok(url)
	}

	/// Performs one governed GET and returns the JSON payload untouched.
	///
	/// Quota exhaustion is returned before any request is built. Non-2xx responses map to
	/// [`Error::Upstream`] with the body verbatim; transport failures map to
	/// [`Error::Transport`]. The admission is released on every path.
	pub async fn perform_request(
		&self,
		path: &ResourcePath,
		params: &QueryParams,
	) -> Result<serde_json::Value> {
		const OP: GateOp = GateOp::Request;

		let span = GateSpan::new(OP, "perform_request");

		obs::record_outcome(OP, GateOutcome::Attempt);

		let result = span
			.instrument(async move {
				let permit = self.governor.acquire().await?;
				let url = self.request_url(path, params)?;
				let outcome = self.http_client.get(url).await;

				permit.release();

				let response = outcome?;

				if !response.is_success() {
					return Err(Error::Upstream { status: response.status, body: response.body });
				}

				serde_json::from_str(&response.body)
					.map_err(|source| Error::Decode { status: response.status, source })
			})
			.await;

		match &result {
			Ok(_) => obs::record_outcome(OP, GateOutcome::Success),
			Err(_) => obs::record_outcome(OP, GateOutcome::Failure),
		}

		result
	}
}
#[cfg(feature = "reqwest")]
impl UpstreamClient<ReqwestHttpClient> {
	/// Creates a client with its own reqwest transport and a default governor.
	///
	/// Use [`UpstreamClient::with_http_client`] to share a governor across clients.
	pub fn new(config: ClientConfig) -> Result<Self> {
		Self::with_http_client(config, Arc::new(Governor::default()), ReqwestHttpClient::try_new()?)
	}
}
impl<C> Clone for UpstreamClient<C>
where
	C: ?Sized + UpstreamTransport,
{
	fn clone(&self) -> Self {
		Self {
			http_client: self.http_client.clone(),
			governor: self.governor.clone(),
			config: self.config.clone(),
		}
	}
}
impl<C> Debug for UpstreamClient<C>
where
	C: ?Sized + UpstreamTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("UpstreamClient")
			.field("base_url", &self.config.base_url.as_str())
			.field("governor", &self.governor)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::sync::atomic::{AtomicUsize, Ordering};
	// crates.io
	use time::macros::date;
	// self
	use super::*;
	use crate::{
		clock::ManualClock,
		config::ApiKey,
		error::TransportError,
		governor::GovernorConfig,
		http::{TransportFuture, UpstreamResponse},
	};

	#[derive(Default)]
	struct ScriptedTransport {
		calls: AtomicUsize,
		urls: Mutex<Vec<Url>>,
		responses: Mutex<VecDeque<Result<UpstreamResponse, TransportError>>>,
	}
	impl ScriptedTransport {
		fn replying(responses: impl IntoIterator<Item = Result<UpstreamResponse, TransportError>>) -> Self {
			Self { responses: Mutex::new(responses.into_iter().collect()), ..Default::default() }
		}

		fn calls(&self) -> usize {
			self.calls.load(Ordering::SeqCst)
		}
	}
	impl UpstreamTransport for ScriptedTransport {
		fn get(&self, url: Url) -> TransportFuture<'_> {
			self.calls.fetch_add(1, Ordering::SeqCst);
			self.urls.lock().push(url);

			let next = self
				.responses
				.lock()
				.pop_front()
				.unwrap_or_else(|| Ok(UpstreamResponse::new(200, "{}")));

			Box::pin(async move { next })
		}
	}

	fn client(
		transport: Arc<ScriptedTransport>,
		config: GovernorConfig,
	) -> UpstreamClient<ScriptedTransport> {
		let clock = ManualClock::new(date!(2024 - 07 - 01));
		let governor = Arc::new(Governor::with_clock(config, Arc::new(clock)));
		let config = ClientConfig::new(ApiKey::new("test-key"))
			.with_base_url(Url::parse("https://api.example.com/v1").expect("Base URL parses."))
			.expect("Base URL should be accepted.");

		UpstreamClient::with_http_client(config, governor, transport)
			.expect("Client should build.")
	}

	fn case_path() -> ResourcePath {
		"/caseBrowse/en/csc-scc/".parse().expect("Fixture path should parse.")
	}

	#[test]
	fn request_url_orders_key_before_params() {
		let transport = Arc::new(ScriptedTransport::default());
		let client = client(transport, GovernorConfig::default());
		let params = QueryParams::new()
			.with("resultCount", Some(10))
			.with("offset", Some(0))
			.with("publishedAfter", None::<String>);
		let url = client.request_url(&case_path(), &params).expect("URL should build.");

		assert_eq!(
			url.as_str(),
			"https://api.example.com/v1/caseBrowse/en/csc-scc/?api_key=test-key&offset=0&resultCount=10"
		);
	}

	#[test]
	fn request_url_encodes_identifiers() {
		let transport = Arc::new(ScriptedTransport::default());
		let client = client(transport, GovernorConfig::default());
		let path = ResourcePath::new(ResourceCategory::LegislationBrowse, Language::Fr)
			.push("qc")
			.and_then(|path| path.push("rlrq-c-c-12?x"))
			.expect("Identifiers should be valid.");
		let url = client.request_url(&path, &QueryParams::new()).expect("URL should build.");

		assert_eq!(
			url.as_str(),
			"https://api.example.com/v1/legislationBrowse/fr/qc/rlrq-c-c-12%3Fx/?api_key=test-key"
		);
	}

	#[tokio::test(start_paused = true)]
	async fn success_returns_payload_and_calls_once() {
		let transport = Arc::new(ScriptedTransport::replying([Ok(UpstreamResponse::new(
			200,
			"{\"caseDatabases\":[]}",
		))]));
		let client = client(transport.clone(), GovernorConfig::default());
		let payload = client
			.perform_request(&case_path(), &QueryParams::new())
			.await
			.expect("Request should succeed.");

		assert_eq!(payload, serde_json::json!({ "caseDatabases": [] }));
		assert_eq!(transport.calls(), 1);
		assert!(!client.governor.snapshot().in_flight);
	}

	#[tokio::test(start_paused = true)]
	async fn not_found_surfaces_status_and_releases() {
		let transport =
			Arc::new(ScriptedTransport::replying([Ok(UpstreamResponse::new(404, "not found"))]));
		let client = client(transport.clone(), GovernorConfig::default());
		let err = client
			.perform_request(&case_path(), &QueryParams::new())
			.await
			.expect_err("404 should fail.");
		let message = err.to_string();

		assert!(message.contains("404"));
		assert!(message.contains("not found"));
		assert_eq!(err.status(), Some(404));

		let permit = tokio::time::timeout(Duration::from_secs(5), client.governor.acquire())
			.await
			.expect("Token should have been released.")
			.expect("Quota should remain.");

		assert_eq!(permit.sequence(), 2);
	}

	#[tokio::test(start_paused = true)]
	async fn transport_failure_is_wrapped_and_releases() {
		let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "connection refused");
		let transport = Arc::new(ScriptedTransport::replying([Err(TransportError::Io(io))]));
		let client = client(transport.clone(), GovernorConfig::default());
		let err = client
			.perform_request(&case_path(), &QueryParams::new())
			.await
			.expect_err("Transport failure should surface.");

		assert!(matches!(err, Error::Transport(_)));
		assert!(err.to_string().contains("connection refused"));
		assert!(!client.governor.snapshot().in_flight);
	}

	#[tokio::test(start_paused = true)]
	async fn malformed_success_body_is_a_decode_error() {
		let transport =
			Arc::new(ScriptedTransport::replying([Ok(UpstreamResponse::new(200, "<html>"))]));
		let client = client(transport, GovernorConfig::default());
		let err = client
			.perform_request(&case_path(), &QueryParams::new())
			.await
			.expect_err("Non-JSON body should fail.");

		assert!(matches!(err, Error::Decode { status: 200, .. }));
	}

	#[tokio::test(start_paused = true)]
	async fn quota_failure_never_touches_transport() {
		let transport = Arc::new(ScriptedTransport::default());
		let client = client(transport.clone(), GovernorConfig::default().with_daily_quota(1));

		client
			.perform_request(&case_path(), &QueryParams::new())
			.await
			.expect("First request should succeed.");

		let err = client
			.perform_request(&case_path(), &QueryParams::new())
			.await
			.expect_err("Second request should exceed the quota.");

		assert!(err.is_quota_exceeded());
		assert_eq!(transport.calls(), 1);
		assert_eq!(transport.urls.lock().len(), 1);
	}
}
