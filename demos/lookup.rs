//! Demonstrates governed lookups against a mock upstream: concurrent callers are admitted one
//! at a time, half a second apart, and the remaining daily quota is reported afterwards.

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
// self
use canlii_gate::{
	config::{ApiKey, ClientConfig},
	governor::{Governor, GovernorConfig},
	http::ReqwestHttpClient,
	upstream::{Language, ReqwestUpstreamClient},
	url::Url,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let databases = server
		.mock_async(|when, then| {
			when.method(GET).path("/v1/caseBrowse/en/").query_param("api_key", "demo-key");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"caseDatabases\":[{\"databaseId\":\"csc-scc\",\"jurisdiction\":\"ca\"}]}");
		})
		.await;
	let config = ClientConfig::new(ApiKey::new("demo-key"))
		.with_base_url(Url::parse(&server.url("/v1"))?)?;
	let governor = Arc::new(Governor::new(GovernorConfig::default()));
	let client =
		ReqwestUpstreamClient::with_http_client(config, governor, ReqwestHttpClient::try_new()?)?;
	let (first, second, third) = tokio::join!(
		client.case_databases(Language::En),
		client.case_databases(Language::En),
		client.case_databases(Language::En),
	);

	for payload in [first?, second?, third?] {
		println!("Case databases: {payload}.");
	}

	let snapshot = client.governor.snapshot();

	println!(
		"Admitted {} lookups for {}; {} remain today.",
		snapshot.admitted, snapshot.epoch, snapshot.remaining
	);

	databases.assert_calls_async(3).await;

	Ok(())
}
