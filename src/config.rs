//! Client configuration: upstream base URL and API key.

// self
use crate::{_prelude::*, error::ConfigError};

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "CANLII_API_KEY";
/// Environment variable overriding the base URL.
pub const BASE_URL_ENV: &str = "CANLII_API_BASE_URL";
/// Public endpoint of the upstream API.
pub const DEFAULT_BASE_URL: &str = "https://api.canlii.org/v1";

/// Redacted API key wrapper keeping the credential out of logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiKey(String);
impl ApiKey {
	/// Wraps a new key.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner key. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}
}
impl Debug for ApiKey {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("ApiKey").field(&"<redacted>").finish()
	}
}
impl Display for ApiKey {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

/// Where and how the upstream API is reached.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
	/// Root URL every resource path is appended to.
	pub base_url: Url,
	/// Key sent as the `api_key` query parameter.
	pub api_key: ApiKey,
}
impl ClientConfig {
	/// Creates a configuration against the public endpoint.
	pub fn new(api_key: ApiKey) -> Self {
		Self { base_url: default_base_url(), api_key }
	}

	/// Points the client at another base URL.
	pub fn with_base_url(mut self, base_url: Url) -> Result<Self, ConfigError> {
		validate_base_url(&base_url)?;

		self.base_url = base_url;

		Ok(self)
	}

	/// Loads the configuration from [`API_KEY_ENV`] and, optionally, [`BASE_URL_ENV`].
	pub fn from_env() -> Result<Self, ConfigError> {
		Self::from_lookup(|name| std::env::var(name).ok())
	}

	/// Loads the configuration through an arbitrary variable lookup.
	pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
	where
		F: Fn(&str) -> Option<String>,
	{
		let api_key = lookup(API_KEY_ENV)
			.map(|value| value.trim().to_owned())
			.filter(|value| !value.is_empty())
			.ok_or(ConfigError::MissingApiKey { var: API_KEY_ENV })?;
		let config = Self::new(ApiKey::new(api_key));

		match lookup(BASE_URL_ENV).filter(|value| !value.trim().is_empty()) {
			Some(raw) => config.with_base_url(Url::parse(raw.trim())?),
			None => Ok(config),
		}
	}
}

fn default_base_url() -> Url {
	Url::parse(DEFAULT_BASE_URL).expect("Default base URL must parse.")
}

pub(crate) fn validate_base_url(url: &Url) -> Result<(), ConfigError> {
	if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
		return Err(ConfigError::UnsupportedBaseUrl { url: url.to_string() });
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	// std
	use std::collections::HashMap;
	// self
	use super::*;

	fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
		let vars: HashMap<String, String> =
			vars.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect();

		move |name| vars.get(name).cloned()
	}

	#[test]
	fn api_key_formatters_redact() {
		let key = ApiKey::new("super-secret");

		assert_eq!(format!("{key:?}"), "ApiKey(\"<redacted>\")");
		assert_eq!(format!("{key}"), "<redacted>");
		assert_eq!(key.expose(), "super-secret");
	}

	#[test]
	fn env_lookup_requires_api_key() {
		let err = ClientConfig::from_lookup(lookup(&[])).expect_err("Missing key should fail.");

		assert!(matches!(err, ConfigError::MissingApiKey { var: API_KEY_ENV }));

		let err = ClientConfig::from_lookup(lookup(&[(API_KEY_ENV, "   ")]))
			.expect_err("Blank key should fail.");

		assert!(matches!(err, ConfigError::MissingApiKey { .. }));
	}

	#[test]
	fn env_lookup_applies_base_url_override() {
		let config = ClientConfig::from_lookup(lookup(&[(API_KEY_ENV, " key-1 ")]))
			.expect("Key alone should be enough.");

		assert_eq!(config.api_key.expose(), "key-1");
		assert_eq!(config.base_url.as_str(), DEFAULT_BASE_URL);

		let config = ClientConfig::from_lookup(lookup(&[
			(API_KEY_ENV, "key-2"),
			(BASE_URL_ENV, "http://127.0.0.1:8080/v1"),
		]))
		.expect("Override should parse.");

		assert_eq!(config.base_url.as_str(), "http://127.0.0.1:8080/v1");
	}

	#[test]
	fn base_url_must_carry_paths() {
		let config = ClientConfig::new(ApiKey::new("key"));

		assert!(matches!(
			config.clone().with_base_url(Url::parse("mailto:law@example.com").expect("URL parses.")),
			Err(ConfigError::UnsupportedBaseUrl { .. })
		));
		assert!(matches!(
			config.with_base_url(Url::parse("ftp://example.com/v1").expect("URL parses.")),
			Err(ConfigError::UnsupportedBaseUrl { .. })
		));

		let err = ClientConfig::from_lookup(lookup(&[(API_KEY_ENV, "key"), (BASE_URL_ENV, "::")]))
			.expect_err("Unparsable override should fail.");

		assert!(matches!(err, ConfigError::InvalidBaseUrl { .. }));
	}
}
