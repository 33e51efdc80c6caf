//! Optional query parameters forwarded to the upstream API.

// self
use crate::_prelude::*;

/// Query parameter name reserved for the API key.
pub const API_KEY_PARAM: &str = "api_key";

/// Query parameters with empty and absent values filtered out.
///
/// Values are trimmed; a value that is empty after trimming is never sent. The
/// [`API_KEY_PARAM`] name is reserved for the client and silently ignored here.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QueryParams(BTreeMap<String, String>);
impl QueryParams {
	/// Creates an empty parameter set.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets `key` to `value`, dropping the entry when the value is absent or empty.
	pub fn insert<V>(&mut self, key: impl Into<String>, value: Option<V>)
	where
		V: Display,
	{
		let key = key.into();

		if key.is_empty() || key == API_KEY_PARAM {
			return;
		}

		match value.map(|value| value.to_string().trim().to_owned()) {
			Some(value) if !value.is_empty() => {
				self.0.insert(key, value);
			},
			_ => {
				self.0.remove(&key);
			},
		}
	}

	/// Builder-style variant of [`QueryParams::insert`].
	pub fn with<V>(mut self, key: impl Into<String>, value: Option<V>) -> Self
	where
		V: Display,
	{
		self.insert(key, value);

		self
	}

	/// Value stored for `key`.
	pub fn get(&self, key: &str) -> Option<&str> {
		self.0.get(key).map(String::as_str)
	}

	/// Number of parameters that will be sent.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Whether no parameter will be sent.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Parameters in name order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.0.iter().map(|(key, value)| (key.as_str(), value.as_str()))
	}
}
impl<K, V> FromIterator<(K, Option<V>)> for QueryParams
where
	K: Into<String>,
	V: Display,
{
	fn from_iter<I>(iter: I) -> Self
	where
		I: IntoIterator<Item = (K, Option<V>)>,
	{
		let mut params = Self::new();

		for (key, value) in iter {
			params.insert(key, value);
		}

		params
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn empty_and_absent_values_are_omitted() {
		let params = QueryParams::new()
			.with("offset", Some(0))
			.with("resultCount", Some(25))
			.with("publishedAfter", None::<&str>)
			.with("publishedBefore", Some("  "))
			.with("decisionDateAfter", Some(" 2020-01-01 "));

		assert_eq!(params.len(), 3);
		assert_eq!(params.get("offset"), Some("0"));
		assert_eq!(params.get("decisionDateAfter"), Some("2020-01-01"));
		assert_eq!(params.get("publishedAfter"), None);
		assert_eq!(params.get("publishedBefore"), None);
	}

	#[test]
	fn clearing_a_value_removes_it() {
		let mut params = QueryParams::new().with("offset", Some(10));

		params.insert("offset", Some(""));

		assert!(params.is_empty());
	}

	#[test]
	fn api_key_cannot_be_overridden() {
		let params: QueryParams =
			[("api_key", Some("stolen")), ("resultCount", Some("5"))].into_iter().collect();

		assert_eq!(params.iter().collect::<Vec<_>>(), [("resultCount", "5")]);
	}
}
