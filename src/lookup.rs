//! Catalogue of the read-only lookups the upstream API offers.
//!
//! Each method maps one operation onto a [`ResourcePath`] + [`QueryParams`] pair and
//! forwards it to [`UpstreamClient::perform_request`], so every lookup is governed and the
//! payload comes back untouched.

// self
use crate::{
	_prelude::*,
	http::UpstreamTransport,
	upstream::{Language, PathError, QueryParams, ResourceCategory, ResourcePath, UpstreamClient},
};

/// Largest page size the case listing accepts.
pub const MAX_RESULT_COUNT: u32 = 10_000;

/// Citation relationship to list for a decision.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CitatorKind {
	/// Decisions cited by the decision.
	CitedCases,
	/// Decisions citing the decision.
	CitingCases,
	/// Legislation cited by the decision.
	CitedLegislations,
}
impl CitatorKind {
	/// Returns the path segment naming the relationship.
	pub const fn as_str(self) -> &'static str {
		match self {
			CitatorKind::CitedCases => "citedCases",
			CitatorKind::CitingCases => "citingCases",
			CitatorKind::CitedLegislations => "citedLegislations",
		}
	}
}
impl Display for CitatorKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Paging and date filters for a case listing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CaseListQuery {
	/// Index of the first decision to return.
	pub offset: u32,
	/// Number of decisions to return (1 to [`MAX_RESULT_COUNT`]).
	pub result_count: u32,
	/// Only decisions published before this day.
	pub published_before: Option<Date>,
	/// Only decisions published after this day.
	pub published_after: Option<Date>,
	/// Only decisions modified before this day.
	pub modified_before: Option<Date>,
	/// Only decisions modified after this day.
	pub modified_after: Option<Date>,
	/// Only decisions changed before this day.
	pub changed_before: Option<Date>,
	/// Only decisions changed after this day.
	pub changed_after: Option<Date>,
	/// Only decisions rendered before this day.
	pub decision_date_before: Option<Date>,
	/// Only decisions rendered after this day.
	pub decision_date_after: Option<Date>,
}
impl CaseListQuery {
	/// Creates a query for one page of results.
	pub fn new(offset: u32, result_count: u32) -> Self {
		Self { offset, result_count, ..Default::default() }
	}

	/// Restricts the listing to decisions published within `[after, before]`.
	pub fn published_between(mut self, after: Option<Date>, before: Option<Date>) -> Self {
		self.published_after = after;
		self.published_before = before;

		self
	}

	/// Restricts the listing to decisions modified within `[after, before]`.
	pub fn modified_between(mut self, after: Option<Date>, before: Option<Date>) -> Self {
		self.modified_after = after;
		self.modified_before = before;

		self
	}

	/// Restricts the listing to decisions changed within `[after, before]`.
	pub fn changed_between(mut self, after: Option<Date>, before: Option<Date>) -> Self {
		self.changed_after = after;
		self.changed_before = before;

		self
	}

	/// Restricts the listing to decisions rendered within `[after, before]`.
	pub fn decided_between(mut self, after: Option<Date>, before: Option<Date>) -> Self {
		self.decision_date_after = after;
		self.decision_date_before = before;

		self
	}

	/// Validates the page size and renders the query parameters.
	pub fn to_params(&self) -> Result<QueryParams, PathError> {
		if !(1..=MAX_RESULT_COUNT).contains(&self.result_count) {
			return Err(PathError::InvalidResultCount {
				count: self.result_count,
				max: MAX_RESULT_COUNT,
			});
		}

		Ok(QueryParams::new()
			.with("offset", Some(self.offset))
			.with("resultCount", Some(self.result_count))
			.with("publishedBefore", self.published_before)
			.with("publishedAfter", self.published_after)
			.with("modifiedBefore", self.modified_before)
			.with("modifiedAfter", self.modified_after)
			.with("changedBefore", self.changed_before)
			.with("changedAfter", self.changed_after)
			.with("decisionDateBefore", self.decision_date_before)
			.with("decisionDateAfter", self.decision_date_after))
	}
}

impl<C> UpstreamClient<C>
where
	C: ?Sized + UpstreamTransport,
{
	/// Lists the courts and tribunals with browsable decisions.
	pub async fn case_databases(&self, language: Language) -> Result<serde_json::Value> {
		let path = ResourcePath::new(ResourceCategory::CaseBrowse, language);

		self.perform_request(&path, &QueryParams::new()).await
	}

	/// Lists decisions of one court or tribunal.
	pub async fn cases(
		&self,
		language: Language,
		database_id: &str,
		query: &CaseListQuery,
	) -> Result<serde_json::Value> {
		let params = query.to_params()?;
		let path = ResourcePath::new(ResourceCategory::CaseBrowse, language).push(database_id)?;

		self.perform_request(&path, &params).await
	}

	/// Fetches the metadata of one decision.
	pub async fn case_metadata(
		&self,
		language: Language,
		database_id: &str,
		case_id: &str,
	) -> Result<serde_json::Value> {
		let path = ResourcePath::new(ResourceCategory::CaseBrowse, language)
			.push(database_id)?
			.push(case_id)?;

		self.perform_request(&path, &QueryParams::new()).await
	}

	/// Lists the citation relationships of one decision.
	pub async fn case_citator(
		&self,
		language: Language,
		database_id: &str,
		case_id: &str,
		kind: CitatorKind,
	) -> Result<serde_json::Value> {
		let path = ResourcePath::new(ResourceCategory::CaseCitator, language)
			.push(database_id)?
			.push(case_id)?
			.push(kind.as_str())?;

		self.perform_request(&path, &QueryParams::new()).await
	}

	/// Lists the statute and regulation collections.
	pub async fn legislation_databases(&self, language: Language) -> Result<serde_json::Value> {
		let path = ResourcePath::new(ResourceCategory::LegislationBrowse, language);

		self.perform_request(&path, &QueryParams::new()).await
	}

	/// Lists the statutes or regulations of one collection.
	pub async fn legislation_items(
		&self,
		language: Language,
		database_id: &str,
	) -> Result<serde_json::Value> {
		let path =
			ResourcePath::new(ResourceCategory::LegislationBrowse, language).push(database_id)?;

		self.perform_request(&path, &QueryParams::new()).await
	}

	/// Fetches the metadata of one statute or regulation.
	pub async fn legislation_metadata(
		&self,
		language: Language,
		database_id: &str,
		legislation_id: &str,
	) -> Result<serde_json::Value> {
		let path = ResourcePath::new(ResourceCategory::LegislationBrowse, language)
			.push(database_id)?
			.push(legislation_id)?;

		self.perform_request(&path, &QueryParams::new()).await
	}
}
