//! Resource paths of the form `/{category}/{language}/{identifiers...}/`.

// self
use crate::_prelude::*;

const SEGMENT_MAX_LEN: usize = 128;

/// Errors raised while building resource paths or queries.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum PathError {
	/// The category segment is not one the upstream serves.
	#[error("Unknown resource category `{0}`.")]
	UnknownCategory(String),
	/// The language segment is not supported.
	#[error("Unknown language `{0}`.")]
	UnknownLanguage(String),
	/// The logical path did not contain both a category and a language.
	#[error("Resource path `{0}` must start with a category and a language.")]
	Incomplete(String),
	/// An identifier segment was empty.
	#[error("Path identifiers cannot be empty.")]
	EmptySegment,
	/// An identifier segment contains a slash or whitespace.
	#[error("Path identifier `{0}` contains a slash or whitespace.")]
	InvalidSegment(String),
	/// An identifier segment is too long.
	#[error("Path identifier exceeds {max} characters.")]
	SegmentTooLong {
		/// Maximum permitted character count.
		max: usize,
	},
	/// A result count outside the accepted range was requested.
	#[error("Result count {count} must be between 1 and {max}.")]
	InvalidResultCount {
		/// Requested count.
		count: u32,
		/// Largest count the upstream accepts.
		max: u32,
	},
}

/// Top-level resource collection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceCategory {
	/// Court and tribunal decisions.
	#[serde(rename = "caseBrowse")]
	CaseBrowse,
	/// Citation relationships of a decision.
	#[serde(rename = "caseCitator")]
	CaseCitator,
	/// Statutes and regulations.
	#[serde(rename = "legislationBrowse")]
	LegislationBrowse,
}
impl ResourceCategory {
	/// Returns the path segment naming the category.
	pub const fn as_str(self) -> &'static str {
		match self {
			ResourceCategory::CaseBrowse => "caseBrowse",
			ResourceCategory::CaseCitator => "caseCitator",
			ResourceCategory::LegislationBrowse => "legislationBrowse",
		}
	}
}
impl Display for ResourceCategory {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl FromStr for ResourceCategory {
	type Err = PathError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"caseBrowse" => Ok(Self::CaseBrowse),
			"caseCitator" => Ok(Self::CaseCitator),
			"legislationBrowse" => Ok(Self::LegislationBrowse),
			other => Err(PathError::UnknownCategory(other.to_owned())),
		}
	}
}

/// Language of the returned metadata.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
	/// English.
	#[default]
	En,
	/// French.
	Fr,
}
impl Language {
	/// Returns the path segment naming the language.
	pub const fn as_str(self) -> &'static str {
		match self {
			Language::En => "en",
			Language::Fr => "fr",
		}
	}
}
impl Display for Language {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl FromStr for Language {
	type Err = PathError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"en" => Ok(Self::En),
			"fr" => Ok(Self::Fr),
			other => Err(PathError::UnknownLanguage(other.to_owned())),
		}
	}
}

/// Logical path of one upstream resource.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ResourcePath {
	category: ResourceCategory,
	language: Language,
	identifiers: Vec<String>,
}
impl ResourcePath {
	/// Starts a path at the category/language root.
	pub fn new(category: ResourceCategory, language: Language) -> Self {
		Self { category, language, identifiers: Vec::new() }
	}

	/// Appends a validated identifier segment.
	pub fn push(mut self, identifier: impl AsRef<str>) -> Result<Self, PathError> {
		let view = identifier.as_ref();

		validate_segment(view)?;

		self.identifiers.push(view.to_owned());

		Ok(self)
	}

	/// Resource category.
	pub fn category(&self) -> ResourceCategory {
		self.category
	}

	/// Resource language.
	pub fn language(&self) -> Language {
		self.language
	}

	/// Identifier segments after the language.
	pub fn identifiers(&self) -> &[String] {
		&self.identifiers
	}

	/// Every path segment in order, without separators.
	pub fn segments(&self) -> impl Iterator<Item = &str> {
		[self.category.as_str(), self.language.as_str()]
			.into_iter()
			.chain(self.identifiers.iter().map(String::as_str))
	}
}
impl Display for ResourcePath {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		for segment in self.segments() {
			write!(f, "/{segment}")?;
		}

		f.write_str("/")
	}
}
impl FromStr for ResourcePath {
	type Err = PathError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let mut segments = s.trim_matches('/').split('/');
		let (Some(category), Some(language)) = (segments.next(), segments.next()) else {
			return Err(PathError::Incomplete(s.to_owned()));
		};
		let path = Self::new(category.parse()?, language.parse()?);

		segments.try_fold(path, |path, segment| path.push(segment))
	}
}

fn validate_segment(view: &str) -> Result<(), PathError> {
	if view.is_empty() {
		return Err(PathError::EmptySegment);
	}
	if view.contains('/') || view.chars().any(char::is_whitespace) {
		return Err(PathError::InvalidSegment(view.to_owned()));
	}
	if view.len() > SEGMENT_MAX_LEN {
		return Err(PathError::SegmentTooLong { max: SEGMENT_MAX_LEN });
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn path_renders_with_trailing_slash() {
		let path = ResourcePath::new(ResourceCategory::CaseBrowse, Language::Fr)
			.push("qccs")
			.and_then(|path| path.push("2008qccs1"))
			.expect("Identifiers should be valid.");

		assert_eq!(path.to_string(), "/caseBrowse/fr/qccs/2008qccs1/");
		assert_eq!(
			ResourcePath::new(ResourceCategory::LegislationBrowse, Language::En).to_string(),
			"/legislationBrowse/en/"
		);
	}

	#[test]
	fn logical_paths_parse() {
		let path: ResourcePath =
			"/caseCitator/en/onca/2008onca656/citedCases/".parse().expect("Path should parse.");

		assert_eq!(path.category(), ResourceCategory::CaseCitator);
		assert_eq!(path.language(), Language::En);
		assert_eq!(path.identifiers(), ["onca", "2008onca656", "citedCases"]);
		assert_eq!(
			"caseBrowse/en".parse::<ResourcePath>().map(|p| p.to_string()),
			Ok("/caseBrowse/en/".into())
		);
	}

	#[test]
	fn invalid_paths_are_rejected() {
		assert_eq!(
			"/caseBrowse/".parse::<ResourcePath>(),
			Err(PathError::Incomplete("/caseBrowse/".into()))
		);
		assert_eq!(
			"/search/en/".parse::<ResourcePath>(),
			Err(PathError::UnknownCategory("search".into()))
		);
		assert_eq!(
			"/caseBrowse/de/".parse::<ResourcePath>(),
			Err(PathError::UnknownLanguage("de".into()))
		);
		assert_eq!("/caseBrowse/en//x/".parse::<ResourcePath>(), Err(PathError::EmptySegment));

		let root = ResourcePath::new(ResourceCategory::CaseBrowse, Language::En);

		assert_eq!(root.clone().push("a b"), Err(PathError::InvalidSegment("a b".into())));
		assert_eq!(
			root.push("x".repeat(SEGMENT_MAX_LEN + 1)),
			Err(PathError::SegmentTooLong { max: SEGMENT_MAX_LEN })
		);
	}
}
