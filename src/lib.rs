//! Admission-governed client for the CanLII legal-information API: every outbound lookup is
//! serialized, spaced, and capped by a daily quota before it touches the network.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod clock;
pub mod config;
pub mod error;
pub mod governor;
pub mod http;
pub mod lookup;
pub mod obs;
pub mod upstream;

mod _prelude {
	pub use std::{
		collections::{BTreeMap, VecDeque},
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
		time::Duration,
	};

	pub use parking_lot::Mutex;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Date, OffsetDateTime, UtcOffset};
	pub use tokio::time::Instant;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use serde_json;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
