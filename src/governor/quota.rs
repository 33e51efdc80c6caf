//! Daily quota accounting keyed by calendar epochs.

// self
use crate::_prelude::*;

/// Quota accounting window, keyed by calendar day.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct QuotaEpoch(Date);
impl QuotaEpoch {
	/// Wraps the calendar day that identifies the epoch.
	pub const fn new(date: Date) -> Self {
		Self(date)
	}

	/// Calendar day backing the epoch.
	pub const fn date(self) -> Date {
		self.0
	}
}
impl From<Date> for QuotaEpoch {
	fn from(value: Date) -> Self {
		Self(value)
	}
}
impl Debug for QuotaEpoch {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "QuotaEpoch({})", self.0)
	}
}
impl Display for QuotaEpoch {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		Display::fmt(&self.0, f)
	}
}

/// Admissions counted within the current epoch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaCounter {
	count: u32,
	epoch: QuotaEpoch,
}
impl QuotaCounter {
	/// Starts an empty counter for `epoch`.
	pub const fn new(epoch: QuotaEpoch) -> Self {
		Self { count: 0, epoch }
	}

	/// Admissions recorded in the current epoch.
	pub const fn count(&self) -> u32 {
		self.count
	}

	/// Epoch the counter currently tracks.
	pub const fn epoch(&self) -> QuotaEpoch {
		self.epoch
	}

	/// Resets the counter when `epoch` differs from the tracked one.
	///
	/// Returns `true` when a rollover happened.
	pub fn roll(&mut self, epoch: QuotaEpoch) -> bool {
		if self.epoch == epoch {
			return false;
		}

		self.epoch = epoch;
		self.count = 0;

		true
	}

	/// Whether `limit` admissions have already been recorded.
	pub const fn is_exhausted(&self, limit: u32) -> bool {
		self.count >= limit
	}

	/// Admissions still available under `limit`.
	pub const fn remaining(&self, limit: u32) -> u32 {
		limit.saturating_sub(self.count)
	}

	/// Records one admission and returns its sequence number within the epoch.
	pub fn record(&mut self) -> u32 {
		self.count = self.count.saturating_add(1);

		self.count
	}
}
