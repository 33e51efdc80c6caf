//! Time sources consulted by the admission governor.
//!
//! A [`Clock`] answers two questions: the monotonic instant used to space admissions, and
//! the calendar day that keys the quota epoch. Instants come from the tokio clock so a
//! paused runtime (`tokio::time::pause`) drives spacing deterministically in tests.

// self
use crate::{_prelude::*, governor::QuotaEpoch};

/// Source of monotonic instants and quota epochs.
pub trait Clock
where
	Self: Send + Sync,
{
	/// Current monotonic instant.
	fn now(&self) -> Instant;

	/// Quota epoch (calendar day) the current moment falls in.
	fn epoch(&self) -> QuotaEpoch;
}

/// Wall-clock source keyed by the local calendar day.
///
/// The local UTC offset is captured once at construction. Reading it later from a
/// multi-threaded process is refused by `time` on most Unix targets, so construct the
/// clock early (before the async runtime spawns workers) when the local day matters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SystemClock {
	offset: UtcOffset,
}
impl SystemClock {
	/// Captures the current local offset, falling back to UTC when it cannot be determined.
	pub fn new() -> Self {
		let offset = UtcOffset::current_local_offset().unwrap_or_else(|_| {
			crate::obs::clock_offset_fallback();

			UtcOffset::UTC
		});

		Self { offset }
	}

	/// Uses a fixed offset for epoch calculation.
	pub fn with_offset(offset: UtcOffset) -> Self {
		Self { offset }
	}

	/// Offset used to derive the calendar day.
	pub fn offset(&self) -> UtcOffset {
		self.offset
	}
}
impl Default for SystemClock {
	fn default() -> Self {
		Self::new()
	}
}
impl Clock for SystemClock {
	fn now(&self) -> Instant {
		Instant::now()
	}

	fn epoch(&self) -> QuotaEpoch {
		QuotaEpoch::new(OffsetDateTime::now_utc().to_offset(self.offset).date())
	}
}

/// Hand-driven clock: the day is set explicitly and instants follow the tokio clock.
#[derive(Clone, Debug)]
pub struct ManualClock {
	date: Arc<Mutex<Date>>,
}
impl ManualClock {
	/// Starts the clock on `date`.
	pub fn new(date: Date) -> Self {
		Self { date: Arc::new(Mutex::new(date)) }
	}

	/// Moves the clock to `date`.
	pub fn set_date(&self, date: Date) {
		*self.date.lock() = date;
	}

	/// Advances the calendar by one day, saturating at the last representable date.
	pub fn advance_day(&self) {
		let mut date = self.date.lock();

		if let Some(next) = date.next_day() {
			*date = next;
		}
	}

	/// Current calendar day.
	pub fn date(&self) -> Date {
		*self.date.lock()
	}
}
impl Clock for ManualClock {
	fn now(&self) -> Instant {
		Instant::now()
	}

	fn epoch(&self) -> QuotaEpoch {
		QuotaEpoch::new(self.date())
	}
}
