//! Outbound admission governor protecting the upstream API's published usage limits.
//!
//! Every outbound call passes through [`Governor::acquire`], which enforces three limits
//! at once: a single call in flight, a minimum spacing between consecutive admissions, and
//! a daily admission quota keyed by calendar epoch. Callers that find the token busy join
//! a FIFO queue of grant handles and are woken exactly once, in arrival order, as permits
//! are released.
//!
//! The daily quota is checked twice: once on entry (a fast-fail gate ahead of queueing) and
//! again when the token is actually granted, right before the counter moves. Callers that
//! queued while the quota was nearly exhausted therefore fail at grant time instead of
//! pushing the counter past the cap.

mod permit;
mod quota;

pub use permit::*;
pub use quota::*;

// crates.io
use tokio::sync::oneshot;
// self
use crate::{
	_prelude::*,
	clock::{Clock, SystemClock},
	obs::{self, AdmissionEvent, GateOp, GateOutcome, GateSpan},
};

/// Minimum interval between two admissions (two admissions per second).
pub const DEFAULT_SPACING: Duration = Duration::from_millis(500);
/// Admissions allowed per quota epoch.
pub const DEFAULT_DAILY_QUOTA: u32 = 5_000;

/// Limits enforced by a [`Governor`].
///
/// The concurrency limit is fixed at one in-flight call and is not configurable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernorConfig {
	/// Minimum interval between the starts of two admitted calls.
	pub spacing: Duration,
	/// Admissions allowed per epoch.
	pub daily_quota: u32,
}
impl GovernorConfig {
	/// Overrides the spacing interval.
	pub fn with_spacing(mut self, spacing: Duration) -> Self {
		self.spacing = spacing;

		self
	}

	/// Overrides the daily quota.
	pub fn with_daily_quota(mut self, daily_quota: u32) -> Self {
		self.daily_quota = daily_quota;

		self
	}
}
impl Default for GovernorConfig {
	fn default() -> Self {
		Self { spacing: DEFAULT_SPACING, daily_quota: DEFAULT_DAILY_QUOTA }
	}
}

/// Point-in-time view of the governor's state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GovernorSnapshot {
	/// Epoch the figures refer to.
	pub epoch: QuotaEpoch,
	/// Admissions granted in the epoch.
	pub admitted: u32,
	/// Admissions still available in the epoch.
	pub remaining: u32,
	/// Whether the concurrency token is held.
	pub in_flight: bool,
	/// Callers waiting for the token.
	pub queued: usize,
	/// Instant of the most recent admission.
	pub last_admitted_at: Option<Instant>,
}

#[derive(Debug)]
struct GovernorState {
	held: bool,
	last_admitted_at: Option<Instant>,
	quota: QuotaCounter,
	waiters: VecDeque<oneshot::Sender<()>>,
}

/// Serializes, spaces, and caps outbound calls.
///
/// Share one instance per process (typically behind `Arc<Governor>`); the limits only
/// hold across callers that go through the same governor.
pub struct Governor {
	config: GovernorConfig,
	clock: Arc<dyn Clock>,
	state: Mutex<GovernorState>,
}
impl Governor {
	/// Creates a governor driven by the system clock.
	pub fn new(config: GovernorConfig) -> Self {
		Self::with_clock(config, Arc::new(SystemClock::new()))
	}

	/// Creates a governor driven by the provided clock.
	pub fn with_clock(config: GovernorConfig, clock: Arc<dyn Clock>) -> Self {
		let quota = QuotaCounter::new(clock.epoch());

		Self {
			config,
			clock,
			state: Mutex::new(GovernorState {
				held: false,
				last_admitted_at: None,
				quota,
				waiters: VecDeque::new(),
			}),
		}
	}

	/// Limits enforced by this governor.
	pub fn config(&self) -> GovernorConfig {
		self.config
	}

	/// Reads the current state atomically.
	///
	/// A pending epoch rollover is reflected in the figures without being applied.
	pub fn snapshot(&self) -> GovernorSnapshot {
		let state = self.state.lock();
		let mut quota = state.quota;

		quota.roll(self.clock.epoch());

		GovernorSnapshot {
			epoch: quota.epoch(),
			admitted: quota.count(),
			remaining: quota.remaining(self.config.daily_quota),
			in_flight: state.held,
			queued: state.waiters.iter().filter(|waiter| !waiter.is_closed()).count(),
			last_admitted_at: state.last_admitted_at,
		}
	}

	/// Waits for permission to perform one upstream call.
	///
	/// Fails immediately with [`Error::QuotaExceeded`] when the epoch's quota is spent.
	/// Otherwise waits, without timeout, for the concurrency token and the spacing
	/// interval. The returned permit must be kept alive for the duration of the call.
	pub async fn acquire(&self) -> Result<AdmissionPermit<'_>> {
		const OP: GateOp = GateOp::Admission;

		obs::record_outcome(OP, GateOutcome::Attempt);

		let result = GateSpan::new(OP, "acquire").instrument(self.acquire_inner()).await;

		match &result {
			Ok(_) => obs::record_outcome(OP, GateOutcome::Success),
			Err(_) => obs::record_outcome(OP, GateOutcome::Failure),
		}

		result
	}

	async fn acquire_inner(&self) -> Result<AdmissionPermit<'_>> {
		let slot = loop {
			let pending = {
				let mut state = self.state.lock();

				self.check_quota(&mut state)?;

				if !state.held {
					state.held = true;

					break SlotGuard::new(self);
				}

				let (grant, wait) = oneshot::channel();

				state.waiters.push_back(grant);
				obs::admission_event(AdmissionEvent::Queued { depth: state.waiters.len() });

				PendingGrant::new(self, wait)
			};

			if let Some(slot) = pending.wait().await {
				break slot;
			}
		};

		self.admit(slot).await
	}

	/// Waits out the spacing interval while holding the token, then records the admission.
	async fn admit<'a>(&'a self, slot: SlotGuard<'a>) -> Result<AdmissionPermit<'a>> {
		let delay = {
			let state = self.state.lock();

			self.spacing_delay(&state, self.clock.now())
		};

		if !delay.is_zero() {
			obs::admission_event(AdmissionEvent::Spacing { delay });

			tokio::time::sleep(delay).await;
		}

		let admission = {
			let mut state = self.state.lock();

			self.check_quota(&mut state)?;

			let admitted_at = self.clock.now();
			let sequence = state.quota.record();
			let epoch = state.quota.epoch();

			state.last_admitted_at = Some(admitted_at);

			obs::admission_event(AdmissionEvent::Admitted { sequence, epoch });
			obs::record_quota_remaining(state.quota.remaining(self.config.daily_quota));

			Admission { sequence, epoch, admitted_at }
		};

		Ok(AdmissionPermit::new(slot, admission))
	}

	fn check_quota(&self, state: &mut GovernorState) -> Result<()> {
		if state.quota.roll(self.clock.epoch()) {
			obs::admission_event(AdmissionEvent::EpochRolled { epoch: state.quota.epoch() });
		}

		let limit = self.config.daily_quota;

		if state.quota.is_exhausted(limit) {
			let epoch = state.quota.epoch();

			obs::admission_event(AdmissionEvent::QuotaExceeded { limit, epoch });

			return Err(Error::QuotaExceeded { limit, epoch });
		}

		Ok(())
	}

	fn spacing_delay(&self, state: &GovernorState, now: Instant) -> Duration {
		state
			.last_admitted_at
			.map(|at| self.config.spacing.saturating_sub(now.saturating_duration_since(at)))
			.unwrap_or(Duration::ZERO)
	}

	/// Returns the token, handing it straight to the oldest live waiter if there is one.
	pub(crate) fn release_slot(&self) {
		let mut state = self.state.lock();

		assert!(state.held, "Admission token released while not held.");

		while let Some(waiter) = state.waiters.pop_front() {
			// Closed receivers belong to callers that stopped waiting.
			if waiter.send(()).is_ok() {
				obs::admission_event(AdmissionEvent::HandedOff { remaining: state.waiters.len() });

				return;
			}
		}

		state.held = false;

		obs::admission_event(AdmissionEvent::Released);
	}
}
impl Default for Governor {
	fn default() -> Self {
		Self::new(GovernorConfig::default())
	}
}
impl Debug for Governor {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Governor")
			.field("config", &self.config)
			.field("snapshot", &self.snapshot())
			.finish()
	}
}
