// self
use crate::{_prelude::*, governor::QuotaEpoch, obs::GateOp};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedOp<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedOp<F> = F;

/// A span builder used by gate operations.
#[derive(Clone, Debug)]
pub struct GateSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl GateSpan {
	/// Creates a new span tagged with the provided operation + stage.
	pub fn new(op: GateOp, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!("canlii_gate.op", op = op.as_str(), stage);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (op, stage);

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedOp<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// Admission state transitions worth logging.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AdmissionEvent {
	/// The token was busy; the caller joined the queue at `depth`.
	Queued {
		/// Queue length after the caller joined.
		depth: usize,
	},
	/// The token holder is waiting out the spacing interval.
	Spacing {
		/// Remaining delay before admission.
		delay: Duration,
	},
	/// A new epoch started and the counter was reset.
	EpochRolled {
		/// Newly tracked epoch.
		epoch: QuotaEpoch,
	},
	/// The caller was admitted.
	Admitted {
		/// Admission number within the epoch.
		sequence: u32,
		/// Epoch the admission counts against.
		epoch: QuotaEpoch,
	},
	/// The daily quota rejected the caller.
	QuotaExceeded {
		/// Configured quota.
		limit: u32,
		/// Exhausted epoch.
		epoch: QuotaEpoch,
	},
	/// The token was handed to the next queued caller.
	HandedOff {
		/// Callers still queued after the hand-off.
		remaining: usize,
	},
	/// The token went back to idle.
	Released,
}

/// Emits a structured event for an admission transition (when tracing is enabled).
pub fn admission_event(event: AdmissionEvent) {
	#[cfg(feature = "tracing")]
	{
		match event {
			AdmissionEvent::Queued { depth } => tracing::debug!(depth, "admission queued"),
			AdmissionEvent::Spacing { delay } =>
				tracing::debug!(delay_ms = delay.as_millis() as u64, "admission spacing"),
			AdmissionEvent::EpochRolled { epoch } =>
				tracing::info!(epoch = %epoch, "quota epoch rolled over"),
			AdmissionEvent::Admitted { sequence, epoch } =>
				tracing::debug!(sequence, epoch = %epoch, "admission granted"),
			AdmissionEvent::QuotaExceeded { limit, epoch } =>
				tracing::warn!(limit, epoch = %epoch, "daily quota exhausted"),
			AdmissionEvent::HandedOff { remaining } =>
				tracing::debug!(remaining, "admission token handed off"),
			AdmissionEvent::Released => tracing::debug!("admission token released"),
		}
	}

	#[cfg(not(feature = "tracing"))]
	{
		let _ = event;
	}
}

/// Warns that the local UTC offset was unavailable and UTC keys the quota epoch instead.
pub fn clock_offset_fallback() {
	#[cfg(feature = "tracing")]
	{
		tracing::warn!("local UTC offset unavailable; quota epochs follow UTC days");
	}
}
