// self
use crate::obs::{GateOp, GateOutcome};

/// Records an operation outcome via the global metrics recorder (when enabled).
pub fn record_outcome(op: GateOp, outcome: GateOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"canlii_gate_op_total",
			"op" => op.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (op, outcome);
	}
}

/// Publishes the admissions still available in the current epoch (when enabled).
pub fn record_quota_remaining(remaining: u32) {
	#[cfg(feature = "metrics")]
	{
		metrics::gauge!("canlii_gate_quota_remaining").set(f64::from(remaining));
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = remaining;
	}
}
