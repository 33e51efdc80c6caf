//! Optional observability helpers for gate operations.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `canlii_gate.op` with the `op` and `stage`
//!   fields, plus debug events for every admission state transition.
//! - Enable `metrics` to increment the `canlii_gate_op_total` counter for every
//!   attempt/success/failure, labeled by `op` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Gate operations observed by the crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GateOp {
	/// Admission through the governor.
	Admission,
	/// Full upstream request (admission + network call).
	Request,
}
impl GateOp {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			GateOp::Admission => "admission",
			GateOp::Request => "request",
		}
	}
}
impl Display for GateOp {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GateOutcome {
	/// Entry to a gate operation.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl GateOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			GateOutcome::Attempt => "attempt",
			GateOutcome::Success => "success",
			GateOutcome::Failure => "failure",
		}
	}
}
impl Display for GateOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
