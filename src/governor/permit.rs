//! Admission permits and the guards that return the concurrency token.

// crates.io
use tokio::sync::oneshot;
// self
use crate::{
	_prelude::*,
	governor::{Governor, QuotaEpoch},
};

/// Record of one admission.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Admission {
	/// Admission number within the epoch, starting at 1.
	pub sequence: u32,
	/// Epoch the admission was counted against.
	pub epoch: QuotaEpoch,
	/// Instant the admission was granted.
	pub admitted_at: Instant,
}

/// Exclusive right to perform one upstream call.
///
/// The concurrency token returns to the governor when the permit is released or dropped,
/// on every exit path. Queued callers receive it in FIFO order.
#[must_use = "dropping the permit releases the admission immediately"]
pub struct AdmissionPermit<'a> {
	slot: SlotGuard<'a>,
	admission: Admission,
}
impl<'a> AdmissionPermit<'a> {
	pub(crate) fn new(slot: SlotGuard<'a>, admission: Admission) -> Self {
		Self { slot, admission }
	}

	/// Details of the admission this permit represents.
	pub fn admission(&self) -> Admission {
		self.admission
	}

	/// Admission number within the epoch.
	pub fn sequence(&self) -> u32 {
		self.admission.sequence
	}

	/// Returns the token to the governor.
	pub fn release(self) {
		drop(self.slot);
	}
}
impl Debug for AdmissionPermit<'_> {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AdmissionPermit").field("admission", &self.admission).finish()
	}
}

/// Holds the concurrency token; releases it on drop.
pub(crate) struct SlotGuard<'a> {
	governor: &'a Governor,
}
impl<'a> SlotGuard<'a> {
	pub(crate) fn new(governor: &'a Governor) -> Self {
		Self { governor }
	}
}
impl Drop for SlotGuard<'_> {
	fn drop(&mut self) {
		self.governor.release_slot();
	}
}

/// Queued caller waiting for the token to be handed over.
pub(crate) struct PendingGrant<'a> {
	governor: &'a Governor,
	grant: oneshot::Receiver<()>,
}
impl<'a> PendingGrant<'a> {
	pub(crate) fn new(governor: &'a Governor, grant: oneshot::Receiver<()>) -> Self {
		Self { governor, grant }
	}

	/// Suspends until the token is handed over.
	///
	/// Returns `None` if the grant handle vanished without a hand-off; the caller does not
	/// hold the token in that case.
	pub(crate) async fn wait(mut self) -> Option<SlotGuard<'a>> {
		match (&mut self.grant).await {
			Ok(()) => Some(SlotGuard::new(self.governor)),
			Err(_) => None,
		}
	}
}
impl Drop for PendingGrant<'_> {
	fn drop(&mut self) {
		// A hand-off may land between cancellation and drop; give the token back.
		self.grant.close();

		if self.grant.try_recv().is_ok() {
			self.governor.release_slot();
		}
	}
}
