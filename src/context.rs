//! Per-call request context carrying cancellation and deadline signals.
//!
//! Dropping a token flow future already aborts the in-flight request. [`RequestContext`] adds
//! the explicit form: a [`CancellationToken`] shared with other tasks and an optional deadline.
//! Whichever fires first ends the call with a context-derived transport error.

// crates.io
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
// self
use crate::_prelude::*;

/// Reason a guarded future was abandoned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Interruption {
	/// The cancellation token fired.
	Cancelled,
	/// The deadline elapsed.
	DeadlineExceeded,
}

/// Cancellation and deadline signals for a single token request.
#[derive(Clone, Debug, Default)]
pub struct RequestContext {
	/// Token observed while the request is in flight.
	pub cancellation: Option<CancellationToken>,
	/// Instant after which the request is abandoned.
	pub deadline: Option<Instant>,
}
impl RequestContext {
	/// Context that never cancels and has no deadline.
	pub fn background() -> Self {
		Self::default()
	}

	/// Attaches a cancellation token.
	pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
		self.cancellation = Some(token);

		self
	}

	/// Sets an absolute deadline.
	///
	/// # Panics
	///
	/// A context with a deadline must be awaited inside a Tokio runtime with the time driver
	/// enabled; [`RequestContext::guard`] panics otherwise.
	pub fn with_deadline(mut self, deadline: Instant) -> Self {
		self.deadline = Some(deadline);

		self
	}

	/// Sets a deadline relative to now.
	///
	/// # Panics
	///
	/// The returned context must be awaited inside a Tokio runtime with the time driver
	/// enabled; [`RequestContext::guard`] panics otherwise.
	pub fn with_timeout(self, timeout: Duration) -> Self {
		self.with_deadline(Instant::now() + timeout)
	}

	/// Returns `true` when the attached token has been cancelled.
	pub fn is_cancelled(&self) -> bool {
		self.cancellation.as_ref().is_some_and(CancellationToken::is_cancelled)
	}

	/// Drives `fut` to completion unless the context is cancelled or expires first.
	///
	/// Signals are polled before `fut`, so an already cancelled context never starts the work.
	///
	/// # Panics
	///
	/// Panics when a deadline is set and the call is not polled inside a Tokio runtime with the
	/// time driver enabled.
	pub async fn guard<F>(&self, fut: F) -> Result<F::Output, Interruption>
	where
		F: Future,
	{
		let cancelled = async {
			match &self.cancellation {
				Some(token) => token.cancelled().await,
				None => std::future::pending().await,
			}
		};
		let expired = async {
			match self.deadline {
				Some(deadline) => tokio::time::sleep_until(deadline).await,
				None => std::future::pending().await,
			}
		};

		tokio::select! {
			biased;
			_ = cancelled => Err(Interruption::Cancelled),
			_ = expired => Err(Interruption::DeadlineExceeded),
			output = fut => Ok(output),
		}
	}
}
