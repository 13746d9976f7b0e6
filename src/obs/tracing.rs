// self
use crate::_prelude::*;

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedFlow<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedFlow<F> = F;

/// A span builder used by token flows.
#[derive(Clone, Debug)]
pub struct FlowSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl FlowSpan {
	/// Creates a new span tagged with the call-site stage and target endpoint.
	pub fn new(stage: &'static str, endpoint: &Url) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span =
				tracing::info_span!("oauth2_token_flows.flow", stage, endpoint = endpoint.as_str());

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (stage, endpoint);

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedFlow<Fut>
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

/// Records the result of loading the platform trust store.
pub fn record_trust_store_load(loaded: usize, failed: usize) {
	#[cfg(feature = "tracing")]
	{
		if failed > 0 {
			tracing::warn!(loaded, failed, "Some platform root certificates could not be loaded.");
		} else {
			tracing::debug!(loaded, "Loaded platform root certificates.");
		}
	}

	#[cfg(not(feature = "tracing"))]
	{
		let _ = (loaded, failed);
	}
}

/// Records a failed token request on the current span.
pub fn record_flow_failure(err: &Error) {
	#[cfg(feature = "tracing")]
	{
		tracing::debug!(kind = err.kind(), error = %err, "Token request failed.");
	}

	#[cfg(not(feature = "tracing"))]
	{
		let _ = err;
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[tokio::test]
	async fn instrument_wraps_future() {
		let endpoint = Url::parse("https://auth.example.com/oauth2/token")
			.expect("Failed to parse test endpoint.");
		let span = FlowSpan::new("instrument_wraps_future", &endpoint);
		let value = span.instrument(async { 42 }).await;

		assert_eq!(value, 42);
	}

	#[test]
	fn trust_store_events_are_noops_without_subscribers() {
		record_trust_store_load(3, 1);
		record_trust_store_load(3, 0);
	}
}
