// self
use crate::{_prelude::*, obs::FlowOutcome};

/// Records a flow outcome via the global metrics recorder (when enabled).
///
/// `error` labels failures with [`Error::kind`]; attempts and successes use `none`.
pub fn record_flow_outcome(outcome: FlowOutcome, error: Option<&Error>) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"oauth2_token_flows_request_total",
			"outcome" => outcome.as_str(),
			"error" => error.map_or("none", Error::kind)
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (outcome, error);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::error::TransportError;

	#[test]
	fn record_flow_outcome_noop_without_metrics() {
		let url = Url::parse("https://auth.example.com/oauth2/token")
			.expect("Failed to parse test URL.");
		let err = Error::from(TransportError::Cancelled { url });

		record_flow_outcome(FlowOutcome::Failure, Some(&err));
		record_flow_outcome(FlowOutcome::Success, None);
	}
}
