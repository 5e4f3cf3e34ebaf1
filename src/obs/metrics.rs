// self
use crate::{
	mechanism::Mechanism,
	obs::{AttemptOutcome, AttemptStage},
};

/// Records an attempt outcome via the global metrics recorder (when enabled).
pub fn record_attempt_outcome(mechanism: Mechanism, outcome: AttemptOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"sasl_broker_attempt_total",
			"mechanism" => mechanism.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (mechanism, outcome);
	}
}

/// Records a stage failure via the global metrics recorder (when enabled).
pub fn record_stage_failure(mechanism: Mechanism, stage: AttemptStage) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"sasl_broker_stage_failure_total",
			"mechanism" => mechanism.as_str(),
			"stage" => stage.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (mechanism, stage);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn recorders_are_noops_without_metrics() {
		record_attempt_outcome(Mechanism::Facebook, AttemptOutcome::Failure);
		record_stage_failure(Mechanism::Facebook, AttemptStage::ProcessToken);
	}
}
