//! Observability labels and span helpers for authentication attempts.
//!
//! Every attempt runs inside a `sasl_broker.attempt` span tagged with the channel identity and
//! the selected mechanism. Enable the `metrics` feature to additionally increment the
//! `sasl_broker_attempt_total` counter for every attempt/success/failure/retry, labeled by
//! mechanism + outcome.

mod metrics;

pub use metrics::*;

// self
use crate::{_prelude::*, mechanism::Mechanism};

/// Stages of one authentication attempt, in driving order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AttemptStage {
	/// Resolving the account and its messaging service in the registry.
	ResolveService,
	/// Creating the token session with the credential store.
	CreateSession,
	/// Querying the identity store for the username.
	QueryIdentity,
	/// Processing the token session for an access token.
	ProcessToken,
	/// Running the mechanism-specific SASL exchange.
	Exchange,
}
impl AttemptStage {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::ResolveService => "resolve_service",
			Self::CreateSession => "create_session",
			Self::QueryIdentity => "query_identity",
			Self::ProcessToken => "process_token",
			Self::Exchange => "exchange",
		}
	}
}
impl Display for AttemptStage {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded per attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AttemptOutcome {
	/// Entry into the orchestrator.
	Attempt,
	/// Exchange completed successfully.
	Success,
	/// Attempt terminated on an error path.
	Failure,
	/// Detached re-consent request issued after an exchange failure.
	Retry,
}
impl AttemptOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Attempt => "attempt",
			Self::Success => "success",
			Self::Failure => "failure",
			Self::Retry => "retry",
		}
	}
}
impl Display for AttemptOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Span builder wrapping each attempt's future.
#[derive(Clone, Debug)]
pub struct AttemptSpan {
	span: tracing::Span,
}
impl AttemptSpan {
	/// Creates a new span tagged with the channel identity and the selected mechanism.
	pub fn new(channel: &str, mechanism: Mechanism) -> Self {
		let span =
			tracing::info_span!("sasl_broker.attempt", channel, mechanism = mechanism.as_str());

		Self { span }
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> tracing::instrument::Instrumented<Fut>
	where
		Fut: Future,
	{
		use tracing::Instrument;

		fut.instrument(self.span.clone())
	}
}
