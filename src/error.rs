//! Broker-level error taxonomy covering every terminal path of an attempt.

// self
use crate::_prelude::*;

/// Broker-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Canonical broker error funneled through the attempt's single teardown exit.
///
/// Every variant is terminal for the current channel; none are retried against it. The only
/// follow-up the broker ever issues is the detached re-consent request after a
/// [`Error::Sasl`] failure, which targets the *next* login attempt rather than this one.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Account/service lookup failure at attempt entry.
	#[error(transparent)]
	Resolution(#[from] crate::registry::ResolutionError),
	/// Identity/credential store failure (session creation, identity query, token processing).
	#[error(transparent)]
	Store(#[from] crate::store::StoreError),
	/// SASL mechanism exchange failure reported by the channel.
	#[error(transparent)]
	Sasl(#[from] crate::channel::SaslError),
}
