//! Broker facade: the `supports` gate and the fire-and-forget `start` entry.

mod attempt;

// self
use crate::{
	_prelude::*,
	channel::SaslChannel,
	mechanism::Mechanism,
	registry::{AccountRegistry, ChatAccount},
	store::CredentialStore,
};

/// Coordinates SASL authentication attempts against a single credential provider.
///
/// The broker owns the registry and store handles so the orchestration chain can focus on one
/// attempt at a time. Construct it once at startup and share it; attempts for distinct
/// channels run concurrently as independent futures, and a per-channel in-flight guard rejects
/// a second `start` while an attempt is still running.
#[derive(Clone)]
pub struct Broker {
	/// Account/service registry consulted at attempt entry.
	pub registry: Arc<dyn AccountRegistry>,
	/// Identity/credential store issuing sessions and tokens.
	pub store: Arc<dyn CredentialStore>,
	/// Credential-storage provider this broker serves.
	pub provider: String,
	in_flight: Arc<Mutex<HashSet<String>>>,
}
impl Broker {
	/// Creates a broker for the provided registry, store, and provider string.
	pub fn new(
		registry: Arc<dyn AccountRegistry>,
		store: Arc<dyn CredentialStore>,
		provider: impl Into<String>,
	) -> Self {
		Self { registry, store, provider: provider.into(), in_flight: Default::default() }
	}

	/// Returns whether this broker can authenticate the channel/account pair.
	///
	/// Fails closed: the account must declare this broker's storage provider and the channel
	/// must advertise one of the supported mechanisms. No side effects. Callers must check
	/// this before [`Broker::start`]; `start` re-derives the mechanism but does not re-validate
	/// the provider.
	pub fn supports(&self, channel: &dyn SaslChannel, account: &ChatAccount) -> bool {
		if account.storage_provider != self.provider {
			return false;
		}

		Mechanism::select(channel.advertised_mechanisms()).is_supported()
	}

	/// Marks the channel as in flight, or returns `None` when an attempt is already running.
	pub(crate) fn begin_attempt(&self, channel_id: &str) -> Option<InFlightGuard> {
		let mut in_flight = self.in_flight.lock();

		if !in_flight.insert(channel_id.to_owned()) {
			return None;
		}

		Some(InFlightGuard { set: self.in_flight.clone(), key: channel_id.to_owned() })
	}
}
impl Debug for Broker {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Broker")
			.field("provider", &self.provider)
			.field("in_flight", &self.in_flight.lock().len())
			.finish()
	}
}

/// Removes the channel from the in-flight set once the attempt future completes.
pub(crate) struct InFlightGuard {
	set: Arc<Mutex<HashSet<String>>>,
	key: String,
}
impl Drop for InFlightGuard {
	fn drop(&mut self) {
		self.set.lock().remove(&self.key);
	}
}
