//! Account/service registry contracts consumed at attempt entry.
//!
//! The registry is a process-wide, read-only lookup initialized once at startup and shared by
//! every in-flight attempt. Lookups are synchronous; only the credential store and the channel
//! involve suspension points.

// self
use crate::{_prelude::*, auth::AuthData};

/// Storage identifier addressing an account inside the registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StorageId(pub u32);
impl Display for StorageId {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "{}", self.0)
	}
}

/// Kinds of account services the registry can enumerate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServiceKind {
	/// Instant-messaging services, the only kind the broker authenticates.
	Messaging,
}
impl ServiceKind {
	/// Returns the registry-side service-type tag.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Messaging => "IM",
		}
	}
}
impl Display for ServiceKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Messaging-side account descriptor handed to `supports`/`start`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatAccount {
	/// Credential-storage provider declared by the account.
	pub storage_provider: String,
	/// Storage identifier of the account inside the registry.
	pub storage_id: StorageId,
	/// Display path used in logs.
	pub path: String,
}
impl ChatAccount {
	/// Assembles an account descriptor.
	pub fn new(
		storage_provider: impl Into<String>,
		storage_id: StorageId,
		path: impl Into<String>,
	) -> Self {
		Self { storage_provider: storage_provider.into(), storage_id, path: path.into() }
	}
}

/// Registry lookup contract; immutable for the broker's lifetime.
pub trait AccountRegistry: Send + Sync {
	/// Resolves an account by storage identifier.
	fn resolve_account(&self, id: StorageId) -> Option<Box<dyn AccountHandle>>;
}

/// Resolved registry account.
pub trait AccountHandle {
	/// Lists the account's services of the given kind, in registry order.
	fn services(&self, kind: ServiceKind) -> Vec<Box<dyn ServiceHandle>>;
}

/// One service attached to a registry account.
pub trait ServiceHandle {
	/// Returns the service's auth descriptor.
	fn auth_data(&self) -> AuthData;
}

/// Lookup failures at attempt entry; always terminal, never retried.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum ResolutionError {
	/// No account is registered under the storage identifier.
	#[error("No account is registered under storage identifier {id}.")]
	AccountNotFound {
		/// Storage identifier that failed to resolve.
		id: StorageId,
	},
	/// The account exists but carries no service of the requested kind.
	#[error("Account {id} has no {kind} service.")]
	NoService {
		/// Storage identifier of the account.
		id: StorageId,
		/// Service kind that produced an empty list.
		kind: ServiceKind,
	},
}
