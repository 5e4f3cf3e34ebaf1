//! Identity/credential store contracts (the single-sign-on seam).
//!
//! The store holds the long-lived account secrets and knows how to refresh short-lived access
//! tokens; the broker only ever talks to it through the trait objects below. Every
//! asynchronous operation returns a boxed `Send` future so implementations stay free to use
//! whatever executor or IPC machinery backs the real daemon.

// self
use crate::{
	_prelude::*,
	auth::{AuthMethod, AuthParams, CredentialsId},
};

/// Key under which a processing round returns the delegated access token.
pub const ACCESS_TOKEN_KEY: &str = "AccessToken";

/// Boxed future returned by asynchronous store operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Identity/credential store contract; immutable for the broker's lifetime.
pub trait CredentialStore: Send + Sync {
	/// Builds an identity handle for the given credential identifier.
	fn identity(&self, id: CredentialsId) -> Box<dyn Identity>;

	/// Creates a token-issuing session for the credential + method pair.
	fn create_session(
		&self,
		id: CredentialsId,
		method: &AuthMethod,
	) -> Result<Box<dyn AuthSession>, StoreError>;
}

/// Handle onto one stored identity.
pub trait Identity: Send + Sync {
	/// Queries the store for the identity's descriptive info.
	fn query_info(&self) -> StoreFuture<'_, IdentityInfo>;
}

/// Token-issuing session opened for one authentication attempt.
pub trait AuthSession: Send + Sync {
	/// Processes the session with the given parameters and store mechanism, resolving to the
	/// issued session data.
	fn process<'a>(&'a self, params: &'a AuthParams, mechanism: &'a str)
	-> StoreFuture<'a, SessionData>;

	/// Issues a processing request whose completion is deliberately not observed.
	///
	/// Used by the re-consent path: the request primes the store for the next login attempt,
	/// and the broker tears the current attempt down without waiting. Implementations decide
	/// how the detached request actually runs.
	fn process_detached(&self, params: &AuthParams, mechanism: &str);
}

/// Identity info returned by [`Identity::query_info`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityInfo {
	/// Username recorded for the identity.
	pub username: String,
}
impl IdentityInfo {
	/// Builds the info payload for the given username.
	pub fn new(username: impl Into<String>) -> Self {
		Self { username: username.into() }
	}
}

/// Session data returned by a successful token-processing round.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionData(AuthParams);
impl SessionData {
	/// Creates an empty payload.
	pub fn new() -> Self {
		Self::default()
	}

	/// Builder-style entry insertion.
	pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
		self.0.insert(key, value);

		self
	}

	/// Returns the `AccessToken` entry, when present.
	pub fn access_token(&self) -> Option<&str> {
		self.0.string(ACCESS_TOKEN_KEY)
	}

	/// Returns the raw entries of the payload.
	pub fn params(&self) -> &AuthParams {
		&self.0
	}
}

/// Failures raised by the identity/credential store; all terminal, none retried.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// The store rejected session creation for the credential + method pair.
	#[error("Could not create an auth session for credentials {id}: {message}.")]
	SessionCreation {
		/// Credential identifier the session was requested for.
		id: CredentialsId,
		/// Store-supplied failure description.
		message: String,
	},
	/// The identity-info query failed.
	#[error("Identity info query failed: {message}.")]
	IdentityQuery {
		/// Store-supplied failure description.
		message: String,
	},
	/// The token-processing round failed.
	#[error("Token processing failed: {message}.")]
	TokenProcessing {
		/// Store-supplied failure description.
		message: String,
	},
	/// The processing round succeeded but carried no access token.
	#[error("Token processing response carried no access token.")]
	MissingAccessToken,
}
