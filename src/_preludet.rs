//! Test doubles for the broker's collaborator seams; enabled via `cfg(test)` or the `test`
//! crate feature.
//!
//! The doubles record every call they receive so tests can assert both what the broker did and
//! what it deliberately avoided (e.g. no store contact when the entry gate rejects a channel).

pub use crate::_prelude::*;

// std
use std::collections::HashMap;
// self
use crate::{
	auth::{AuthData, AuthMethod, AuthParams, CredentialsId},
	channel::{ChannelFuture, SaslChannel, SaslError},
	registry::{AccountHandle, AccountRegistry, ServiceHandle, ServiceKind, StorageId},
	store::{
		AuthSession, CredentialStore, Identity, IdentityInfo, SessionData, StoreError, StoreFuture,
	},
};

/// Registry double mapping storage identifiers to messaging-service auth descriptors.
#[derive(Clone, Debug, Default)]
pub struct MockRegistry {
	accounts: HashMap<StorageId, Vec<AuthData>>,
}
impl MockRegistry {
	/// Registers an account with the given messaging services, in order.
	pub fn with_account(
		mut self,
		id: StorageId,
		services: impl IntoIterator<Item = AuthData>,
	) -> Self {
		self.accounts.insert(id, services.into_iter().collect());

		self
	}
}
impl AccountRegistry for MockRegistry {
	fn resolve_account(&self, id: StorageId) -> Option<Box<dyn AccountHandle>> {
		self.accounts
			.get(&id)
			.cloned()
			.map(|services| Box::new(MockAccount { services }) as Box<dyn AccountHandle>)
	}
}

struct MockAccount {
	services: Vec<AuthData>,
}
impl AccountHandle for MockAccount {
	fn services(&self, kind: ServiceKind) -> Vec<Box<dyn ServiceHandle>> {
		// The double only holds messaging services.
		let _ = kind;

		self.services
			.iter()
			.cloned()
			.map(|data| Box::new(MockService { data }) as Box<dyn ServiceHandle>)
			.collect()
	}
}

struct MockService {
	data: AuthData,
}
impl ServiceHandle for MockService {
	fn auth_data(&self) -> AuthData {
		self.data.clone()
	}
}

/// Scripted identity/credential store double recording every request it receives.
#[derive(Clone, Debug)]
pub struct MockStore {
	identity_result: Option<Result<IdentityInfo, StoreError>>,
	session_error: Option<StoreError>,
	process_result: Result<SessionData, StoreError>,
	/// Identity-info queries observed, by credential identifier.
	pub identity_queries: Arc<Mutex<Vec<CredentialsId>>>,
	/// Sessions created, as (credential identifier, method) pairs.
	pub sessions: Arc<Mutex<Vec<(CredentialsId, AuthMethod)>>>,
	/// Awaited processing calls, as (parameters, store mechanism) pairs.
	pub process_calls: Arc<Mutex<Vec<(AuthParams, String)>>>,
	/// Detached processing calls, as (parameters, store mechanism) pairs.
	pub detached_calls: Arc<Mutex<Vec<(AuthParams, String)>>>,
}
impl MockStore {
	/// Scripts the username returned by identity queries.
	pub fn with_username(mut self, username: impl Into<String>) -> Self {
		self.identity_result = Some(Ok(IdentityInfo::new(username)));

		self
	}

	/// Scripts identity queries to fail.
	pub fn with_identity_error(mut self, err: StoreError) -> Self {
		self.identity_result = Some(Err(err));

		self
	}

	/// Scripts identity queries to never resolve, keeping the attempt in flight.
	pub fn with_pending_identity(mut self) -> Self {
		self.identity_result = None;

		self
	}

	/// Scripts session creation to fail.
	pub fn with_session_error(mut self, err: StoreError) -> Self {
		self.session_error = Some(err);

		self
	}

	/// Scripts the access token issued by token processing.
	pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
		self.process_result =
			Ok(SessionData::new().with(crate::store::ACCESS_TOKEN_KEY, token.into()));

		self
	}

	/// Scripts token processing to succeed without an access token entry.
	pub fn with_empty_session_data(mut self) -> Self {
		self.process_result = Ok(SessionData::new());

		self
	}

	/// Scripts token processing to fail.
	pub fn with_process_error(mut self, err: StoreError) -> Self {
		self.process_result = Err(err);

		self
	}

	/// Total number of requests the store has observed, across every operation.
	pub fn contact_count(&self) -> usize {
		self.identity_queries.lock().len()
			+ self.sessions.lock().len()
			+ self.process_calls.lock().len()
			+ self.detached_calls.lock().len()
	}
}
impl Default for MockStore {
	fn default() -> Self {
		Self {
			identity_result: Some(Ok(IdentityInfo::new("user"))),
			session_error: None,
			process_result: Ok(SessionData::new().with(crate::store::ACCESS_TOKEN_KEY, "token")),
			identity_queries: Default::default(),
			sessions: Default::default(),
			process_calls: Default::default(),
			detached_calls: Default::default(),
		}
	}
}
impl CredentialStore for MockStore {
	fn identity(&self, id: CredentialsId) -> Box<dyn Identity> {
		Box::new(MockIdentity {
			id,
			result: self.identity_result.clone(),
			queries: self.identity_queries.clone(),
		})
	}

	fn create_session(
		&self,
		id: CredentialsId,
		method: &AuthMethod,
	) -> Result<Box<dyn AuthSession>, StoreError> {
		if let Some(err) = &self.session_error {
			return Err(err.clone());
		}

		self.sessions.lock().push((id, method.clone()));

		Ok(Box::new(MockSession {
			result: self.process_result.clone(),
			process_calls: self.process_calls.clone(),
			detached_calls: self.detached_calls.clone(),
		}))
	}
}

struct MockIdentity {
	id: CredentialsId,
	result: Option<Result<IdentityInfo, StoreError>>,
	queries: Arc<Mutex<Vec<CredentialsId>>>,
}
impl Identity for MockIdentity {
	fn query_info(&self) -> StoreFuture<'_, IdentityInfo> {
		self.queries.lock().push(self.id);

		let result = self.result.clone();

		Box::pin(async move {
			match result {
				Some(result) => result,
				None => std::future::pending().await,
			}
		})
	}
}

struct MockSession {
	result: Result<SessionData, StoreError>,
	process_calls: Arc<Mutex<Vec<(AuthParams, String)>>>,
	detached_calls: Arc<Mutex<Vec<(AuthParams, String)>>>,
}
impl AuthSession for MockSession {
	fn process<'a>(
		&'a self,
		params: &'a AuthParams,
		mechanism: &'a str,
	) -> StoreFuture<'a, SessionData> {
		self.process_calls.lock().push((params.clone(), mechanism.to_owned()));

		let result = self.result.clone();

		Box::pin(async move { result })
	}

	fn process_detached(&self, params: &AuthParams, mechanism: &str) {
		self.detached_calls.lock().push((params.clone(), mechanism.to_owned()));
	}
}

/// One SASL exchange observed by a [`MockChannel`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExchangeCall {
	/// Facebook exchange with (client-id, access token).
	Facebook {
		/// App client-id handed to the codec.
		client_id: String,
		/// Access token handed to the codec.
		access_token: String,
	},
	/// Windows Live exchange with the access token alone.
	WindowsLive {
		/// Access token handed to the codec.
		access_token: String,
	},
	/// Google exchange with (username, access token).
	Google {
		/// Username handed to the codec.
		username: String,
		/// Access token handed to the codec.
		access_token: String,
	},
}

/// Channel double with a scripted exchange result and call recorders.
#[derive(Debug)]
pub struct MockChannel {
	id: String,
	advertised: Vec<String>,
	exchange_result: Result<(), SaslError>,
	/// Exchanges observed, in order.
	pub exchanges: Arc<Mutex<Vec<ExchangeCall>>>,
	/// Number of close calls observed.
	pub closes: Arc<Mutex<u32>>,
}
impl MockChannel {
	/// Creates a channel advertising the given mechanisms; exchanges succeed by default.
	pub fn new<I, S>(id: impl Into<String>, advertised: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self {
			id: id.into(),
			advertised: advertised.into_iter().map(Into::into).collect(),
			exchange_result: Ok(()),
			exchanges: Default::default(),
			closes: Default::default(),
		}
	}

	/// Scripts every exchange to fail.
	pub fn with_exchange_error(mut self, err: SaslError) -> Self {
		self.exchange_result = Err(err);

		self
	}

	/// Number of times the channel has been closed.
	pub fn close_count(&self) -> u32 {
		*self.closes.lock()
	}

	/// Snapshot of the exchanges observed so far.
	pub fn exchange_calls(&self) -> Vec<ExchangeCall> {
		self.exchanges.lock().clone()
	}

	fn record(&self, call: ExchangeCall) -> ChannelFuture<'_> {
		self.exchanges.lock().push(call);

		let result = self.exchange_result.clone();

		Box::pin(async move { result })
	}
}
impl SaslChannel for MockChannel {
	fn id(&self) -> &str {
		&self.id
	}

	fn advertised_mechanisms(&self) -> Vec<String> {
		self.advertised.clone()
	}

	fn exchange_facebook<'a>(
		&'a self,
		client_id: &'a str,
		access_token: &'a str,
	) -> ChannelFuture<'a> {
		self.record(ExchangeCall::Facebook {
			client_id: client_id.to_owned(),
			access_token: access_token.to_owned(),
		})
	}

	fn exchange_windows_live<'a>(&'a self, access_token: &'a str) -> ChannelFuture<'a> {
		self.record(ExchangeCall::WindowsLive { access_token: access_token.to_owned() })
	}

	fn exchange_google<'a>(
		&'a self,
		username: &'a str,
		access_token: &'a str,
	) -> ChannelFuture<'a> {
		self.record(ExchangeCall::Google {
			username: username.to_owned(),
			access_token: access_token.to_owned(),
		})
	}

	fn close(&self) -> ChannelFuture<'_> {
		*self.closes.lock() += 1;

		Box::pin(async { Ok(()) })
	}
}
