//! Per-attempt state bundle with one-shot teardown.

// self
use crate::{
	_prelude::*,
	auth::AuthData,
	channel::SaslChannel,
	store::{AuthSession, Identity},
};

/// Unit of work for one authentication attempt.
///
/// Owns every per-attempt resource: the channel reference, the auth descriptor, the token
/// session, and the identity handle. [`AuthContext::finish`] consumes the context, so the
/// teardown-and-close step cannot run twice; the session and identity are released when the
/// context is dropped at the end of that call.
pub struct AuthContext {
	channel: Arc<dyn SaslChannel>,
	auth_data: AuthData,
	session: Box<dyn AuthSession>,
	identity: Box<dyn Identity>,
	username: String,
	started_at: OffsetDateTime,
}
impl AuthContext {
	/// Bundles the resources of an attempt once a session and an identity exist.
	pub(crate) fn new(
		channel: Arc<dyn SaslChannel>,
		auth_data: AuthData,
		session: Box<dyn AuthSession>,
		identity: Box<dyn Identity>,
	) -> Self {
		Self {
			channel,
			auth_data,
			session,
			identity,
			username: String::new(),
			started_at: OffsetDateTime::now_utc(),
		}
	}

	/// Channel under authentication.
	pub fn channel(&self) -> &dyn SaslChannel {
		self.channel.as_ref()
	}

	/// Auth descriptor for the attempt.
	pub fn auth_data(&self) -> &AuthData {
		&self.auth_data
	}

	/// Mutable auth descriptor, used only by the re-consent merge.
	pub(crate) fn auth_data_mut(&mut self) -> &mut AuthData {
		&mut self.auth_data
	}

	/// Token session opened for the attempt.
	pub(crate) fn session(&self) -> &dyn AuthSession {
		self.session.as_ref()
	}

	/// Identity handle opened for the attempt.
	pub(crate) fn identity(&self) -> &dyn Identity {
		self.identity.as_ref()
	}

	/// Username resolved during the identity query; empty until then.
	pub fn username(&self) -> &str {
		&self.username
	}

	/// Records the username returned by the identity query.
	pub(crate) fn set_username(&mut self, username: impl Into<String>) {
		self.username = username.into();
	}

	/// Wall-clock time spent on the attempt so far.
	pub fn elapsed(&self) -> Duration {
		OffsetDateTime::now_utc() - self.started_at
	}

	/// Terminal step: closes the channel and releases every per-attempt resource.
	pub(crate) async fn finish(self) {
		if let Err(err) = self.channel.close().await {
			tracing::debug!(channel = self.channel.id(), error = %err, "Channel close failed.");
		}
	}
}
impl Debug for AuthContext {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AuthContext")
			.field("channel", &self.channel.id())
			.field("credentials_id", &self.auth_data.credentials_id())
			.field("username_resolved", &!self.username.is_empty())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{
		_preludet::{MockChannel, MockStore},
		auth::{AuthMethod, AuthParams, CredentialsId},
		mechanism::MECHANISM_GOOGLE,
		store::CredentialStore,
	};

	#[tokio::test]
	async fn finish_closes_the_channel_exactly_once() {
		let store = MockStore::default();
		let channel = Arc::new(MockChannel::new("/channel/ctx", [MECHANISM_GOOGLE]));
		let credentials_id = CredentialsId(1);
		let method = AuthMethod::new("oauth2");
		let session = store
			.create_session(credentials_id, &method)
			.expect("Mock session creation should succeed.");
		let identity = store.identity(credentials_id);
		let auth_data = AuthData::new(method, "user_agent", AuthParams::new(), credentials_id);
		let mut ctx = AuthContext::new(channel.clone(), auth_data, session, identity);

		assert!(ctx.username().is_empty());

		ctx.set_username("alice");

		assert_eq!(ctx.username(), "alice");

		// `finish` consumes the context, so a second teardown cannot compile, let alone run.
		ctx.finish().await;

		assert_eq!(channel.close_count(), 1);
	}
}
