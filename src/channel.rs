//! SASL channel seam: advertised mechanisms, per-mechanism exchanges, close.
//!
//! The wire codecs behind the exchange methods are black boxes; the broker only observes a
//! single success/failure result per exchange. Closing is fire-and-forget: the broker logs a
//! close failure at debug level and moves on.

// self
use crate::_prelude::*;

/// Boxed future returned by asynchronous channel operations.
pub type ChannelFuture<'a, T = ()> =
	Pin<Box<dyn Future<Output = Result<T, SaslError>> + 'a + Send>>;

/// Messaging-transport channel awaiting SASL authentication.
pub trait SaslChannel: Send + Sync {
	/// Stable identity used in logs (e.g. the channel object path).
	fn id(&self) -> &str;

	/// SASL mechanisms advertised by the server side of the channel.
	fn advertised_mechanisms(&self) -> Vec<String>;

	/// Runs the Facebook platform exchange with the app client-id and the access token.
	fn exchange_facebook<'a>(
		&'a self,
		client_id: &'a str,
		access_token: &'a str,
	) -> ChannelFuture<'a>;

	/// Runs the Windows Live Messenger exchange with the access token alone.
	fn exchange_windows_live<'a>(&'a self, access_token: &'a str) -> ChannelFuture<'a>;

	/// Runs the Google `X-OAUTH2` exchange with the username and the access token.
	fn exchange_google<'a>(&'a self, username: &'a str, access_token: &'a str)
	-> ChannelFuture<'a>;

	/// Closes the channel.
	fn close(&self) -> ChannelFuture<'_>;
}

/// Failure reported by a SASL mechanism exchange (or a channel close).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
#[error("SASL exchange failed: {message}.")]
pub struct SaslError {
	/// Channel- or codec-supplied failure description.
	pub message: String,
}
impl SaslError {
	/// Wraps a codec failure description.
	pub fn new(message: impl Into<String>) -> Self {
		Self { message: message.into() }
	}
}
