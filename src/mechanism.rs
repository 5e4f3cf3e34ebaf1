//! SASL mechanism selection for delegated-credential logins.
//!
//! Selection is a pure function of the channel's advertised mechanism list. The preference
//! order over kinds (Facebook, then Windows Live, then Google) matches the wire negotiation
//! of the original IM stack; list order carries no weight beyond that.

// self
use crate::_prelude::*;

/// Wire name of the Facebook platform SASL mechanism.
pub const MECHANISM_FACEBOOK: &str = "X-FACEBOOK-PLATFORM";
/// Wire name of the Windows Live Messenger OAuth mechanism.
pub const MECHANISM_WLM: &str = "X-MESSENGER-OAUTH2";
/// Wire name of the Google OAuth 2.0 mechanism.
pub const MECHANISM_GOOGLE: &str = "X-OAUTH2";

/// Mechanism derived from a channel's advertised SASL list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mechanism {
	/// Facebook platform login (`X-FACEBOOK-PLATFORM`).
	Facebook,
	/// Windows Live Messenger OAuth login (`X-MESSENGER-OAUTH2`).
	WindowsLive,
	/// Google OAuth 2.0 login (`X-OAUTH2`).
	Google,
	/// None of the supported mechanisms is advertised; terminal and non-retryable.
	Unsupported,
}
impl Mechanism {
	/// Selects the preferred supported mechanism from an advertised list.
	pub fn select<I, S>(advertised: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let mut wlm = false;
		let mut google = false;

		for mechanism in advertised {
			match mechanism.as_ref() {
				MECHANISM_FACEBOOK => return Self::Facebook,
				MECHANISM_WLM => wlm = true,
				MECHANISM_GOOGLE => google = true,
				_ => {},
			}
		}

		if wlm {
			Self::WindowsLive
		} else if google {
			Self::Google
		} else {
			Self::Unsupported
		}
	}

	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Facebook => "facebook",
			Self::WindowsLive => "windows_live",
			Self::Google => "google",
			Self::Unsupported => "unsupported",
		}
	}

	/// Narrows to a dispatchable mechanism; `None` for [`Mechanism::Unsupported`].
	pub const fn supported(self) -> Option<SupportedMechanism> {
		match self {
			Self::Facebook => Some(SupportedMechanism::Facebook),
			Self::WindowsLive => Some(SupportedMechanism::WindowsLive),
			Self::Google => Some(SupportedMechanism::Google),
			Self::Unsupported => None,
		}
	}

	/// Whether the broker can dispatch this mechanism.
	pub const fn is_supported(self) -> bool {
		self.supported().is_some()
	}
}
impl Display for Mechanism {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Mechanism variants the broker can actually dispatch.
///
/// The unsupported case is unrepresentable here, so the exchange step cannot be handed a
/// mechanism that slipped past the entry gate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SupportedMechanism {
	/// Facebook platform login; the exchange needs the app client-id plus the token.
	Facebook,
	/// Windows Live Messenger login; the exchange needs the token alone.
	WindowsLive,
	/// Google OAuth 2.0 login; the exchange needs the username plus the token.
	Google,
}
impl SupportedMechanism {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Facebook => "facebook",
			Self::WindowsLive => "windows_live",
			Self::Google => "google",
		}
	}
}
impl Display for SupportedMechanism {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl From<SupportedMechanism> for Mechanism {
	fn from(value: SupportedMechanism) -> Self {
		match value {
			SupportedMechanism::Facebook => Self::Facebook,
			SupportedMechanism::WindowsLive => Self::WindowsLive,
			SupportedMechanism::Google => Self::Google,
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn selection_prefers_facebook_then_wlm_then_google() {
		let all = [MECHANISM_GOOGLE, MECHANISM_WLM, MECHANISM_FACEBOOK];

		assert_eq!(Mechanism::select(all), Mechanism::Facebook);
		assert_eq!(Mechanism::select([MECHANISM_GOOGLE, MECHANISM_WLM]), Mechanism::WindowsLive);
		assert_eq!(Mechanism::select([MECHANISM_GOOGLE]), Mechanism::Google);
	}

	#[test]
	fn selection_ignores_unknown_and_plain_mechanisms() {
		let advertised = ["PLAIN", "SCRAM-SHA-1", "X-OAUTH2"];

		assert_eq!(Mechanism::select(advertised), Mechanism::Google);
		assert_eq!(Mechanism::select(["PLAIN", "DIGEST-MD5"]), Mechanism::Unsupported);
		assert_eq!(Mechanism::select(Vec::<String>::new()), Mechanism::Unsupported);
	}

	#[test]
	fn wire_names_match_exactly() {
		// Mechanism names are case-sensitive on the wire.
		assert_eq!(Mechanism::select(["x-oauth2"]), Mechanism::Unsupported);
	}

	#[test]
	fn supported_narrows_every_dispatchable_variant() {
		assert_eq!(Mechanism::Facebook.supported(), Some(SupportedMechanism::Facebook));
		assert_eq!(Mechanism::WindowsLive.supported(), Some(SupportedMechanism::WindowsLive));
		assert_eq!(Mechanism::Google.supported(), Some(SupportedMechanism::Google));
		assert_eq!(Mechanism::Unsupported.supported(), None);
		assert!(!Mechanism::Unsupported.is_supported());
	}

	#[test]
	fn labels_round_trip_through_the_supported_view() {
		for (mechanism, label) in [
			(SupportedMechanism::Facebook, "facebook"),
			(SupportedMechanism::WindowsLive, "windows_live"),
			(SupportedMechanism::Google, "google"),
		] {
			assert_eq!(mechanism.as_str(), label);
			assert_eq!(Mechanism::from(mechanism).as_str(), label);
		}
	}
}
