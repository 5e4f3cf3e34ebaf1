//! Auth-data descriptors fetched from the account registry.

// self
use crate::_prelude::*;

/// Parameter key carrying the single-sign-on UI policy override.
pub const UI_POLICY_KEY: &str = "UiPolicy";
/// Policy value instructing the store to ask the user to re-grant access on the next attempt.
pub const UI_POLICY_REQUEST_PASSWORD: i64 = 2;
/// Parameter key carrying the OAuth application identifier used by the Facebook exchange.
pub const CLIENT_ID_KEY: &str = "ClientId";

/// Integer handle into the credential store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CredentialsId(pub u32);
impl Display for CredentialsId {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "{}", self.0)
	}
}

/// Opaque session-type identifier understood by the credential store (e.g. `oauth2`).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AuthMethod(String);
impl AuthMethod {
	/// Wraps a store-side method name.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the method name as a string slice.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}
impl Display for AuthMethod {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}

/// Ordered string-keyed mechanism parameters with typed values.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthParams(BTreeMap<String, Value>);
impl AuthParams {
	/// Creates an empty parameter set.
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the parameter set carrying the re-consent policy override alone.
	pub fn reconsent_policy() -> Self {
		Self::new().with(UI_POLICY_KEY, UI_POLICY_REQUEST_PASSWORD)
	}

	/// Inserts or replaces one entry.
	pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
		self.0.insert(key.into(), value.into());
	}

	/// Builder-style [`AuthParams::insert`].
	pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
		self.insert(key, value);

		self
	}

	/// Adds or overrides the entries of `extra` without discarding existing entries.
	///
	/// Merging the same overrides twice yields the same set as merging once.
	pub fn merge(&mut self, extra: &AuthParams) {
		for (key, value) in &extra.0 {
			self.0.insert(key.clone(), value.clone());
		}
	}

	/// Returns the string value under `key`, when present and a string.
	pub fn string(&self, key: &str) -> Option<&str> {
		self.0.get(key).and_then(Value::as_str)
	}

	/// Returns the integer value under `key`, when present and an integer.
	pub fn integer(&self, key: &str) -> Option<i64> {
		self.0.get(key).and_then(Value::as_i64)
	}

	/// Whether an entry exists under `key`.
	pub fn contains(&self, key: &str) -> bool {
		self.0.contains_key(key)
	}

	/// Number of entries.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Whether the set holds no entries.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Iterates the entries in key order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
		self.0.iter().map(|(key, value)| (key.as_str(), value))
	}
}

/// Immutable-per-attempt auth descriptor for one account service.
///
/// The credentials identifier and the store-side mechanism live outside the parameter map, so
/// no parameter merge can clear them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AuthData {
	method: AuthMethod,
	mechanism: String,
	params: AuthParams,
	credentials_id: CredentialsId,
}
impl AuthData {
	/// Assembles a descriptor from its registry-provided parts.
	pub fn new(
		method: AuthMethod,
		mechanism: impl Into<String>,
		params: AuthParams,
		credentials_id: CredentialsId,
	) -> Self {
		Self { method, mechanism: mechanism.into(), params, credentials_id }
	}

	/// Session-type identifier used when creating the token session.
	pub fn method(&self) -> &AuthMethod {
		&self.method
	}

	/// Store-side mechanism label passed to every token-processing request.
	pub fn mechanism(&self) -> &str {
		&self.mechanism
	}

	/// Current mechanism parameters.
	pub fn params(&self) -> &AuthParams {
		&self.params
	}

	/// Credential-store handle for this service.
	pub fn credentials_id(&self) -> CredentialsId {
		self.credentials_id
	}

	/// Merges extra parameters into the set without discarding existing entries.
	pub fn insert_params(&mut self, extra: &AuthParams) {
		self.params.merge(extra);
	}
}
