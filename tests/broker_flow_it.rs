// self
use sasl_broker::{
	_preludet::*,
	auth::{
		AuthData, AuthMethod, AuthParams, CLIENT_ID_KEY, CredentialsId, UI_POLICY_KEY,
		UI_POLICY_REQUEST_PASSWORD,
	},
	channel::SaslError,
	flows::Broker,
	mechanism::MECHANISM_GOOGLE,
	registry::{ChatAccount, StorageId},
	store::StoreError,
};

const PROVIDER: &str = "sso";
const ACCOUNT_ID: StorageId = StorageId(7);

fn auth_data() -> AuthData {
	AuthData::new(
		AuthMethod::new("oauth2"),
		"user_agent",
		AuthParams::new().with(CLIENT_ID_KEY, "app-7").with("Scope", "chat"),
		CredentialsId(42),
	)
}

fn account() -> ChatAccount {
	ChatAccount::new(PROVIDER, ACCOUNT_ID, "/account/7")
}

fn broker_with(store: Arc<MockStore>) -> Broker {
	let registry = MockRegistry::default().with_account(ACCOUNT_ID, [auth_data()]);

	Broker::new(Arc::new(registry), store, PROVIDER)
}

#[tokio::test]
async fn google_flow_succeeds_end_to_end() {
	let store = Arc::new(MockStore::default().with_username("alice").with_access_token("tok1"));
	let channel = Arc::new(MockChannel::new("/channel/google", [MECHANISM_GOOGLE]));
	let broker = broker_with(store.clone());

	broker.start(channel.clone(), &account()).await;

	assert_eq!(
		channel.exchange_calls(),
		vec![ExchangeCall::Google { username: "alice".into(), access_token: "tok1".into() }],
	);
	assert_eq!(channel.close_count(), 1);
	assert_eq!(
		store.sessions.lock().clone(),
		vec![(CredentialsId(42), AuthMethod::new("oauth2"))],
	);
	assert_eq!(store.identity_queries.lock().clone(), vec![CredentialsId(42)]);
	assert_eq!(store.process_calls.lock().len(), 1);
	assert!(store.detached_calls.lock().is_empty(), "A successful flow must not issue a retry.");
}

#[tokio::test]
async fn exchange_failure_issues_one_detached_reconsent_then_closes() {
	let store = Arc::new(MockStore::default().with_username("alice").with_access_token("tok1"));
	let channel = Arc::new(
		MockChannel::new("/channel/google", [MECHANISM_GOOGLE])
			.with_exchange_error(SaslError::new("token rejected")),
	);
	let broker = broker_with(store.clone());

	broker.start(channel.clone(), &account()).await;

	let detached = store.detached_calls.lock().clone();

	assert_eq!(detached.len(), 1);

	let (params, mechanism) = &detached[0];

	assert_eq!(mechanism, "user_agent");
	assert_eq!(params.string(CLIENT_ID_KEY), Some("app-7"));
	assert_eq!(params.string("Scope"), Some("chat"));
	assert_eq!(params.integer(UI_POLICY_KEY), Some(UI_POLICY_REQUEST_PASSWORD));

	let awaited = store.process_calls.lock().clone();

	assert_eq!(awaited.len(), 1);
	assert!(
		!awaited[0].0.contains(UI_POLICY_KEY),
		"The first processing call must not carry the policy override.",
	);
	assert_eq!(channel.close_count(), 1);
}

#[tokio::test]
async fn token_processing_failure_tears_down_without_retry() {
	let store = Arc::new(
		MockStore::default()
			.with_username("alice")
			.with_process_error(StoreError::TokenProcessing { message: "store offline".into() }),
	);
	let channel = Arc::new(MockChannel::new("/channel/google", [MECHANISM_GOOGLE]));
	let broker = broker_with(store.clone());

	broker.start(channel.clone(), &account()).await;

	assert!(channel.exchange_calls().is_empty());
	assert_eq!(channel.close_count(), 1);
	assert!(
		store.detached_calls.lock().is_empty(),
		"The re-consent retry is defined only for exchange failures.",
	);
}

#[tokio::test]
async fn missing_access_token_is_a_processing_failure() {
	let store = Arc::new(MockStore::default().with_username("alice").with_empty_session_data());
	let channel = Arc::new(MockChannel::new("/channel/google", [MECHANISM_GOOGLE]));
	let broker = broker_with(store.clone());

	broker.start(channel.clone(), &account()).await;

	assert!(channel.exchange_calls().is_empty());
	assert_eq!(channel.close_count(), 1);
	assert!(store.detached_calls.lock().is_empty());
}

#[tokio::test]
async fn identity_query_failure_tears_down_before_processing() {
	let store = Arc::new(
		MockStore::default()
			.with_identity_error(StoreError::IdentityQuery { message: "identity gone".into() }),
	);
	let channel = Arc::new(MockChannel::new("/channel/google", [MECHANISM_GOOGLE]));
	let broker = broker_with(store.clone());

	broker.start(channel.clone(), &account()).await;

	assert!(store.process_calls.lock().is_empty());
	assert!(channel.exchange_calls().is_empty());
	assert_eq!(channel.close_count(), 1);
}

#[tokio::test]
async fn session_creation_failure_closes_without_identity_query() {
	let store = Arc::new(MockStore::default().with_session_error(StoreError::SessionCreation {
		id: CredentialsId(42),
		message: "method not registered".into(),
	}));
	let channel = Arc::new(MockChannel::new("/channel/google", [MECHANISM_GOOGLE]));
	let broker = broker_with(store.clone());

	broker.start(channel.clone(), &account()).await;

	assert!(store.identity_queries.lock().is_empty());
	assert!(store.process_calls.lock().is_empty());
	assert_eq!(channel.close_count(), 1);
}
