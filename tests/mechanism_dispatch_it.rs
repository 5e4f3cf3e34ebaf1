// self
use sasl_broker::{
	_preludet::*,
	auth::{AuthData, AuthMethod, AuthParams, CLIENT_ID_KEY, CredentialsId},
	flows::Broker,
	mechanism::{MECHANISM_FACEBOOK, MECHANISM_GOOGLE, MECHANISM_WLM},
	registry::{ChatAccount, StorageId},
};

const PROVIDER: &str = "sso";
const ACCOUNT_ID: StorageId = StorageId(5);

fn account() -> ChatAccount {
	ChatAccount::new(PROVIDER, ACCOUNT_ID, "/account/5")
}

fn broker_with(params: AuthParams, store: Arc<MockStore>) -> Broker {
	let auth_data =
		AuthData::new(AuthMethod::new("oauth2"), "user_agent", params, CredentialsId(23));
	let registry = MockRegistry::default().with_account(ACCOUNT_ID, [auth_data]);

	Broker::new(Arc::new(registry), store, PROVIDER)
}

#[tokio::test]
async fn facebook_receives_client_id_and_token() {
	let store = Arc::new(MockStore::default().with_access_token("fb-tok"));
	let channel = Arc::new(MockChannel::new("/channel/facebook", [MECHANISM_FACEBOOK]));
	let broker = broker_with(AuthParams::new().with(CLIENT_ID_KEY, "app-5"), store);

	broker.start(channel.clone(), &account()).await;

	assert_eq!(
		channel.exchange_calls(),
		vec![ExchangeCall::Facebook { client_id: "app-5".into(), access_token: "fb-tok".into() }],
	);
	assert_eq!(channel.close_count(), 1);
}

#[tokio::test]
async fn facebook_without_client_id_dispatches_an_empty_one() {
	let store = Arc::new(MockStore::default().with_access_token("fb-tok"));
	let channel = Arc::new(MockChannel::new("/channel/facebook", [MECHANISM_FACEBOOK]));
	let broker = broker_with(AuthParams::new(), store);

	broker.start(channel.clone(), &account()).await;

	assert_eq!(
		channel.exchange_calls(),
		vec![ExchangeCall::Facebook { client_id: String::new(), access_token: "fb-tok".into() }],
	);
}

#[tokio::test]
async fn windows_live_receives_the_token_alone() {
	let store = Arc::new(MockStore::default().with_access_token("wlm-tok"));
	let channel = Arc::new(MockChannel::new("/channel/wlm", [MECHANISM_WLM]));
	let broker = broker_with(AuthParams::new(), store);

	broker.start(channel.clone(), &account()).await;

	assert_eq!(
		channel.exchange_calls(),
		vec![ExchangeCall::WindowsLive { access_token: "wlm-tok".into() }],
	);
}

#[tokio::test]
async fn google_receives_the_resolved_username_verbatim() {
	let store =
		Arc::new(MockStore::default().with_username("alice@example.net").with_access_token("g-tok"));
	let channel = Arc::new(MockChannel::new("/channel/google", [MECHANISM_GOOGLE]));
	let broker = broker_with(AuthParams::new(), store);

	broker.start(channel.clone(), &account()).await;

	assert_eq!(
		channel.exchange_calls(),
		vec![ExchangeCall::Google {
			username: "alice@example.net".into(),
			access_token: "g-tok".into(),
		}],
	);
}

#[tokio::test]
async fn facebook_outranks_the_other_advertised_mechanisms() {
	let store = Arc::new(MockStore::default().with_access_token("any-tok"));
	let channel = Arc::new(MockChannel::new(
		"/channel/all",
		[MECHANISM_GOOGLE, MECHANISM_WLM, MECHANISM_FACEBOOK],
	));
	let broker = broker_with(AuthParams::new().with(CLIENT_ID_KEY, "app-5"), store);

	broker.start(channel.clone(), &account()).await;

	assert_eq!(
		channel.exchange_calls(),
		vec![ExchangeCall::Facebook { client_id: "app-5".into(), access_token: "any-tok".into() }],
	);
}
