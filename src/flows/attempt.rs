//! Authentication attempt orchestration.
//!
//! One attempt walks the stage chain `resolve_service` → `create_session` → `query_identity` →
//! `process_token` → `exchange`, suspending on every collaborator call. Before a context
//! exists, failures close the channel directly; once the [`AuthContext`] is built, every path
//! funnels through its single consuming teardown, so the channel is closed exactly once. An
//! exchange failure additionally issues one detached re-consent request that primes the
//! credential store for the next login attempt—the current channel is unrecoverable.

// self
use crate::{
	_prelude::*,
	auth::{AuthContext, AuthData, AuthParams, CLIENT_ID_KEY},
	channel::{SaslChannel, SaslError},
	flows::Broker,
	mechanism::{Mechanism, SupportedMechanism},
	obs::{self, AttemptOutcome, AttemptSpan, AttemptStage},
	registry::{ChatAccount, ResolutionError, ServiceKind},
	store::StoreError,
};

impl Broker {
	/// Starts one authentication attempt for the channel/account pair.
	///
	/// Fully asynchronous and fire-and-forget: nothing is returned, and every outcome is
	/// observed through logs, metrics, and the channel's closed state. Callers must have
	/// checked [`Broker::supports`] first.
	pub async fn start(&self, channel: Arc<dyn SaslChannel>, account: &ChatAccount) {
		let mechanism = Mechanism::select(channel.advertised_mechanisms());
		let span = AttemptSpan::new(channel.id(), mechanism);

		span.instrument(self.run(channel, account, mechanism)).await
	}

	async fn run(&self, channel: Arc<dyn SaslChannel>, account: &ChatAccount, mechanism: Mechanism) {
		let Some(_in_flight) = self.begin_attempt(channel.id()) else {
			tracing::warn!(
				channel = channel.id(),
				"An authentication attempt is already running for this channel; ignoring."
			);

			return;
		};

		obs::record_attempt_outcome(mechanism, AttemptOutcome::Attempt);
		tracing::debug!(
			channel = channel.id(),
			account = account.path.as_str(),
			"Starting SASL authentication attempt."
		);

		// The gate validated the mechanism already; re-derive instead of trusting caller state.
		let Some(mechanism) = mechanism.supported() else {
			tracing::warn!(channel = channel.id(), "Channel advertises no supported SASL mechanism.");
			obs::record_attempt_outcome(Mechanism::Unsupported, AttemptOutcome::Failure);
			close_quietly(channel.as_ref()).await;

			return;
		};
		let auth_data = match self.resolve_auth_data(account) {
			Ok(auth_data) => auth_data,
			Err(err) => {
				let err = Error::from(err);

				fail_before_context(channel.as_ref(), mechanism, AttemptStage::ResolveService, &err)
					.await;

				return;
			},
		};
		let identity = self.store.identity(auth_data.credentials_id());
		let session =
			match self.store.create_session(auth_data.credentials_id(), auth_data.method()) {
				Ok(session) => session,
				Err(err) => {
					let err = Error::from(err);

					fail_before_context(
						channel.as_ref(),
						mechanism,
						AttemptStage::CreateSession,
						&err,
					)
					.await;

					return;
				},
			};
		// A session and an identity exist; every further failure funnels through the single
		// context-consuming exit below.
		let mut ctx = AuthContext::new(channel, auth_data, session, identity);

		match drive(&mut ctx, mechanism).await {
			Ok(()) => {
				tracing::debug!(
					channel = ctx.channel().id(),
					elapsed = %ctx.elapsed(),
					"Authentication succeeded."
				);
				obs::record_attempt_outcome(mechanism.into(), AttemptOutcome::Success);
			},
			Err((stage, err)) => {
				tracing::warn!(
					channel = ctx.channel().id(),
					stage = stage.as_str(),
					error = %err,
					"Authentication failed."
				);
				obs::record_stage_failure(mechanism.into(), stage);

				if matches!(err, Error::Sasl(_)) {
					issue_reconsent(&mut ctx);
					obs::record_attempt_outcome(mechanism.into(), AttemptOutcome::Retry);
				}

				obs::record_attempt_outcome(mechanism.into(), AttemptOutcome::Failure);
			},
		}

		ctx.finish().await;
	}

	/// Resolves the account's messaging auth descriptor in the registry.
	///
	/// Takes the first messaging service unconditionally; the registry is assumed to hold
	/// exactly one IM service per account for this provider, and list order is the only
	/// tie-break.
	fn resolve_auth_data(&self, account: &ChatAccount) -> Result<AuthData, ResolutionError> {
		let id = account.storage_id;
		let handle =
			self.registry.resolve_account(id).ok_or(ResolutionError::AccountNotFound { id })?;
		let service = handle
			.services(ServiceKind::Messaging)
			.into_iter()
			.next()
			.ok_or(ResolutionError::NoService { id, kind: ServiceKind::Messaging })?;

		Ok(service.auth_data())
	}
}

type StageResult<T> = Result<T, (AttemptStage, Error)>;

/// Drives the context through identity query, token processing, and the exchange.
async fn drive(ctx: &mut AuthContext, mechanism: SupportedMechanism) -> StageResult<()> {
	let info = match ctx.identity().query_info().await {
		Ok(info) => info,
		Err(err) => return Err((AttemptStage::QueryIdentity, err.into())),
	};

	ctx.set_username(info.username);

	// Token processing chains immediately; it is not a separate caller-visible state.
	let data = match ctx
		.session()
		.process(ctx.auth_data().params(), ctx.auth_data().mechanism())
		.await
	{
		Ok(data) => data,
		Err(err) => return Err((AttemptStage::ProcessToken, err.into())),
	};
	let Some(access_token) = data.access_token().map(str::to_owned) else {
		return Err((AttemptStage::ProcessToken, StoreError::MissingAccessToken.into()));
	};

	exchange(ctx, mechanism, &access_token)
		.await
		.map_err(|err| (AttemptStage::Exchange, err.into()))
}

/// Routes the exchange to the mechanism codec with the credentials it needs.
async fn exchange(
	ctx: &AuthContext,
	mechanism: SupportedMechanism,
	access_token: &str,
) -> Result<(), SaslError> {
	let channel = ctx.channel();

	match mechanism {
		SupportedMechanism::Facebook => {
			// The original stack handed an absent client-id straight to the codec.
			let client_id = ctx.auth_data().params().string(CLIENT_ID_KEY).unwrap_or("");

			channel.exchange_facebook(client_id, access_token).await
		},
		SupportedMechanism::WindowsLive => channel.exchange_windows_live(access_token).await,
		SupportedMechanism::Google => {
			channel.exchange_google(ctx.username(), access_token).await
		},
	}
}

/// Merges the re-consent policy override and issues one detached processing request so the
/// store asks the user to re-grant access on the next login attempt.
fn issue_reconsent(ctx: &mut AuthContext) {
	tracing::debug!(
		channel = ctx.channel().id(),
		"Requesting re-consent from the credential store for the next attempt."
	);
	ctx.auth_data_mut().insert_params(&AuthParams::reconsent_policy());
	ctx.session().process_detached(ctx.auth_data().params(), ctx.auth_data().mechanism());
}

/// Terminal path for failures that occur before an [`AuthContext`] exists.
async fn fail_before_context(
	channel: &dyn SaslChannel,
	mechanism: SupportedMechanism,
	stage: AttemptStage,
	err: &Error,
) {
	tracing::warn!(
		channel = channel.id(),
		stage = stage.as_str(),
		error = %err,
		"Authentication failed."
	);
	obs::record_stage_failure(mechanism.into(), stage);
	obs::record_attempt_outcome(mechanism.into(), AttemptOutcome::Failure);
	close_quietly(channel).await;
}

async fn close_quietly(channel: &dyn SaslChannel) {
	if let Err(err) = channel.close().await {
		tracing::debug!(channel = channel.id(), error = %err, "Channel close failed.");
	}
}
