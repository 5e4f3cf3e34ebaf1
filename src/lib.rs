//! SASL/OAuth authentication broker for chat-protocol logins—negotiate delegated tokens with a
//! single-sign-on credential store and drive the channel's SASL exchange with one-shot re-consent
//! recovery.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod channel;
pub mod error;
pub mod flows;
pub mod mechanism;
pub mod obs;
pub mod registry;
pub mod store;
#[cfg(any(test, feature = "test"))] pub mod _preludet;

mod _prelude {
	pub use std::{
		collections::{BTreeMap, HashSet},
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	pub use parking_lot::Mutex;
	pub use serde::{Deserialize, Serialize};
	pub use serde_json::Value;
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};

	pub use crate::error::{Error, Result};
}

#[cfg(test)] use {sasl_broker as _, tokio as _};
