//! Server-held app credentials injected into every upstream request.

// self
use crate::{_prelude::*, auth::Secret, error::ConfigError};

/// Environment variable holding the app key.
pub const APP_KEY_ENV: &str = "APP_KEY";
/// Environment variable holding the app secret.
pub const APP_SECRET_ENV: &str = "APP_SECRET";

/// App key + app secret pair identifying this application to the upstream API.
///
/// Values are validated once at construction and are immutable afterwards; both flows read them
/// through shared references.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Credentials {
	app_key: Secret,
	app_secret: Secret,
}
impl Credentials {
	/// Validates and wraps the provided key/secret pair.
	pub fn new(
		app_key: impl Into<String>,
		app_secret: impl Into<String>,
	) -> Result<Self, ConfigError> {
		let app_key = Secret::new(app_key);
		let app_secret = Secret::new(app_secret);

		if app_key.is_blank() {
			return Err(ConfigError::MissingEnv { name: APP_KEY_ENV });
		}
		if app_secret.is_blank() {
			return Err(ConfigError::MissingEnv { name: APP_SECRET_ENV });
		}

		Ok(Self { app_key, app_secret })
	}

	/// App key as sent in the `appkey` header and token request body.
	pub fn app_key(&self) -> &str {
		self.app_key.expose()
	}

	/// App secret as sent in the `appsecret` header and token request body.
	pub fn app_secret(&self) -> &str {
		self.app_secret.expose()
	}
}
