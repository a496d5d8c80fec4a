use crate::error::ConfigError as SettingsError;

/// Longest accepted token lifetime: ten years, in seconds
pub const MAX_TOKEN_TTL: i64 = 10 * 365 * 24 * 60 * 60;

#[derive(serde::Deserialize, Clone)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub application: ApplicationSettings,
    pub auth: AuthSettings,
}

#[derive(serde::Deserialize, Clone)]
pub struct ApplicationSettings {
    pub port: u16,
}

#[derive(serde::Deserialize, Clone)]
pub struct DatabaseSettings {
    pub username: String,
    pub password: String,
    pub port: u16,
    pub host: String,
    pub database_name: String,
}

impl DatabaseSettings {
    pub fn connection_string(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.username, self.password, self.host, self.port, self.database_name
        )
    }
}

/// Token and password settings
///
/// The access and refresh secrets are independent slots. Deployments that
/// want a shared secret set both to the same value.
#[derive(serde::Deserialize, Clone)]
pub struct AuthSettings {
    pub access_token_secret: String,
    pub refresh_token_secret: String,
    pub password_secret: String,
    pub access_token_ttl: i64,  // seconds (e.g., 900 for 15 minutes)
    pub refresh_token_ttl: i64, // seconds (e.g., 604800 for 7 days)
}

impl AuthSettings {
    /// Reject settings that would issue already-expired tokens, overflow the
    /// expiry timestamp, or sign with an empty key.
    pub fn validate(&self) -> Result<(), SettingsError> {
        let secrets = [
            ("auth.access_token_secret", &self.access_token_secret),
            ("auth.refresh_token_secret", &self.refresh_token_secret),
            ("auth.password_secret", &self.password_secret),
        ];
        for (name, value) in secrets {
            if value.is_empty() {
                return Err(SettingsError::MissingRequired(name.to_string()));
            }
        }

        let ttls = [
            ("auth.access_token_ttl", self.access_token_ttl),
            ("auth.refresh_token_ttl", self.refresh_token_ttl),
        ];
        for (name, ttl) in ttls {
            if ttl <= 0 || ttl > MAX_TOKEN_TTL {
                return Err(SettingsError::InvalidValue(format!(
                    "{} must be between 1 and {} seconds, got {}",
                    name, MAX_TOKEN_TTL, ttl
                )));
            }
        }

        Ok(())
    }
}

impl std::fmt::Debug for AuthSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSettings")
            .field("access_token_ttl", &self.access_token_ttl)
            .field("refresh_token_ttl", &self.refresh_token_ttl)
            .finish_non_exhaustive()
    }
}

/// Load settings from `configuration.yaml` (optional) overlaid with
/// `APP_`-prefixed environment variables, e.g. `APP_AUTH__ACCESS_TOKEN_TTL=900`.
pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("configuration").required(false))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;
    settings.try_deserialize::<Settings>()
}
