//! JWKS server
//!
//! Issues RS256 tokens signed with rotating RSA keys and publishes the public
//! halves of every unexpired key as a JSON Web Key Set:
//! - Private keys sealed at rest with AES-GCM (`NOT_MY_KEY`)
//! - Expiry-based key selection against an injectable clock
//! - SQLite or in-process persistence
//! - Registration with Argon2id password hashing and an async audit log

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use chrono::Duration;
use tokio::task::JoinHandle;
use tracing::info;

use api::state::AppState;
use domain::{
    AuthLogRepository, Clock, DomainError, EncryptionProvider, SigningKeyRepository,
    SystemClock, UserRepository,
};
use infrastructure::{
    admission::AdmissionGate,
    audit::{ChannelAuditSink, InMemoryAuthLogRepository, SqliteAuthLogRepository},
    auth::{PublicKeyPublisher, TokenIssuer},
    crypto::AesGcmEncryptor,
    keys::{InMemorySigningKeyRepository, KeySelector, KeyStore, SqliteSigningKeyRepository},
    storage::{self, SqliteConfig},
    user::{
        Argon2Hasher, InMemoryUserRepository, PasswordHasher, SqliteUserRepository, UserService,
    },
};

/// Create the application state with custom configuration
///
/// Reads the at-rest secret from `NOT_MY_KEY` and uses wall-clock time.
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let app = AppBuilder::new(config.clone()).build().await?;
    Ok(app.state)
}

/// A wired application
pub struct App {
    pub state: AppState,
    pub key_store: KeyStore,
    pub clock: Arc<dyn Clock>,
    /// Drains the audit channel; ends when every handler clone is dropped
    pub audit_worker: JoinHandle<()>,
}

/// Wires repositories, key handling and services from an [`AppConfig`]
///
/// Any collaborator left unset falls back to its production default.
pub struct AppBuilder {
    config: AppConfig,
    clock: Option<Arc<dyn Clock>>,
    encryptor: Option<Arc<dyn EncryptionProvider>>,
    hasher: Option<Arc<dyn PasswordHasher>>,
}

impl AppBuilder {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            clock: None,
            encryptor: None,
            hasher: None,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn with_encryptor(mut self, encryptor: Arc<dyn EncryptionProvider>) -> Self {
        self.encryptor = Some(encryptor);
        self
    }

    pub fn with_password_hasher(mut self, hasher: Arc<dyn PasswordHasher>) -> Self {
        self.hasher = Some(hasher);
        self
    }

    pub async fn build(self) -> anyhow::Result<App> {
        let config = self.config;

        let encryptor = match self.encryptor {
            Some(encryptor) => encryptor,
            None => Arc::new(AesGcmEncryptor::from_env()?),
        };
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        let hasher = match self.hasher {
            Some(hasher) => hasher,
            None => Arc::new(Argon2Hasher::new()),
        };

        let repositories = open_repositories(&config).await?;

        let key_store = KeyStore::new(repositories.keys, encryptor)
            .with_modulus_bits(config.keys.modulus_bits);

        if config.keys.bootstrap {
            bootstrap_keys(&key_store, clock.as_ref()).await?;
        }

        let (audit_sink, audit_worker) = ChannelAuditSink::spawn(
            config.audit.channel_capacity,
            repositories.users.clone(),
            repositories.logs,
        );

        let selector = KeySelector::new(key_store.clone(), clock.clone());
        let token_issuer = TokenIssuer::new(selector, config.token.clone(), Arc::new(audit_sink));
        let key_publisher = PublicKeyPublisher::new(key_store.clone(), clock.clone());
        let user_service = UserService::new(repositories.users, hasher);
        let admission_gate = AdmissionGate::new(config.rate_limit.clone());

        let state = AppState {
            token_issuer,
            key_publisher,
            user_service,
            admission_gate,
        };

        Ok(App {
            state,
            key_store,
            clock,
            audit_worker,
        })
    }
}

/// Insert one key valid for the next hour and one that expired an hour ago
pub async fn bootstrap_keys(store: &KeyStore, clock: &dyn Clock) -> Result<(), DomainError> {
    let now = clock.now();
    let valid = store.create(now + Duration::hours(1)).await?;
    let expired = store.create(now - Duration::hours(1)).await?;

    info!(valid_kid = %valid, expired_kid = %expired, "Bootstrapped signing keys");
    Ok(())
}

struct Repositories {
    keys: Arc<dyn SigningKeyRepository>,
    users: Arc<dyn UserRepository>,
    logs: Arc<dyn AuthLogRepository>,
}

async fn open_repositories(config: &AppConfig) -> anyhow::Result<Repositories> {
    if config.database.is_memory() {
        info!("Storage backend: in-memory");
        return Ok(Repositories {
            keys: Arc::new(InMemorySigningKeyRepository::new()),
            users: Arc::new(InMemoryUserRepository::new()),
            logs: Arc::new(InMemoryAuthLogRepository::new()),
        });
    }

    let sqlite = SqliteConfig::new(&config.database.url)
        .with_max_connections(config.database.max_connections);

    info!(url = %sqlite.url, "Storage backend: SQLite");
    let pool = storage::connect(&sqlite).await?;
    storage::run_migrations(&pool).await?;

    Ok(Repositories {
        keys: Arc::new(SqliteSigningKeyRepository::new(pool.clone())),
        users: Arc::new(SqliteUserRepository::new(pool.clone())),
        logs: Arc::new(SqliteAuthLogRepository::new(pool)),
    })
}
