//! Process-wide webhook secret.
//!
//! One long-lived secret backs the whole round trip: it keys the outbound
//! signature fingerprint and is re-read when the callback comes in. The
//! invariant is that the value present at sign time is the value present at
//! verify time; if they diverge (manual rotation, restored backup),
//! verification fails closed and in-flight payments stay pending.

use std::fmt;
use std::path::PathBuf;

use async_trait::async_trait;
use hmac::{Hmac, Mac};
use rand::RngCore;
use sha2::Sha256;
use tokio::sync::Mutex;

use crate::core::{AppError, Result};

/// Entropy of a generated secret in bytes
const SECRET_BYTES: usize = 32;

/// Hex length of a stored secret
const SECRET_HEX_LEN: usize = SECRET_BYTES * 2;

/// Domain-separation context for fingerprint derivation. Keeps fingerprint
/// output disjoint from any transaction signature computed with the same
/// secret.
const FINGERPRINT_CONTEXT: &[u8] = b"paybridge.webhook.fingerprint.v1";

/// A long-lived webhook signing secret
#[derive(Clone, PartialEq, Eq)]
pub struct WebhookSecret(String);

impl WebhookSecret {
    /// Generates a fresh secret from the OS random source
    pub fn generate() -> Self {
        let mut bytes = [0u8; SECRET_BYTES];
        rand::rngs::OsRng.fill_bytes(&mut bytes);
        Self(hex::encode(bytes))
    }

    /// Wraps an existing secret value (configuration import, tests)
    pub fn from_value(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Raw secret value, for keying signatures
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Derives the fingerprint carried inside correlation tokens:
    /// HMAC-SHA256 keyed by the secret over a fixed context, hex encoded.
    /// The raw secret never leaves the process.
    pub fn fingerprint(&self) -> String {
        let mut mac = Hmac::<Sha256>::new_from_slice(self.0.as_bytes())
            .expect("HMAC-SHA256 accepts keys of any length");
        mac.update(FINGERPRINT_CONTEXT);
        hex::encode(mac.finalize().into_bytes())
    }
}

// Keep the secret out of logs and panic messages
impl fmt::Debug for WebhookSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WebhookSecret(<redacted>)")
    }
}

/// Source of the process-wide webhook secret
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Returns the current secret, creating and persisting one on first use.
    ///
    /// Implementations must run check-then-create under a single-writer
    /// lock: two concurrent first calls must not mint two secrets that both
    /// end up signing live requests.
    async fn get_or_create(&self) -> Result<WebhookSecret>;
}

/// File-backed secret store
///
/// Persists the hex-encoded secret at a configured path. A file with
/// unexpected contents is a hard configuration error rather than a trigger
/// to regenerate: silently replacing the secret would invalidate every
/// in-flight payment without a trace.
pub struct FileSecretStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileSecretStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    async fn read_existing(&self) -> Result<Option<WebhookSecret>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => {
                let value = contents.trim();
                if value.len() != SECRET_HEX_LEN
                    || !value.chars().all(|c| c.is_ascii_hexdigit())
                {
                    return Err(AppError::Configuration(format!(
                        "Secret file {} is corrupted; refusing to regenerate",
                        self.path.display()
                    )));
                }
                Ok(Some(WebhookSecret::from_value(value)))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::internal(format!(
                "Failed to read secret file {}: {}",
                self.path.display(),
                e
            ))),
        }
    }

    async fn persist(&self, secret: &WebhookSecret) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                AppError::internal(format!(
                    "Failed to create secret directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        // Write-then-rename so a crash mid-write cannot leave a half secret
        let tmp_path = self.path.with_extension("tmp");
        tokio::fs::write(&tmp_path, secret.expose())
            .await
            .map_err(|e| {
                AppError::internal(format!(
                    "Failed to write secret file {}: {}",
                    tmp_path.display(),
                    e
                ))
            })?;
        tokio::fs::rename(&tmp_path, &self.path).await.map_err(|e| {
            AppError::internal(format!(
                "Failed to persist secret file {}: {}",
                self.path.display(),
                e
            ))
        })
    }
}

#[async_trait]
impl SecretStore for FileSecretStore {
    async fn get_or_create(&self) -> Result<WebhookSecret> {
        let _guard = self.lock.lock().await;

        if let Some(existing) = self.read_existing().await? {
            return Ok(existing);
        }

        let secret = WebhookSecret::generate();
        self.persist(&secret).await?;
        tracing::info!(
            path = %self.path.display(),
            "Generated new webhook secret"
        );
        Ok(secret)
    }
}

/// In-memory secret store, same single-writer discipline as the file store
///
/// Used by tests and by deployments where the host supplies persistence.
#[derive(Default)]
pub struct MemorySecretStore {
    slot: Mutex<Option<WebhookSecret>>,
}

impl MemorySecretStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Preloads a known secret value
    pub fn with_secret(secret: WebhookSecret) -> Self {
        Self {
            slot: Mutex::new(Some(secret)),
        }
    }

    /// Replaces the current secret (manual rotation); callbacks signed
    /// under the previous secret will be rejected from now on
    pub async fn set(&self, secret: WebhookSecret) {
        *self.slot.lock().await = Some(secret);
    }
}

#[async_trait]
impl SecretStore for MemorySecretStore {
    async fn get_or_create(&self) -> Result<WebhookSecret> {
        let mut slot = self.slot.lock().await;
        if let Some(secret) = slot.as_ref() {
            return Ok(secret.clone());
        }
        let secret = WebhookSecret::generate();
        *slot = Some(secret.clone());
        Ok(secret)
    }
}
