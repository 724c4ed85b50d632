use keyring::Entry;

// ── Secure Secret Store (OS keychain) ────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum SecretError {
    #[error("secure storage error: {0}")]
    Keyring(#[from] keyring::Error),
    #[error("secure storage task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// A single secret under one fixed name. Calls may block on the OS, so async
/// callers should go through `spawn_blocking`.
pub trait SecretStore: Send + Sync {
    /// `Ok(None)` when no secret has been stored yet.
    fn get(&self) -> Result<Option<String>, SecretError>;

    fn set(&self, value: &str) -> Result<(), SecretError>;

    /// Removing a secret that does not exist is not an error.
    fn delete(&self) -> Result<(), SecretError>;
}

/// OS-backed store: macOS Keychain, Windows Credential Manager, or the Linux
/// kernel keyring, via the `keyring` crate.
///
/// On Linux the `linux-native` backend keeps the secret in the keyutils
/// session keyring, which does not survive logout or reboot. A migrated key
/// is therefore gone after the next login there and has to be entered again;
/// the plaintext copy has already been deleted by then. A persistent backend
/// would need `sync-secret-service`, which links against system libdbus.
pub struct KeyringSecretStore {
    service: String,
    account: String,
}

impl KeyringSecretStore {
    pub fn new(service: impl Into<String>, account: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            account: account.into(),
        }
    }

    fn entry(&self) -> Result<Entry, SecretError> {
        Ok(Entry::new(&self.service, &self.account)?)
    }
}

impl SecretStore for KeyringSecretStore {
    fn get(&self) -> Result<Option<String>, SecretError> {
        match self.entry()?.get_password() {
            Ok(value) => Ok(Some(value)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, value: &str) -> Result<(), SecretError> {
        Ok(self.entry()?.set_password(value)?)
    }

    fn delete(&self) -> Result<(), SecretError> {
        match self.entry()?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-process stand-in for the keychain, with call counters and a switch
/// that makes every call fail.
#[cfg(test)]
#[derive(Default)]
pub struct MemorySecretStore {
    value: std::sync::Mutex<Option<String>>,
    failing: std::sync::atomic::AtomicBool,
    writes: std::sync::atomic::AtomicUsize,
}

#[cfg(test)]
impl MemorySecretStore {
    pub fn with_value(value: &str) -> Self {
        let store = Self::default();
        *store.value.lock().unwrap() = Some(value.to_string());
        store
    }

    pub fn failing() -> Self {
        let store = Self::default();
        store.set_failing(true);
        store
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing
            .store(failing, std::sync::atomic::Ordering::SeqCst);
    }

    pub fn current(&self) -> Option<String> {
        self.value.lock().unwrap().clone()
    }

    pub fn writes(&self) -> usize {
        self.writes.load(std::sync::atomic::Ordering::SeqCst)
    }

    fn check(&self) -> Result<(), SecretError> {
        if self.failing.load(std::sync::atomic::Ordering::SeqCst) {
            Err(keyring::Error::PlatformFailure("secure storage unavailable".into()).into())
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
impl SecretStore for MemorySecretStore {
    fn get(&self) -> Result<Option<String>, SecretError> {
        self.check()?;
        Ok(self.current())
    }

    fn set(&self, value: &str) -> Result<(), SecretError> {
        self.check()?;
        self.writes
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        *self.value.lock().unwrap() = Some(value.to_string());
        Ok(())
    }

    fn delete(&self) -> Result<(), SecretError> {
        self.check()?;
        self.writes
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        *self.value.lock().unwrap() = None;
        Ok(())
    }
}
