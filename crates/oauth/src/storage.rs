use std::sync::Mutex;

use crate::types::Credentials;

/// Where the surrounding application keeps the Tempo token pair.
///
/// The OAuth flow never touches disk itself; it only loads and saves through
/// this interface.
pub trait CredentialStore: Send + Sync {
    /// Load stored credentials, `None` if nothing was ever saved.
    fn load_credentials(&self) -> anyhow::Result<Option<Credentials>>;

    /// Persist `credentials`, replacing whatever was stored before.
    fn save_credentials(&self, credentials: &Credentials) -> anyhow::Result<()>;
}

/// Process-local store, used by tests and one-shot callers.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    inner: Mutex<Option<Credentials>>,
}

impl MemoryCredentialStore {
    pub fn with(credentials: Credentials) -> Self {
        Self {
            inner: Mutex::new(Some(credentials)),
        }
    }

    pub fn snapshot(&self) -> Option<Credentials> {
        self.inner.lock().ok().and_then(|guard| guard.clone())
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn load_credentials(&self) -> anyhow::Result<Option<Credentials>> {
        let guard = self
            .inner
            .lock()
            .map_err(|_| anyhow::anyhow!("credential store lock poisoned"))?;
        Ok(guard.clone())
    }

    fn save_credentials(&self, credentials: &Credentials) -> anyhow::Result<()> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|_| anyhow::anyhow!("credential store lock poisoned"))?;
        *guard = Some(credentials.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemoryCredentialStore::default();
        assert!(store.load_credentials().unwrap().is_none());

        let creds = Credentials {
            access_token: "a".into(),
            refresh_token: "r".into(),
            expires_in: 60,
            expires_at: 100,
        };
        store.save_credentials(&creds).unwrap();
        assert_eq!(store.load_credentials().unwrap(), Some(creds.clone()));
        assert_eq!(store.snapshot(), Some(creds));
    }
}
