use std::path::PathBuf;

use {
    anyhow::Context,
    serde::Deserialize,
    tempo_oauth::{CredentialStore, Credentials},
    toml_edit::{DocumentMut, Item},
    tracing::info,
};

/// Keeps the Tempo credentials in the `[credentials]` table of the config file.
///
/// Saving rewrites only that table; comments and the other sections of the
/// file are left as the user wrote them.
#[derive(Debug, Clone)]
pub struct ConfigFileStore {
    path: PathBuf,
}

#[derive(Deserialize)]
struct CredentialsOnly {
    #[serde(default)]
    credentials: Option<Credentials>,
}

impl ConfigFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CredentialStore for ConfigFileStore {
    fn load_credentials(&self) -> anyhow::Result<Option<Credentials>> {
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("could not read {}", self.path.display()))?;
        let parsed: CredentialsOnly =
            toml::from_str(&content).context("error parsing configuration file")?;
        Ok(parsed.credentials.filter(|c| !c.is_empty()))
    }

    fn save_credentials(&self, credentials: &Credentials) -> anyhow::Result<()> {
        let content = std::fs::read_to_string(&self.path).with_context(|| {
            format!(
                "there was an error opening the configuration file {} for writing",
                self.path.display()
            )
        })?;
        let mut doc: DocumentMut = content
            .parse()
            .context("error parsing configuration file")?;

        let table: DocumentMut = toml::to_string(credentials)
            .context("error encoding credentials")?
            .parse()
            .context("error encoding credentials")?;
        doc["credentials"] = Item::Table(table.as_table().clone());

        std::fs::write(&self.path, doc.to_string()).with_context(|| {
            format!(
                "there was an error writing to the configuration file {}",
                self.path.display()
            )
        })?;
        info!(path = %self.path.display(), "credentials saved");
        Ok(())
    }
}
