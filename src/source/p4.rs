use async_trait::async_trait;
use thiserror::Error;
use tokio::process::Command;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to invoke '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{command}' exited with {status}: {stderr}")]
    NonZeroExit {
        command: String,
        status: std::process::ExitStatus,
        stderr: String,
    },
}

/// Upstream change-log source.
///
/// `since_exclusive` is the current watermark; implementations return raw
/// text covering changes strictly above it, at most `max_count` of them,
/// newest first. An empty string means no new changes.
#[async_trait]
pub trait ChangeSource: Send + Sync {
    async fn fetch(&self, since_exclusive: u64, max_count: u32) -> Result<String, SourceError>;
}

/// Fetches submitted changelists by shelling out to the `p4` client.
pub struct P4ChangeSource {
    binary: String,
    depot: String,
}

impl P4ChangeSource {
    pub fn new(binary: impl Into<String>, depot: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            depot: depot.into(),
        }
    }
}

#[async_trait]
impl ChangeSource for P4ChangeSource {
    async fn fetch(&self, since_exclusive: u64, max_count: u32) -> Result<String, SourceError> {
        let command = format!(
            "{} changes -t -m {} -s submitted -e {} -l {}",
            self.binary,
            max_count,
            since_exclusive + 1,
            self.depot
        );

        let output = Command::new(&self.binary)
            .arg("changes")
            .arg("-t")
            .args(["-m", &max_count.to_string()])
            .args(["-s", "submitted"])
            .args(["-e", &(since_exclusive + 1).to_string()])
            .arg("-l")
            .arg(&self.depot)
            .output()
            .await
            .map_err(|source| SourceError::Spawn {
                command: command.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(SourceError::NonZeroExit {
                command,
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        // Legacy servers emit ISO-8859-1 description bytes; decode
        // permissively instead of failing the batch.
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
