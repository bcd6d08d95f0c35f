//! Fetch artifacts over HTTP(S)
//!
//! The URL is built from a template with `{id}`, `{version}` and `{name}`
//! placeholders, e.g. `https://mirror.example/{id}/{version}/{name}.tgz`.

use super::{ArtifactFetcher, OperationContext, Staging};
use crate::cache::Identity;
use crate::error::{StashError, StashResult};
use async_trait::async_trait;
use std::fs::File;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

/// Downloads artifacts with a blocking `ureq` agent on the blocking pool
#[derive(Clone)]
pub struct HttpFetcher {
    url_template: String,
    agent: ureq::Agent,
}

impl HttpFetcher {
    /// Create a fetcher with a global per-request timeout
    pub fn new(url_template: String, timeout_secs: u64) -> Self {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(timeout_secs)))
            .build()
            .into();

        Self {
            url_template,
            agent,
        }
    }

    /// Expand the URL template for an identity
    pub fn url_for(&self, identity: &Identity) -> String {
        self.url_template
            .replace("{id}", &identity.package_id)
            .replace("{version}", &identity.version.to_string())
            .replace("{name}", &identity.file_name())
    }
}

/// Stream the response body for `url` into `dest`, returning the byte count
fn download_to(agent: &ureq::Agent, url: &str, dest: &Path) -> StashResult<u64> {
    let mut response = agent.get(url).call().map_err(|e| match e {
        ureq::Error::StatusCode(404) => StashError::ArtifactNotFound(url.to_string()),
        other => StashError::http(url, other.to_string()),
    })?;

    let mut file = File::create(dest)
        .map_err(|e| StashError::io(format!("creating {}", dest.display()), e))?;
    let mut reader = response.body_mut().as_reader();
    let bytes =
        std::io::copy(&mut reader, &mut file).map_err(|e| StashError::http(url, e.to_string()))?;
    file.sync_all()
        .map_err(|e| StashError::io(format!("flushing {}", dest.display()), e))?;

    Ok(bytes)
}

#[async_trait]
impl ArtifactFetcher for HttpFetcher {
    async fn fetch(
        &self,
        identity: &Identity,
        target: &Path,
        ctx: &OperationContext,
    ) -> StashResult<()> {
        let url = self.url_for(identity);
        debug!(operation = %ctx.id, label = %ctx.label, "GET {}", url);

        let staging = Staging::prepare(target).await?;
        let agent = self.agent.clone();
        let dest = staging.path().to_path_buf();
        let task_url = url.clone();

        let result = tokio::task::spawn_blocking(move || download_to(&agent, &task_url, &dest))
            .await
            .map_err(|e| StashError::FetchTask(e.to_string()))
            .and_then(|r| r);

        match result {
            Ok(bytes) => {
                staging.commit().await?;
                info!(operation = %ctx.id, "Downloaded {} ({} bytes)", identity, bytes);
                Ok(())
            }
            Err(e) => {
                staging.discard().await;
                Err(e)
            }
        }
    }

    fn source_name(&self) -> &'static str {
        "http"
    }
}
