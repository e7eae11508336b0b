//! Command-line and environment configuration

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use crate::model::InvitationData;

/// How the host treats audio that starts without a user gesture.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum AutoplayPolicy {
    /// Unsolicited playback starts normally
    Allow,
    /// Unsolicited playback is refused, like most browsers do
    #[default]
    Deny,
}

impl AutoplayPolicy {
    pub fn allows_autoplay(self) -> bool {
        matches!(self, AutoplayPolicy::Allow)
    }
}

#[derive(Parser, Debug, Clone)]
#[command(name = "invitation-rs", version, about = "Wedding invitation in your terminal")]
pub struct AppConfig {
    /// Invitation JSON file; the bundled sample is shown when omitted
    #[arg(long, env = "INVITATION_DATA")]
    pub data: Option<PathBuf>,

    /// Base directory for site-relative asset URLs such as `/audio/song.mp3`
    #[arg(long, env = "INVITATION_ASSETS", default_value = "public")]
    pub assets: PathBuf,

    #[arg(long, env = "INVITATION_AUTOPLAY_POLICY", value_enum, default_value = "deny")]
    pub autoplay_policy: AutoplayPolicy,

    /// Never open an audio output device
    #[arg(long)]
    pub no_audio: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data: None,
            assets: PathBuf::from("public"),
            autoplay_policy: AutoplayPolicy::Deny,
            no_audio: false,
        }
    }
}

impl AppConfig {
    /// Load the invitation this config points at.
    pub async fn load_invitation(&self) -> Result<InvitationData> {
        match &self.data {
            Some(path) => load_invitation_file(path).await,
            None => {
                tracing::info!("No invitation file given, using bundled sample");
                Ok(InvitationData::sample())
            }
        }
    }

    /// Resolve an asset URL from the invitation against the assets directory.
    ///
    /// Site-relative URLs (`/audio/x.mp3`) and bare relative paths are joined
    /// onto `assets`; `file://` URLs and absolute filesystem paths that exist
    /// are used as-is.
    pub fn resolve_asset(&self, url: &str) -> PathBuf {
        if let Some(stripped) = url.strip_prefix("file://") {
            return PathBuf::from(stripped);
        }
        let candidate = Path::new(url);
        if candidate.is_absolute() && candidate.exists() {
            return candidate.to_path_buf();
        }
        self.assets.join(url.trim_start_matches('/'))
    }
}

async fn load_invitation_file(path: &Path) -> Result<InvitationData> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading invitation file {}", path.display()))?;
    let data: InvitationData = serde_json::from_str(&raw)
        .with_context(|| format!("parsing invitation file {}", path.display()))?;
    tracing::info!(
        path = %path.display(),
        events = data.events.len(),
        images = data.gallery.images.len(),
        has_music = data.music.is_some(),
        "Invitation loaded"
    );
    Ok(data)
}
