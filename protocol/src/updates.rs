//! Release update checks.
//!
//! Oxyra does not poll anyone's DNS for new releases, so [`check_updates`]
//! always answers [`UpdateStatus::NoUpdate`] without touching the network.
//! [`update_url`] still builds download links the way release tooling
//! expects them.

use serde::{Deserialize, Serialize};

/// Result of an update check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateStatus {
    /// Running the latest release (or checking is disabled).
    NoUpdate,
    /// A newer release exists.
    Available {
        /// Release version string.
        version: String,
        /// Expected hash of the release archive.
        hash: String,
    },
}

/// Where release archives live and what they are called.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateConfig {
    /// Base URL for links shown to a human.
    pub user_base_url: String,
    /// Base URL for automated fetches.
    pub auto_base_url: String,
    /// Archive extension, leading dot included.
    pub extension: String,
}

impl Default for UpdateConfig {
    fn default() -> Self {
        Self {
            user_base_url: "https://downloads.getmonero.org/".into(),
            auto_base_url: "https://updates.getmonero.org/".into(),
            extension: ".tar.bz2".into(),
        }
    }
}

impl UpdateConfig {
    /// Defaults with the archive extension the current platform ships.
    ///
    /// Windows installers are `.exe` (buildtag `install-*`), other Windows
    /// binaries `.zip`; the macOS GUI is a `.dmg`. Source tarballs are
    /// `.tar.bz2` everywhere.
    pub fn native(software: &str, buildtag: &str) -> Self {
        let extension = if cfg!(windows) {
            if buildtag.starts_with("source") {
                ".tar.bz2"
            } else if buildtag.starts_with("install-") {
                ".exe"
            } else {
                ".zip"
            }
        } else if cfg!(target_os = "macos") && software.starts_with("monero-gui") {
            ".dmg"
        } else {
            ".tar.bz2"
        };
        Self {
            extension: extension.into(),
            ..Self::default()
        }
    }
}

/// Always [`UpdateStatus::NoUpdate`]. No network I/O.
pub fn check_updates(software: &str, buildtag: &str) -> UpdateStatus {
    tracing::debug!(software, buildtag, "update checking is disabled");
    UpdateStatus::NoUpdate
}

/// `base + [subdir/] + software-buildtag-vversion + extension`.
///
/// `user` picks the human-facing base URL over the automated one.
pub fn update_url(
    config: &UpdateConfig,
    software: &str,
    subdir: &str,
    buildtag: &str,
    version: &str,
    user: bool,
) -> String {
    let base = if user {
        &config.user_base_url
    } else {
        &config.auto_base_url
    };
    let mut url = base.clone();
    if !subdir.is_empty() {
        url.push_str(subdir);
        url.push('/');
    }
    url.push_str(&format!("{software}-{buildtag}-v{version}{}", config.extension));
    url
}
