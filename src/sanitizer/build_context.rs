//! Container build inputs derived from sanitized schema dumps.

use crate::config::ProjectLayout;
use crate::writer::write_atomic;
use std::collections::BTreeSet;
use std::path::PathBuf;
use tracing::info;

pub const REQUIREMENTS_FILE: &str = "requirements.txt";
pub const SERVER_CONF_FILE: &str = "tusk.conf";

/// Files rewritten by [`update_build_context`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildContextUpdate {
    pub requirements: Option<PathBuf>,
    pub server_conf: Option<PathBuf>,
}

/// Write the package list and preload configuration.
///
/// Empty sets leave the corresponding file untouched. These files belong to
/// the tool, so the lock marker is not consulted.
pub fn update_build_context(
    layout: &ProjectLayout,
    packages: &BTreeSet<String>,
    configs: &BTreeSet<String>,
) -> std::io::Result<BuildContextUpdate> {
    let dir = layout.build_context_dir();
    let mut update = BuildContextUpdate::default();

    if !packages.is_empty() {
        let path = dir.join(REQUIREMENTS_FILE);
        let mut content = packages.iter().cloned().collect::<Vec<_>>().join("\n");
        content.push('\n');
        write_atomic(&path, &content)?;
        info!("Updated {}", layout.display_path(&path));
        update.requirements = Some(path);
    }

    if !configs.is_empty() {
        let path = dir.join(SERVER_CONF_FILE);
        let libs = configs.iter().cloned().collect::<Vec<_>>().join(",");
        write_atomic(&path, &format!("shared_preload_libraries = '{}'\n", libs))?;
        info!("Updated {}", layout.display_path(&path));
        update.server_conf = Some(path);
    }

    Ok(update)
}
