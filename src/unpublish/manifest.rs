//! Local project manifest (package.json) reading

use std::io::ErrorKind;
use std::path::Path;

#[cfg(test)]
use mockall::automock;
use serde::Deserialize;
use tracing::debug;

use crate::unpublish::error::ManifestError;

const MANIFEST_FILE: &str = "package.json";

/// The parts of package.json that matter for unpublishing
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub name: Option<String>,
    pub version: Option<String>,
    pub publish_config: Option<PublishConfig>,
}

/// Registry overrides from `publishConfig`
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct PublishConfig {
    pub registry: Option<String>,
}

/// Trait for reading the manifest of a project directory
#[cfg_attr(test, automock)]
pub trait ManifestReader: Send + Sync {
    /// Read the manifest in `project_dir`
    ///
    /// # Returns
    /// * `Ok(Some(Manifest))` - The manifest was found and parsed
    /// * `Ok(None)` - There is no manifest in the directory
    /// * `Err(ManifestError)` - The manifest exists but could not be read
    fn read_manifest(&self, project_dir: &Path) -> Result<Option<Manifest>, ManifestError>;
}

/// Reads `package.json` from the filesystem
#[derive(Debug, Default, Clone, Copy)]
pub struct FsManifestReader;

impl ManifestReader for FsManifestReader {
    fn read_manifest(&self, project_dir: &Path) -> Result<Option<Manifest>, ManifestError> {
        let path = project_dir.join(MANIFEST_FILE);
        let path_display = path.display().to_string();

        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if matches!(e.kind(), ErrorKind::NotFound | ErrorKind::NotADirectory) => {
                debug!("No manifest at {}", path_display);
                return Ok(None);
            }
            Err(source) => {
                return Err(ManifestError::Io {
                    path: path_display,
                    source,
                });
            }
        };

        let manifest: Manifest =
            serde_json::from_str(&content).map_err(|source| ManifestError::Parse {
                path: path_display.clone(),
                source,
            })?;

        if manifest.name.as_deref().is_none_or(str::is_empty) {
            return Err(ManifestError::MissingName(path_display));
        }

        Ok(Some(manifest))
    }
}
