//! Resolves the command argument into the package and version to unpublish

use std::path::{Component, Path, PathBuf};

use tracing::debug;

use crate::unpublish::error::UnpublishError;
use crate::unpublish::manifest::ManifestReader;
use crate::unpublish::spec::PackageSpec;

/// What to unpublish, after the manifest fallback has been applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnpublishTarget {
    pub spec: PackageSpec,
    /// `publishConfig.registry` of the local manifest, when it was used
    pub registry_override: Option<String>,
}

impl UnpublishTarget {
    /// Version to remove, empty when the whole package goes
    pub fn version(&self) -> &str {
        &self.spec.raw_version
    }
}

/// Turn the positional arguments into an [`UnpublishTarget`].
///
/// # Arguments
/// * `args` - Positional arguments, at most one `[@scope/]name[@version]`
/// * `force` - Allows removing every version of a package
/// * `project_dir` - Directory whose package.json is the fallback target
/// * `manifests` - Reads that package.json
pub fn resolve_target(
    args: &[String],
    force: bool,
    project_dir: &Path,
    manifests: &dyn ManifestReader,
) -> Result<UnpublishTarget, UnpublishError> {
    if args.len() > 1 {
        return Err(UnpublishError::usage(format!(
            "Expected at most one package, got {}",
            args.len()
        )));
    }

    let explicit = args.first().map(|arg| PackageSpec::parse(arg));
    debug!("explicit spec: {:?}", explicit);

    if !explicit.as_ref().is_some_and(PackageSpec::has_version) && !force {
        return Err(UnpublishError::usage(
            "Refusing to delete entire project.\nRun with --force to do this.",
        ));
    }

    let target = match explicit {
        Some(spec) if spec.has_version() || !resolves_to(project_dir, &spec.name) => {
            UnpublishTarget {
                spec,
                registry_override: None,
            }
        }
        explicit => match manifests.read_manifest(project_dir)? {
            Some(manifest) => {
                debug!("using local manifest: {:?}", manifest);
                UnpublishTarget {
                    spec: PackageSpec::new(
                        manifest.name.unwrap_or_default(),
                        manifest.version.unwrap_or_default(),
                    ),
                    registry_override: manifest.publish_config.and_then(|c| c.registry),
                }
            }
            None => match explicit {
                Some(spec) => UnpublishTarget {
                    spec,
                    registry_override: None,
                },
                None => {
                    return Err(UnpublishError::usage(format!(
                        "No package.json found in {}",
                        project_dir.display()
                    )));
                }
            },
        },
    };

    target.spec.validate().map_err(UnpublishError::Usage)?;

    Ok(target)
}

/// Whether `name`, read as a path relative to `project_dir`, is the project itself
fn resolves_to(project_dir: &Path, name: &str) -> bool {
    !name.is_empty() && normalize(&project_dir.join(name)) == normalize(project_dir)
}

fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }
    normalized
}
