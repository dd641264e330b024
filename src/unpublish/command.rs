//! The unpublish workflow: resolve, fetch, decide, write, clean up, report

use std::io::Write;
use std::path::Path;

use tracing::info;

use crate::config::UnpublishConfig;
use crate::unpublish::error::{RegistryError, UnpublishError};
use crate::unpublish::executor::{Outcome, WriteExecutor};
use crate::unpublish::manifest::ManifestReader;
use crate::unpublish::mutation::compute_mutation;
use crate::unpublish::otp::{OtpProvider, OtpSession};
use crate::unpublish::registry::RegistryClient;
use crate::unpublish::report::report;
use crate::unpublish::resolver::resolve_target;
use crate::unpublish::spec::PackageSpec;

/// Removes a package or one of its versions from a registry
pub struct Unpublisher<'a> {
    registry: &'a dyn RegistryClient,
    otp: &'a dyn OtpProvider,
}

impl<'a> Unpublisher<'a> {
    pub fn new(registry: &'a dyn RegistryClient, otp: &'a dyn OtpProvider) -> Self {
        Self { registry, otp }
    }

    /// Unpublish `spec`; an empty version removes the whole package.
    ///
    /// `initial_otp` is sent with the first write when given.
    pub async fn unpublish(
        &self,
        spec: &PackageSpec,
        initial_otp: Option<String>,
    ) -> Result<Outcome, UnpublishError> {
        let packument = match self.registry.fetch_packument(&spec.name).await {
            Ok(packument) => packument,
            Err(RegistryError::NotFound(_)) => {
                info!("{} is not published or visible.", spec);
                return Ok(Outcome::NotVisible);
            }
            Err(e) => return Err(e.into()),
        };

        let plan = compute_mutation(&packument, &spec.raw_version);

        let session = OtpSession::new(self.otp, initial_otp);
        WriteExecutor::new(self.registry, session)
            .apply(&spec.name, plan, &packument)
            .await
    }
}

/// Run the whole command.
///
/// # Arguments
/// * `args` - Positional arguments
/// * `config` - Loaded configuration
/// * `project_dir` - Directory whose package.json is the fallback target
/// * `manifests` - Reads that package.json
/// * `connect` - Builds the registry client once the final registry URL is known
/// * `otp` - Source of one-time passwords
/// * `out` - Receives the status line
pub async fn run<C, R, W>(
    args: &[String],
    config: UnpublishConfig,
    project_dir: &Path,
    manifests: &dyn ManifestReader,
    connect: C,
    otp: &dyn OtpProvider,
    out: &mut W,
) -> Result<Outcome, UnpublishError>
where
    C: FnOnce(&UnpublishConfig) -> R,
    R: RegistryClient,
    W: Write,
{
    let target = resolve_target(args, config.force, project_dir, manifests)?;
    let config = config.with_registry_override(target.registry_override.clone());

    let registry = connect(&config);
    let outcome = Unpublisher::new(&registry, otp)
        .unpublish(&target.spec, config.otp.clone())
        .await?;

    report(out, &target.spec, config.output_suppressed())?;
    Ok(outcome)
}
