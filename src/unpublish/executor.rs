//! Applies a [`MutationPlan`] to the registry

use tracing::info;

use crate::unpublish::cleanup::delete_orphaned_tarball;
use crate::unpublish::error::UnpublishError;
use crate::unpublish::mutation::MutationPlan;
use crate::unpublish::otp::OtpSession;
use crate::unpublish::packument::Packument;
use crate::unpublish::registry::RegistryClient;

/// What the workflow ended up doing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The package document was deleted
    PackageRemoved,
    /// One version was removed; `tarball_deleted` tells whether its tarball went too
    VersionRemoved { tarball_deleted: bool },
    /// The targeted version was never published
    NotPublished,
    /// The package does not exist or is not visible
    NotVisible,
}

/// Issues the writes for a plan, keyed by the revision the plan was computed from
pub struct WriteExecutor<'a> {
    registry: &'a dyn RegistryClient,
    session: OtpSession<'a>,
}

impl<'a> WriteExecutor<'a> {
    pub fn new(registry: &'a dyn RegistryClient, session: OtpSession<'a>) -> Self {
        Self { registry, session }
    }

    /// Apply `plan`, which was computed from `packument`
    pub async fn apply(
        &mut self,
        package_name: &str,
        plan: MutationPlan,
        packument: &Packument,
    ) -> Result<Outcome, UnpublishError> {
        let registry = self.registry;

        match plan {
            MutationPlan::NoOp { reason } => {
                info!("nothing to do for {}: {:?}", package_name, reason);
                Ok(Outcome::NotPublished)
            }
            MutationPlan::DeleteWholePackage => {
                let rev = revision_of(packument, package_name)?;
                self.session
                    .write(|otp| registry.delete_package(package_name, rev, otp))
                    .await?;
                Ok(Outcome::PackageRemoved)
            }
            MutationPlan::RemoveVersion {
                updated_packument,
                tarball_to_delete,
            } => {
                let rev = revision_of(packument, package_name)?;
                self.session
                    .write(|otp| registry.put_packument(package_name, rev, &updated_packument, otp))
                    .await?;

                let tarball_deleted = match tarball_to_delete {
                    Some(tarball) => {
                        delete_orphaned_tarball(registry, &mut self.session, package_name, &tarball)
                            .await?;
                        true
                    }
                    None => false,
                };
                Ok(Outcome::VersionRemoved { tarball_deleted })
            }
        }
    }
}

/// Revision token a write must carry
pub(crate) fn revision_of<'p>(
    packument: &'p Packument,
    package_name: &str,
) -> Result<&'p str, UnpublishError> {
    packument
        .rev
        .as_deref()
        .ok_or_else(|| UnpublishError::Integrity(packument.display_id(package_name).to_string()))
}
