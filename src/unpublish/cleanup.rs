//! Removes the tarball of a version after its entry left the packument

use reqwest::Url;
use tracing::{debug, info};

use crate::unpublish::error::UnpublishError;
use crate::unpublish::executor::revision_of;
use crate::unpublish::otp::OtpSession;
use crate::unpublish::registry::RegistryClient;

/// Delete the tarball at `tarball_url`.
///
/// The packument write that orphaned the tarball changed the revision, so the
/// packument is fetched again and the delete is keyed by that fresh revision.
pub async fn delete_orphaned_tarball(
    registry: &dyn RegistryClient,
    session: &mut OtpSession<'_>,
    package_name: &str,
    tarball_url: &str,
) -> Result<(), UnpublishError> {
    let current = registry.fetch_packument(package_name).await?;
    let rev = revision_of(&current, package_name)?;

    let path = tarball_path(tarball_url);
    debug!("deleting tarball {} at revision {}", path, rev);

    session
        .write(|otp| registry.delete_tarball(&path, rev, otp))
        .await?;

    info!("removed tarball {}", path);
    Ok(())
}

/// Path component of a tarball URL; input that is not a URL is used as is
fn tarball_path(tarball_url: &str) -> String {
    match Url::parse(tarball_url) {
        Ok(url) => url.path().to_string(),
        Err(_) => tarball_url.to_string(),
    }
}
