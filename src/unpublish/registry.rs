//! Registry trait for reading and writing package documents

#[cfg(test)]
use mockall::automock;

use crate::unpublish::error::RegistryError;
use crate::unpublish::packument::Packument;

/// Write-capable access to a package registry
///
/// Every write is keyed by the revision token of the document it was derived
/// from; the registry rejects stale revisions with [`RegistryError::Conflict`].
/// `otp` carries a one-time password when the registry demanded one.
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait RegistryClient: Send + Sync {
    /// Fetches the packument with write intent (`?write=true`)
    ///
    /// # Returns
    /// * `Ok(Packument)` - The full document, including `_rev`
    /// * `Err(RegistryError::NotFound)` - The package does not exist or is not visible
    async fn fetch_packument(&self, package_name: &str) -> Result<Packument, RegistryError>;

    /// Deletes the whole package document
    async fn delete_package(
        &self,
        package_name: &str,
        rev: &str,
        otp: Option<String>,
    ) -> Result<(), RegistryError>;

    /// Replaces the package document
    async fn put_packument(
        &self,
        package_name: &str,
        rev: &str,
        packument: &Packument,
        otp: Option<String>,
    ) -> Result<(), RegistryError>;

    /// Deletes a tarball, addressed by the path component of its URL
    async fn delete_tarball(
        &self,
        tarball_path: &str,
        rev: &str,
        otp: Option<String>,
    ) -> Result<(), RegistryError>;
}
