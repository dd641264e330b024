//! Decides how a packument changes when a version is unpublished
//!
//! [`compute_mutation`] is a pure function over a packument snapshot: it never
//! touches the network and never modifies its input. The returned
//! [`MutationPlan`] is carried out by the executor.

use tracing::{debug, info};

use crate::unpublish::packument::{LATEST_TAG, Packument};
use crate::unpublish::semver::max_version;

/// Why nothing needs to change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoOpReason {
    /// The targeted version was never published
    NotPublished,
}

/// The change to apply to the registry
#[derive(Debug, Clone, PartialEq)]
pub enum MutationPlan {
    /// Remove the package document entirely
    DeleteWholePackage,
    /// Replace the document with one that no longer lists the version
    RemoveVersion {
        updated_packument: Box<Packument>,
        /// Tarball of the removed version, deleted after the replace succeeds
        tarball_to_delete: Option<String>,
    },
    /// Leave the registry untouched
    NoOp { reason: NoOpReason },
}

/// Compute the plan for removing `target_version` (or everything, when empty)
pub fn compute_mutation(packument: &Packument, target_version: &str) -> MutationPlan {
    if target_version.is_empty() {
        info!("No version specified, removing all");
        return MutationPlan::DeleteWholePackage;
    }

    let Some(removed) = packument.versions.get(target_version) else {
        info!("{}@{} not published", packument.display_id("package"), target_version);
        return MutationPlan::NoOp {
            reason: NoOpReason::NotPublished,
        };
    };

    let tarball_to_delete = packument.tarball_of(target_version).map(str::to_string);
    debug!("removing attachments for {:?}", removed.dist);

    if packument.versions.len() == 1 {
        info!("No versions remain, removing entire package");
        return MutationPlan::DeleteWholePackage;
    }

    let mut updated = packument.clone();
    updated.versions.shift_remove(target_version);

    let was_latest = updated
        .dist_tags
        .get(LATEST_TAG)
        .is_some_and(|latest| latest == target_version);

    updated.dist_tags.retain(|tag, version| {
        let keep = version != target_version;
        if !keep {
            debug!("removing dist-tag {} -> {}", tag, version);
        }
        keep
    });

    if was_latest {
        // Non-empty versions always yield a value
        if let Some(latest) = max_version(updated.versions.keys().map(String::as_str)) {
            debug!("moving dist-tag latest -> {}", latest);
            updated
                .dist_tags
                .insert(LATEST_TAG.to_string(), latest.to_string());
        }
    }

    updated.revisions = None;
    updated.attachments = None;

    MutationPlan::RemoveVersion {
        updated_packument: Box::new(updated),
        tarball_to_delete,
    }
}
