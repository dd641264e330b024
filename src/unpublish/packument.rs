//! The registry's document for a package (packument)

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Tag that must always point at a published version
pub const LATEST_TAG: &str = "latest";

/// A package document as returned by `GET /{name}?write=true`
///
/// Only the fields the unpublish workflow touches are typed; everything else
/// is kept in `other` and written back unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Packument {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Revision token for optimistic concurrency
    #[serde(rename = "_rev", default, skip_serializing_if = "Option::is_none")]
    pub rev: Option<String>,

    #[serde(default)]
    pub versions: IndexMap<String, VersionRecord>,

    #[serde(rename = "dist-tags", default)]
    pub dist_tags: IndexMap<String, String>,

    #[serde(rename = "_revisions", default, skip_serializing_if = "Option::is_none")]
    pub revisions: Option<Value>,

    #[serde(rename = "_attachments", default, skip_serializing_if = "Option::is_none")]
    pub attachments: Option<Value>,

    #[serde(flatten)]
    pub other: Map<String, Value>,
}

impl Packument {
    /// Name to use in messages, falling back to `fallback` when `_id` is absent
    pub fn display_id<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.id.as_deref().unwrap_or(fallback)
    }

    /// Tarball location of a published version
    pub fn tarball_of(&self, version: &str) -> Option<&str> {
        self.versions.get(version)?.dist.as_ref()?.tarball.as_deref()
    }
}

/// One entry of `versions`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VersionRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dist: Option<Dist>,

    #[serde(flatten)]
    pub other: Map<String, Value>,
}

/// Distribution descriptor of a version
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dist {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tarball: Option<String>,

    #[serde(flatten)]
    pub other: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Value {
        json!({
            "_id": "lodash",
            "_rev": "12-abc",
            "name": "lodash",
            "dist-tags": { "latest": "4.17.21", "next": "5.0.0-beta.1" },
            "versions": {
                "4.17.21": {
                    "name": "lodash",
                    "version": "4.17.21",
                    "dist": {
                        "tarball": "https://registry.npmjs.org/lodash/-/lodash-4.17.21.tgz",
                        "shasum": "abc"
                    }
                },
                "5.0.0-beta.1": { "name": "lodash", "version": "5.0.0-beta.1" }
            },
            "time": { "modified": "2024-01-01T00:00:00.000Z" },
            "_attachments": {}
        })
    }

    #[test]
    fn deserializes_typed_fields() {
        let packument: Packument = serde_json::from_value(sample()).unwrap();

        assert_eq!(packument.id.as_deref(), Some("lodash"));
        assert_eq!(packument.rev.as_deref(), Some("12-abc"));
        assert_eq!(
            packument.dist_tags.get(LATEST_TAG).map(String::as_str),
            Some("4.17.21")
        );
        assert_eq!(
            packument.tarball_of("4.17.21"),
            Some("https://registry.npmjs.org/lodash/-/lodash-4.17.21.tgz")
        );
        assert_eq!(packument.tarball_of("5.0.0-beta.1"), None);
        assert_eq!(packument.tarball_of("1.0.0"), None);
        assert_eq!(packument.attachments, Some(json!({})));
    }

    #[test]
    fn serialization_keeps_unknown_fields() {
        let packument: Packument = serde_json::from_value(sample()).unwrap();

        let value = serde_json::to_value(&packument).unwrap();

        assert_eq!(value, sample());
    }

    #[test]
    fn preserves_version_order() {
        let packument: Packument = serde_json::from_str(
            r#"{"versions": {"2.0.0": {}, "1.0.0": {}, "1.5.0": {}}}"#,
        )
        .unwrap();

        let keys: Vec<&str> = packument.versions.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["2.0.0", "1.0.0", "1.5.0"]);
    }

    #[test]
    fn missing_fields_default_to_empty() {
        let packument: Packument = serde_json::from_str("{}").unwrap();

        assert_eq!(packument, Packument::default());
    }
}
