//! Package specifier parsing (`[@scope/]name[@version]`)

use std::sync::LazyLock;

use regex::Regex;

/// Characters allowed in a name segment of a published package.
///
/// Names from before the current registry rules may contain uppercase letters
/// and run past 214 characters; they stay valid targets for unpublish.
static NAME_SEGMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9\-_.!~*'()]+$").expect("package name pattern is valid")
});

const RESERVED_NAMES: &[&str] = &["node_modules", "favicon.ico"];

/// A package name with the raw version text that followed it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageSpec {
    /// Package name (e.g., "lodash", "@types/node")
    pub name: String,
    /// Raw version text after the `@`, empty when none was given
    pub raw_version: String,
}

impl PackageSpec {
    pub fn new(name: impl Into<String>, raw_version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            raw_version: raw_version.into(),
        }
    }

    /// Split user input into name and version.
    ///
    /// The version is kept verbatim; it is later looked up as an exact key in
    /// the packument, so ranges like `^1` never match a published version.
    pub fn parse(input: &str) -> Self {
        let input = input.trim();

        // Skip the scope marker so "@scope/name" is not split at index 0
        let search_from = if input.starts_with('@') {
            input.find('/').map_or(1, |slash| slash + 1)
        } else {
            0
        };

        match input[search_from..].find('@') {
            Some(at_pos) => {
                let split = search_from + at_pos;
                Self::new(&input[..split], input[split + 1..].trim())
            }
            None => Self::new(input, ""),
        }
    }

    /// Whether a version was given
    pub fn has_version(&self) -> bool {
        !self.raw_version.is_empty()
    }

    /// Check the name against the rules every published npm package meets
    pub fn validate(&self) -> Result<(), String> {
        let name = self.name.as_str();
        if name.is_empty() {
            return Err("package name must not be empty".to_string());
        }
        if name.trim() != name {
            return Err(format!("package name cannot contain leading or trailing spaces: {name}"));
        }
        if name.starts_with('.') || name.starts_with('_') {
            return Err(format!("package name cannot start with a period or underscore: {name}"));
        }
        if RESERVED_NAMES.contains(&name.to_lowercase().as_str()) {
            return Err(format!("{name} is a reserved name"));
        }

        let segments_valid = match name.strip_prefix('@') {
            Some(scoped) => scoped.split_once('/').is_some_and(|(scope, pkg)| {
                NAME_SEGMENT.is_match(scope) && NAME_SEGMENT.is_match(pkg)
            }),
            None => NAME_SEGMENT.is_match(name),
        };
        if !segments_valid {
            return Err(format!("invalid package name: {name}"));
        }
        Ok(())
    }
}

impl std::fmt::Display for PackageSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.has_version() {
            write!(f, "{}@{}", self.name, self.raw_version)
        } else {
            f.write_str(&self.name)
        }
    }
}

/// Encode package name for URL (handles scoped packages)
pub fn escape_name(name: &str) -> String {
    if name.starts_with('@') {
        // Scoped package: @scope/name -> @scope%2Fname
        name.replace('/', "%2F")
    } else {
        name.to_string()
    }
}
