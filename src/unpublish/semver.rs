use std::cmp::Ordering;

use semver::Version;

/// Parse a version string loosely.
///
/// Surrounding whitespace and a leading `v` or `=` are ignored, and partial
/// versions are padded with zeros.
///
/// Examples:
/// - "v1.2.3" -> Version(1, 2, 3)
/// - "=1.2.3" -> Version(1, 2, 3)
/// - "1" -> Version(1, 0, 0)
/// - "1.2" -> Version(1, 2, 0)
pub fn parse_loose(version: &str) -> Option<Version> {
    let trimmed = version.trim();
    let trimmed = trimmed
        .strip_prefix('=')
        .unwrap_or(trimmed)
        .trim_start();
    let trimmed = trimmed
        .strip_prefix(['v', 'V'])
        .unwrap_or(trimmed);

    if let Ok(parsed) = Version::parse(trimmed) {
        return Some(parsed);
    }

    let parts: Vec<&str> = trimmed.split('.').collect();
    let normalized = match parts.len() {
        1 => format!("{}.0.0", parts[0]),
        2 => format!("{}.{}.0", parts[0], parts[1]),
        _ => return None,
    };
    Version::parse(&normalized).ok()
}

/// Semver precedence: build metadata does not participate
fn cmp_precedence(a: &Version, b: &Version) -> Ordering {
    (a.major, a.minor, a.patch, &a.pre).cmp(&(b.major, b.minor, b.patch, &b.pre))
}

/// Find the highest version by semver precedence
///
/// Versions that do not parse are skipped. When none parse, the last version
/// in iteration order is returned so a non-empty input always yields a value.
pub fn max_version<'a, I>(versions: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut last = None;
    let mut best: Option<(&'a str, Version)> = None;

    for version in versions {
        last = Some(version);
        let Some(parsed) = parse_loose(version) else {
            continue;
        };
        let is_higher = best
            .as_ref()
            .is_none_or(|(_, current)| cmp_precedence(&parsed, current) != Ordering::Less);
        if is_higher {
            best = Some((version, parsed));
        }
    }

    best.map(|(version, _)| version).or(last)
}
