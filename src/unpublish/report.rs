//! Status line printed after the workflow finishes

use std::io::Write;

use crate::unpublish::spec::PackageSpec;

/// `- name` or `- name@version`
pub fn status_line(spec: &PackageSpec) -> String {
    format!("- {}", spec)
}

/// Write the status line for `spec` unless output is suppressed
pub fn report<W: Write>(out: &mut W, spec: &PackageSpec, suppressed: bool) -> std::io::Result<()> {
    if suppressed {
        return Ok(());
    }
    writeln!(out, "{}", status_line(spec))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(PackageSpec::new("lodash", ""), "- lodash")]
    #[case(PackageSpec::new("lodash", "4.17.21"), "- lodash@4.17.21")]
    #[case(PackageSpec::new("@types/node", "20.0.0"), "- @types/node@20.0.0")]
    fn status_line_names_package_and_version(#[case] spec: PackageSpec, #[case] expected: &str) {
        assert_eq!(status_line(&spec), expected);
    }

    #[test]
    fn report_writes_single_line() {
        let mut out = Vec::new();

        report(&mut out, &PackageSpec::new("pkg", "1.0.0"), false).unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), "- pkg@1.0.0\n");
    }

    #[test]
    fn report_writes_nothing_when_suppressed() {
        let mut out = Vec::new();

        report(&mut out, &PackageSpec::new("pkg", "1.0.0"), true).unwrap();

        assert!(out.is_empty());
    }
}
