//! Path-safety policy for line-mode file references.
//!
//! A reference is accepted only if every check in [`PATH_CHECKS`] passes,
//! evaluated in order. The first failing check is reported by name so a
//! rejection can be traced back to a single rule.
//!
//! Checks are lexical: nothing here touches the filesystem.

use std::path::{Component, Path, PathBuf};

use crate::error::CleanError;

/// Characters that are meaningful to a shell and never appear in a
/// reference we accept.
pub const SHELL_METACHARACTERS: &[char] = &['|', '&', ';', '`', '$', '<', '>'];

/// A single named path predicate. Returns `true` when the reference passes.
pub struct PathCheck {
    pub name: &'static str,
    pub passes: fn(raw: &str, normalized: &Path, cwd: &Path) -> bool,
}

/// The policy, in evaluation order.
pub const PATH_CHECKS: &[PathCheck] = &[
    PathCheck {
        name: "non-empty",
        passes: |raw, _, _| !raw.is_empty(),
    },
    PathCheck {
        name: "no-traversal",
        passes: |_, normalized, _| !normalized.to_string_lossy().contains(".."),
    },
    PathCheck {
        name: "within-working-dir",
        passes: |_, normalized, cwd| !normalized.is_absolute() || normalized.starts_with(cwd),
    },
    PathCheck {
        name: "no-shell-metacharacters",
        passes: |raw, _, _| !raw.contains(SHELL_METACHARACTERS),
    },
];

/// Validate `raw` against [`PATH_CHECKS`], relative to `cwd`.
pub fn check_path(raw: &str, cwd: &Path) -> Result<(), CleanError> {
    let normalized = normalize_lexically(Path::new(raw));

    match PATH_CHECKS
        .iter()
        .find(|check| !(check.passes)(raw, &normalized, cwd))
    {
        Some(check) => Err(CleanError::UnsafePath {
            path: raw.to_string(),
            check: check.name,
        }),
        None => Ok(()),
    }
}

/// Convenience wrapper: `true` if [`check_path`] accepts `raw`.
pub fn is_safe_path(raw: &str, cwd: &Path) -> bool {
    check_path(raw, cwd).is_ok()
}

/// Collapse `.` segments, duplicate separators, and `dir/..` pairs without
/// consulting the filesystem. Leading `..` segments that cannot be
/// collapsed are kept.
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out: Vec<Component<'_>> = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(component),
            },
            other => out.push(other),
        }
    }

    if out.is_empty() {
        return PathBuf::from(".");
    }
    out.iter().collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn cwd() -> PathBuf {
        if cfg!(windows) {
            PathBuf::from(r"C:\work\project")
        } else {
            PathBuf::from("/work/project")
        }
    }

    fn failed_check(raw: &str) -> Option<&'static str> {
        match check_path(raw, &cwd()) {
            Err(CleanError::UnsafePath { check, .. }) => Some(check),
            _ => None,
        }
    }

    #[test]
    fn accepts_plain_relative_files() {
        assert!(is_safe_path("notes.txt", &cwd()));
        assert!(is_safe_path("docs/readme.md", &cwd()));
        assert!(is_safe_path("./docs/readme.md", &cwd()));
    }

    #[test]
    fn rejects_empty() {
        assert_eq!(failed_check(""), Some("non-empty"));
    }

    #[test]
    fn rejects_escaping_traversal() {
        assert_eq!(failed_check("../secret.txt"), Some("no-traversal"));
        assert_eq!(failed_check("docs/../../secret.txt"), Some("no-traversal"));
    }

    #[test]
    fn collapsed_traversal_is_accepted() {
        // docs/../notes.txt normalizes to notes.txt
        assert!(is_safe_path("docs/../notes.txt", &cwd()));
    }

    #[test]
    fn double_dot_inside_a_name_is_rejected() {
        assert_eq!(failed_check("report..final.txt"), Some("no-traversal"));
    }

    #[test]
    fn rejects_absolute_outside_cwd() {
        let outside = if cfg!(windows) { r"C:\etc\passwd" } else { "/etc/passwd" };
        assert_eq!(failed_check(outside), Some("within-working-dir"));
    }

    #[test]
    fn accepts_absolute_inside_cwd() {
        let inside = cwd().join("notes.txt");
        assert!(is_safe_path(&inside.to_string_lossy(), &cwd()));
    }

    #[test]
    fn sibling_with_shared_prefix_is_outside() {
        let sibling = if cfg!(windows) {
            r"C:\work\project-other\a.txt"
        } else {
            "/work/project-other/a.txt"
        };
        assert_eq!(failed_check(sibling), Some("within-working-dir"));
    }

    #[test]
    fn rejects_shell_metacharacters() {
        for raw in ["a|b.txt", "a&b", "a;rm", "`x`", "$HOME", "in<put", "out>put"] {
            assert_eq!(failed_check(raw), Some("no-shell-metacharacters"), "{raw}");
        }
    }

    #[test]
    fn checks_run_in_order() {
        // Fails both traversal and metacharacter checks; traversal comes first.
        assert_eq!(failed_check("../a;b"), Some("no-traversal"));
    }

    #[test]
    fn normalize_lexically_collapses_segments() {
        assert_eq!(normalize_lexically(Path::new("a/./b/../c")), PathBuf::from("a/c"));
        assert_eq!(normalize_lexically(Path::new("a//b")), PathBuf::from("a/b"));
        assert_eq!(normalize_lexically(Path::new("../a")), PathBuf::from("../a"));
        assert_eq!(normalize_lexically(Path::new("a/..")), PathBuf::from("."));
    }
}
