//! Logical path resolution.
//!
//! Paths are slash-delimited strings relative to a store root. They never touch
//! the network: resolution only normalizes the string into the ordered list of
//! folder and file names that the navigator walks.

use std::fmt;
use std::ops::Deref;

/// Normalized path components, ordered from root to leaf.
///
/// No component is empty, `.` or `..`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct PathSegments(Vec<String>);

impl PathSegments {
    /// Create an empty segment list (the root itself).
    pub fn new() -> Self {
        Self::default()
    }

    /// Split into the containing folders and the leaf name.
    ///
    /// Returns `None` for the root.
    pub fn split_leaf(&self) -> Option<(&[String], &str)> {
        self.0
            .split_last()
            .map(|(leaf, parents)| (parents, leaf.as_str()))
    }

    /// The `/`-joined display form, without a leading slash.
    pub fn join(&self) -> String {
        self.0.join("/")
    }

    /// Consume into the owned component list.
    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

impl Deref for PathSegments {
    type Target = [String];

    fn deref(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for PathSegments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.join())
    }
}

impl From<&str> for PathSegments {
    fn from(path: &str) -> Self {
        resolve(path)
    }
}

/// Resolve a slash-delimited path into its normalized segments.
///
/// Empty tokens and `.` are dropped, `..` removes the previously resolved
/// segment. A `..` that would climb above the root is ignored, so the
/// function is total over any input.
///
/// ```
/// use cloudfs::path::resolve;
///
/// assert_eq!(resolve("a/./b/../c").join(), "a/c");
/// assert_eq!(resolve("/a/b/").join(), "a/b");
/// assert!(resolve("../..").is_empty());
/// ```
pub fn resolve(path: &str) -> PathSegments {
    let mut names: Vec<String> = Vec::new();
    for part in path.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                names.pop();
            }
            name => names.push(name.to_string()),
        }
    }
    PathSegments(names)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(path: &str) -> Vec<String> {
        resolve(path).into_vec()
    }

    #[test]
    fn test_resolve_simple() {
        assert_eq!(names("docs/notes/todo.txt"), vec!["docs", "notes", "todo.txt"]);
    }

    #[test]
    fn test_resolve_dot_and_dotdot() {
        assert_eq!(names("a/./b/../c"), vec!["a", "c"]);
    }

    #[test]
    fn test_resolve_leading_and_trailing_slash() {
        assert_eq!(names("/a/b/"), vec!["a", "b"]);
    }

    #[test]
    fn test_resolve_double_slash() {
        assert_eq!(names("a//b"), vec!["a", "b"]);
    }

    #[test]
    fn test_resolve_empty_and_root() {
        assert!(resolve("").is_empty());
        assert!(resolve("/").is_empty());
        assert!(resolve("./.").is_empty());
    }

    #[test]
    fn test_resolve_dotdot_at_root_is_ignored() {
        assert!(resolve("..").is_empty());
        assert_eq!(names("../a"), vec!["a"]);
        assert_eq!(names("a/../../b"), vec!["b"]);
    }

    #[test]
    fn test_resolve_matches_stack_simulation() {
        let cases = [
            "x/y/z/../../w",
            "/one/./two/three/..",
            "p/q/../r/./s/",
            "a/b/c/../../../d",
        ];
        for case in cases {
            let mut stack: Vec<&str> = Vec::new();
            for token in case.split('/') {
                match token {
                    "" | "." => {}
                    ".." => {
                        stack.pop();
                    }
                    t => stack.push(t),
                }
            }
            assert_eq!(names(case), stack, "path {case}");
        }
    }

    #[test]
    fn test_resolve_keeps_dotted_names() {
        assert_eq!(names(".hidden/...and/file..txt"), vec![".hidden", "...and", "file..txt"]);
    }

    #[test]
    fn test_split_leaf() {
        let segments = resolve("dir/sub/a.txt");
        let (parents, leaf) = segments.split_leaf().unwrap();
        assert_eq!(parents, ["dir".to_string(), "sub".to_string()]);
        assert_eq!(leaf, "a.txt");

        assert!(resolve("/").split_leaf().is_none());
    }

    #[test]
    fn test_display_join() {
        assert_eq!(resolve("/a/./b/").to_string(), "a/b");
        assert_eq!(PathSegments::new().to_string(), "");
    }
}
