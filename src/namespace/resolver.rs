//! Path resolver
//!
//! Splits slash-delimited paths into segments and walks them through the tree.
//!
//! The walk itself only borrows nodes. Read operations turn the final node
//! into an owned snapshot with [`resolve`]; mutations take the absolute
//! location of the target instead and look it up mutably in the live tree.

use crate::error::NamespaceError;
use crate::namespace::node::{Directory, File, join_child};

/// Outcome of resolving a path: an owned, disconnected value.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved {
    File(File),
    Directory(Directory),
}

/// Borrowed form of [`Resolved`] produced while walking.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Target<'a> {
    File(&'a File),
    Directory(&'a Directory),
}

impl Target<'_> {
    pub(crate) fn into_resolved(self) -> Resolved {
        match self {
            Target::File(file) => Resolved::File(file.clone()),
            Target::Directory(directory) => Resolved::Directory(directory.clone()),
        }
    }
}

/// Splits a path string on `/`. An empty segment stands for the root.
pub fn split(path: &str) -> Vec<&str> {
    path.split('/').collect()
}

/// Resolves `segments` starting at `start`, returning a snapshot.
///
/// `root` is the live tree: empty segments restart from it and `..` looks
/// the parent up in it.
pub fn resolve(
    root: &Directory,
    start: &Directory,
    segments: &[&str],
) -> Result<Resolved, NamespaceError> {
    walk(root, start, segments).map(Target::into_resolved)
}

pub(crate) fn walk<'a>(
    root: &'a Directory,
    start: &'a Directory,
    segments: &[&str],
) -> Result<Target<'a>, NamespaceError> {
    let mut current = start;

    for (index, segment) in segments.iter().enumerate() {
        match *segment {
            "" => current = root,
            "." => continue,
            ".." => {
                let parent = current
                    .parent_location()
                    .ok_or(NamespaceError::CannotAscendAboveRoot)?;
                current = root
                    .descend(parent)
                    .ok_or_else(|| NamespaceError::NotFound(parent_display(current)))?;
            }
            name => {
                if let Some(directory) = current.subdirectory(name) {
                    current = directory;
                } else if let Some(file) = current.file(name) {
                    if index == segments.len() - 1 {
                        return Ok(Target::File(file));
                    }
                    return Err(NamespaceError::WrongKind(format!(
                        "This is a file not a directory: {}",
                        file.display_path()
                    )));
                } else {
                    return Err(NamespaceError::NotFound(join_child(current, name)));
                }
            }
        }
    }

    Ok(Target::Directory(current))
}

fn parent_display(directory: &Directory) -> String {
    let mut location = directory.location();
    location.pop();
    format!("/{}", location.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::namespace::loader::{build, parse_document};

    fn tree() -> Directory {
        let document =
            parse_document("docs:\n  readme: 1\n  drafts:\n    plan: 3\ngeneral: 2\n").unwrap();
        build(&document, false).unwrap()
    }

    fn directory(resolved: Resolved) -> Directory {
        match resolved {
            Resolved::Directory(directory) => directory,
            Resolved::File(file) => panic!("expected a directory, got {:?}", file),
        }
    }

    #[test]
    fn test_split() {
        assert_eq!(split("a/b"), vec!["a", "b"]);
        assert_eq!(split("/a"), vec!["", "a"]);
        assert_eq!(split("/"), vec!["", ""]);
        assert_eq!(split(""), vec![""]);
    }

    #[test]
    fn test_leading_slash_is_absolute() {
        let root = tree();
        let drafts = root.descend(&["docs".to_string(), "drafts".to_string()]).unwrap();

        let from_root = resolve(&root, &root, &split("/docs")).unwrap();
        let from_drafts = resolve(&root, drafts, &split("/docs")).unwrap();
        assert_eq!(from_root, from_drafts);
        assert_eq!(directory(from_root).display_path(), "/docs");
    }

    #[test]
    fn test_dot_is_identity() {
        let root = tree();
        let docs = root.subdirectory("docs").unwrap();
        assert_eq!(directory(resolve(&root, docs, &["."]).unwrap()), *docs);
    }

    #[test]
    fn test_dot_dot_ascends() {
        let root = tree();
        let drafts = root.descend(&["docs".to_string(), "drafts".to_string()]).unwrap();

        let parent = directory(resolve(&root, drafts, &[".."]).unwrap());
        assert_eq!(parent.display_path(), "/docs");
        let top = directory(resolve(&root, drafts, &["..", ".."]).unwrap());
        assert!(top.is_root());
    }

    #[test]
    fn test_dot_dot_at_root_fails() {
        let root = tree();
        assert_eq!(
            resolve(&root, &root, &[".."]),
            Err(NamespaceError::CannotAscendAboveRoot)
        );
        assert_eq!(
            resolve(&root, &root, &split("/docs/../..")),
            Err(NamespaceError::CannotAscendAboveRoot)
        );
    }

    #[test]
    fn test_file_as_last_segment() {
        let root = tree();
        match resolve(&root, &root, &split("docs/readme")).unwrap() {
            Resolved::File(file) => {
                assert_eq!(file.name(), "readme");
                assert_eq!(file.reference(), 1);
            }
            other => panic!("expected a file, got {:?}", other),
        }
    }

    #[test]
    fn test_file_used_as_directory() {
        let root = tree();
        assert!(matches!(
            resolve(&root, &root, &split("general/x")),
            Err(NamespaceError::WrongKind(_))
        ));
        assert!(matches!(
            resolve(&root, &root, &split("general/")),
            Err(NamespaceError::WrongKind(_))
        ));
    }

    #[test]
    fn test_missing_segment() {
        let root = tree();
        assert_eq!(
            resolve(&root, &root, &split("docs/missing/readme")),
            Err(NamespaceError::NotFound("/docs/missing".into()))
        );
    }

    #[test]
    fn test_doubled_separator_restarts_at_root() {
        let root = tree();
        let docs = root.subdirectory("docs").unwrap();
        let resolved = directory(resolve(&root, docs, &split("drafts//docs/..")).unwrap());
        assert!(resolved.is_root());
    }
}
