//! Module `node`
//!
//! Defines the `File` and `Directory` entities that make up the namespace tree.
//!
//! Subdirectories are held behind `Arc` and edited with `Arc::make_mut`, so a
//! cloned `Directory` is a structurally-shared snapshot: later edits to the
//! live tree copy the touched nodes instead of writing through the snapshot.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use crate::error::NamespaceError;

/// Opaque identifier a file points at (e.g. a messaging-channel id).
pub type ReferenceId = i64;

/// A leaf of the namespace carrying an external reference instead of content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct File {
    name: String,
    reference: ReferenceId,
    parent: Vec<String>,
}

impl File {
    pub(crate) fn new(name: String, reference: ReferenceId, parent: Vec<String>) -> Self {
        Self {
            name,
            reference,
            parent,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the external reference id stored on this file.
    pub fn reference(&self) -> ReferenceId {
        self.reference
    }

    /// Location of the containing directory, root-exclusive.
    pub fn parent(&self) -> &[String] {
        &self.parent
    }

    /// Absolute path of the file, e.g. `/docs/readme`.
    pub fn display_path(&self) -> String {
        render(self.parent.iter().chain(std::iter::once(&self.name)))
    }
}

/// An interior node of the namespace.
///
/// `path` lists the names of all ancestors except the root, which doubles as
/// the back-reference used to find the parent in the live tree.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Directory {
    name: Option<String>,
    path: Vec<String>,
    files: BTreeMap<String, File>,
    subdirectories: BTreeMap<String, Arc<Directory>>,
}

impl Directory {
    /// Creates an empty root directory.
    pub fn root() -> Self {
        Self::default()
    }

    /// Creates an empty directory named `name` inside `parent`.
    pub(crate) fn child_of(parent: &Directory, name: String) -> Self {
        Self {
            name: Some(name),
            path: parent.location(),
            files: BTreeMap::new(),
            subdirectories: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Ordered names of the ancestors, root excluded.
    pub fn path(&self) -> &[String] {
        &self.path
    }

    pub fn is_root(&self) -> bool {
        self.name.is_none()
    }

    /// Names leading from the root to this directory, itself included.
    pub fn location(&self) -> Vec<String> {
        let mut location = self.path.clone();
        location.extend(self.name.iter().cloned());
        location
    }

    /// Location of the parent directory, or `None` for the root.
    pub fn parent_location(&self) -> Option<&[String]> {
        self.name.as_ref().map(|_| self.path.as_slice())
    }

    /// Absolute path of the directory; the root renders as `/`.
    pub fn display_path(&self) -> String {
        render(self.path.iter().chain(self.name.iter()))
    }

    // --------------------
    // Lookups
    // --------------------

    pub fn file(&self, name: &str) -> Option<&File> {
        self.files.get(name)
    }

    pub fn subdirectory(&self, name: &str) -> Option<&Directory> {
        self.subdirectories.get(name).map(Arc::as_ref)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.is_file(name) || self.is_dir(name)
    }

    pub fn is_file(&self, name: &str) -> bool {
        self.files.contains_key(name)
    }

    pub fn is_dir(&self, name: &str) -> bool {
        self.subdirectories.contains_key(name)
    }

    pub fn files(&self) -> impl Iterator<Item = &File> {
        self.files.values()
    }

    pub fn subdirectories(&self) -> impl Iterator<Item = &Directory> {
        self.subdirectories.values().map(Arc::as_ref)
    }

    pub fn file_names(&self) -> BTreeSet<String> {
        self.files.keys().cloned().collect()
    }

    pub fn directory_names(&self) -> BTreeSet<String> {
        self.subdirectories.keys().cloned().collect()
    }

    /// Follows `location` downwards through subdirectories.
    pub fn descend(&self, location: &[String]) -> Option<&Directory> {
        location
            .iter()
            .try_fold(self, |current, name| current.subdirectory(name))
    }

    /// Mutable variant of [`Directory::descend`]. Nodes shared with a
    /// snapshot are copied before they are handed out.
    pub(crate) fn descend_mut(&mut self, location: &[String]) -> Option<&mut Directory> {
        let mut current = self;
        for name in location {
            current = Arc::make_mut(current.subdirectories.get_mut(name)?);
        }
        Some(current)
    }

    // --------------------
    // Mutations
    // --------------------

    /// Adds a file, refusing names already taken by a file or a directory.
    pub(crate) fn insert_file(
        &mut self,
        name: String,
        reference: ReferenceId,
    ) -> Result<&File, NamespaceError> {
        self.ensure_vacant(&name)?;
        let file = File::new(name.clone(), reference, self.location());
        Ok(self.files.entry(name).or_insert(file))
    }

    /// Adds a subdirectory, refusing names already taken.
    pub(crate) fn insert_subdirectory(
        &mut self,
        directory: Directory,
    ) -> Result<(), NamespaceError> {
        let name = match directory.name.clone() {
            Some(name) => name,
            None => return Err(NamespaceError::InvalidName("/".into())),
        };
        self.ensure_vacant(&name)?;
        self.subdirectories.insert(name, Arc::new(directory));
        Ok(())
    }

    pub(crate) fn remove_file(&mut self, name: &str) -> Option<File> {
        self.files.remove(name)
    }

    /// Detaches a subdirectory together with everything below it.
    pub(crate) fn remove_subdirectory(&mut self, name: &str) -> Option<Arc<Directory>> {
        self.subdirectories.remove(name)
    }

    fn ensure_vacant(&self, name: &str) -> Result<(), NamespaceError> {
        if self.contains(name) {
            Err(NamespaceError::NameCollision(join_child(self, name)))
        } else {
            Ok(())
        }
    }
}

/// Checks that `name` can be used as a single entry name.
///
/// Control characters are refused as well, since a name ends up on its own
/// line inside multi-line replies.
pub fn validate_name(name: &str) -> Result<(), NamespaceError> {
    if name.is_empty()
        || name == "."
        || name == ".."
        || name.contains('/')
        || name.chars().any(char::is_control)
    {
        Err(NamespaceError::InvalidName(name.to_string()))
    } else {
        Ok(())
    }
}

/// Absolute path of `name` inside `directory`.
pub(crate) fn join_child(directory: &Directory, name: &str) -> String {
    render(
        directory
            .path
            .iter()
            .chain(directory.name.iter())
            .map(String::as_str)
            .chain(std::iter::once(name)),
    )
}

fn render<I, S>(names: I) -> String
where
    I: Iterator<Item = S>,
    S: AsRef<str>,
{
    let mut rendered = String::from("/");
    let mut first = true;
    for name in names {
        if !first {
            rendered.push('/');
        }
        rendered.push_str(name.as_ref());
        first = false;
    }
    rendered
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Directory {
        let mut root = Directory::root();
        let mut docs = Directory::child_of(&root, "docs".into());
        docs.insert_file("readme".into(), 1).unwrap();
        root.insert_subdirectory(docs).unwrap();
        root.insert_file("general".into(), 2).unwrap();
        root
    }

    #[test]
    fn test_root_renders_as_slash() {
        let root = Directory::root();
        assert!(root.is_root());
        assert_eq!(root.display_path(), "/");
        assert!(root.location().is_empty());
        assert_eq!(root.parent_location(), None);
    }

    #[test]
    fn test_child_paths_follow_ancestors() {
        let root = sample();
        let docs = root.subdirectory("docs").unwrap();
        assert_eq!(docs.name(), Some("docs"));
        assert!(docs.path().is_empty());
        assert_eq!(docs.location(), vec!["docs".to_string()]);
        assert_eq!(docs.display_path(), "/docs");

        let readme = docs.file("readme").unwrap();
        assert_eq!(readme.parent(), ["docs".to_string()]);
        assert_eq!(readme.display_path(), "/docs/readme");
    }

    #[test]
    fn test_files_and_directories_share_names() {
        let mut root = sample();
        assert!(matches!(
            root.insert_file("docs".into(), 9),
            Err(NamespaceError::NameCollision(_))
        ));
        let clash = Directory::child_of(&root, "general".into());
        assert!(matches!(
            root.insert_subdirectory(clash),
            Err(NamespaceError::NameCollision(_))
        ));
        assert_eq!(root.file("general").unwrap().reference(), 2);
    }

    #[test]
    fn test_snapshot_is_not_affected_by_live_edits() {
        let mut root = sample();
        let snapshot = root.clone();

        let docs = root.descend_mut(&["docs".to_string()]).unwrap();
        docs.insert_file("notes".into(), 3).unwrap();

        assert!(root.subdirectory("docs").unwrap().is_file("notes"));
        assert!(!snapshot.subdirectory("docs").unwrap().is_file("notes"));
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("readme").is_ok());
        for bad in ["", ".", "..", "a/b", "a\r\n212 End", "tab\there", "nul\0"] {
            assert!(matches!(
                validate_name(bad),
                Err(NamespaceError::InvalidName(_))
            ));
        }
    }
}
