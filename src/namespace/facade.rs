//! Namespace facade
//!
//! Owns the live tree and the working-directory snapshot, and exposes the
//! user-facing operations on top of the resolver.

use std::collections::BTreeSet;
use std::mem;
use std::path::Path;

use log::{debug, info};

use crate::error::{DisyncError, NamespaceError};
use crate::namespace::loader;
use crate::namespace::node::{Directory, File, ReferenceId, validate_name};
use crate::namespace::resolver::{self, Resolved, Target};

/// A virtual namespace of directories and reference-carrying files.
///
/// The working directory is a snapshot: it shares structure with the tree
/// but is replaced, never edited, when the tree changes.
#[derive(Debug, Clone)]
pub struct Namespace {
    root: Directory,
    working: Directory,
}

impl Namespace {
    /// Wraps an already built tree; the working directory starts at the root.
    pub fn new(root: Directory) -> Self {
        let working = root.clone();
        Self { root, working }
    }

    /// Parses `text` as YAML (or JSON) and builds the namespace from it.
    pub fn from_yaml(text: &str, allow_corrupt: bool) -> Result<Self, NamespaceError> {
        let document = loader::parse_document(text)?;
        Ok(Self::new(loader::build(&document, allow_corrupt)?))
    }

    /// Reads the document at `path` and builds the namespace from it.
    pub fn load(path: &Path, allow_corrupt: bool) -> Result<Self, DisyncError> {
        let text = std::fs::read_to_string(path)?;
        let namespace = Self::from_yaml(&text, allow_corrupt)?;
        info!("Namespace loaded from {}", path.display());
        Ok(namespace)
    }

    pub fn root(&self) -> &Directory {
        &self.root
    }

    pub fn working_directory(&self) -> &Directory {
        &self.working
    }

    /// Runs `f` with `working` installed as the working directory, then hands
    /// the (possibly changed) snapshot back through `working`.
    ///
    /// The snapshot is refreshed from the live tree first, so a session sees
    /// the mutations made by others since its last command.
    pub fn with_working_directory<R>(
        &mut self,
        working: &mut Directory,
        f: impl FnOnce(&mut Self) -> R,
    ) -> R {
        mem::swap(&mut self.working, working);
        self.resync_working_directory();
        let result = f(self);
        mem::swap(&mut self.working, working);
        result
    }

    // --------------------
    // Navigation
    // --------------------

    /// Absolute path of the working directory.
    pub fn pwd(&self) -> String {
        self.working.display_path()
    }

    pub fn cd(&mut self, path: &str) -> Result<(), NamespaceError> {
        let directory = self.resolve_directory(path)?;
        debug!("Working directory {} -> {}", self.pwd(), directory.display_path());
        self.working = directory;
        Ok(())
    }

    /// Resolves `path` against the working directory.
    pub fn resolve(&self, path: &str) -> Result<Resolved, NamespaceError> {
        resolver::resolve(&self.root, &self.working, &resolver::split(path))
    }

    // --------------------
    // Listing
    // --------------------

    pub fn ls_file(&self, path: Option<&str>) -> Result<BTreeSet<String>, NamespaceError> {
        match path {
            None => Ok(self.working.file_names()),
            Some(path) => Ok(self.resolve_directory(path)?.file_names()),
        }
    }

    pub fn ls_dir(&self, path: Option<&str>) -> Result<BTreeSet<String>, NamespaceError> {
        match path {
            None => Ok(self.working.directory_names()),
            Some(path) => Ok(self.resolve_directory(path)?.directory_names()),
        }
    }

    // --------------------
    // Lookup
    // --------------------

    pub fn get_file(&self, path: &str) -> Result<File, NamespaceError> {
        match self.resolve(path)? {
            Resolved::File(file) => Ok(file),
            Resolved::Directory(directory) => Err(NamespaceError::WrongKind(format!(
                "This is a directory not a file: {}",
                directory.display_path()
            ))),
        }
    }

    pub fn get_directory(&self, path: &str) -> Result<Directory, NamespaceError> {
        self.resolve_directory(path)
    }

    // --------------------
    // Mutation
    // --------------------

    pub fn mkdir(&mut self, path: &str) -> Result<(), NamespaceError> {
        let (parent, name) = self.live_parent(path)?;
        validate_name(&name)?;
        let directory = Directory::child_of(parent, name);
        let created = directory.display_path();
        parent.insert_subdirectory(directory)?;
        info!("Created directory {}", created);
        self.resync_working_directory();
        Ok(())
    }

    pub fn touch(&mut self, path: &str, reference: ReferenceId) -> Result<(), NamespaceError> {
        let (parent, name) = self.live_parent(path)?;
        validate_name(&name)?;
        let created = parent.insert_file(name, reference)?.display_path();
        info!("Created file {} -> {}", created, reference);
        self.resync_working_directory();
        Ok(())
    }

    pub fn rm(&mut self, path: &str) -> Result<(), NamespaceError> {
        let (parent, name) = self.live_parent(path)?;
        if parent.is_dir(&name) {
            return Err(NamespaceError::WrongKind(
                "Directories cannot be removed with `rm` use `rmdir`".into(),
            ));
        }
        let removed = parent
            .remove_file(&name)
            .ok_or_else(|| NamespaceError::NotFound(path.to_string()))?;
        info!("Removed file {}", removed.display_path());
        self.resync_working_directory();
        Ok(())
    }

    pub fn rmdir(&mut self, path: &str) -> Result<(), NamespaceError> {
        let (parent, name) = self.live_parent(path)?;
        if parent.is_file(&name) {
            return Err(NamespaceError::WrongKind(
                "Files cannot be removed with `rmdir` use `rm`".into(),
            ));
        }
        let removed = parent
            .remove_subdirectory(&name)
            .ok_or_else(|| NamespaceError::NotFound(path.to_string()))?;
        info!("Removed directory {}", removed.display_path());
        self.resync_working_directory();
        Ok(())
    }

    // --------------------
    // Internals
    // --------------------

    fn resolve_directory(&self, path: &str) -> Result<Directory, NamespaceError> {
        match self.resolve(path)? {
            Resolved::Directory(directory) => Ok(directory),
            Resolved::File(file) => Err(NamespaceError::WrongKind(format!(
                "This is a file not a directory: {}",
                file.display_path()
            ))),
        }
    }

    /// Finds the live directory that holds the last segment of `path`.
    ///
    /// The parent segments are walked from the working directory, restarting
    /// at the live root on an empty segment, and the parent found that way is
    /// then looked up mutably in the live tree.
    fn live_parent(&mut self, path: &str) -> Result<(&mut Directory, String), NamespaceError> {
        let segments = resolver::split(path);
        let (name, parent_segments) = match segments.split_last() {
            Some((name, rest)) => (name.to_string(), rest),
            None => return Err(NamespaceError::InvalidName(path.to_string())),
        };

        let location = match resolver::walk(&self.root, &self.working, parent_segments)? {
            Target::Directory(directory) => directory.location(),
            Target::File(file) => {
                return Err(NamespaceError::WrongKind(format!(
                    "This is a file not a directory: {}",
                    file.display_path()
                )));
            }
        };

        let missing = format!("/{}", location.join("/"));
        let parent = self
            .root
            .descend_mut(&location)
            .ok_or(NamespaceError::NotFound(missing))?;
        Ok((parent, name))
    }

    /// Replaces the working directory with a fresh snapshot of its live
    /// location. A working directory that was removed is left as it is.
    fn resync_working_directory(&mut self) {
        if let Some(live) = self.root.descend(&self.working.location()) {
            self.working = live.clone();
        }
    }
}
