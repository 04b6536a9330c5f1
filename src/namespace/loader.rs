//! Loader
//!
//! Builds a `Directory` tree from a nested key/value document. Integer values
//! become files, mappings become subdirectories, anything else is a corrupt
//! entry which either aborts the build or is skipped.

use log::{debug, warn};
use serde_yaml::{Mapping, Value};

use crate::error::NamespaceError;
use crate::namespace::node::{Directory, join_child, validate_name};

/// Parses a YAML (or JSON) document into a value the loader can consume.
pub fn parse_document(text: &str) -> Result<Value, NamespaceError> {
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_yaml::from_str(text).map_err(|e| NamespaceError::CorruptFileSystem(e.to_string()))
}

/// Builds the root directory from `document`.
///
/// With `allow_corrupt` unset the first unrecognised entry aborts the build.
pub fn build(document: &Value, allow_corrupt: bool) -> Result<Directory, NamespaceError> {
    let mapping = match document {
        Value::Null => return Err(NamespaceError::CorruptFileSystem("empty".into())),
        Value::Mapping(mapping) => mapping,
        _ => {
            return Err(NamespaceError::CorruptFileSystem(
                "document root is not a mapping".into(),
            ));
        }
    };

    let mut root = Directory::root();
    populate(&mut root, mapping, allow_corrupt)?;
    debug!(
        "Loaded namespace root with {} files and {} directories",
        root.file_names().len(),
        root.directory_names().len()
    );
    Ok(root)
}

fn populate(
    directory: &mut Directory,
    mapping: &Mapping,
    allow_corrupt: bool,
) -> Result<(), NamespaceError> {
    for (key, value) in mapping {
        let name = match entry_name(key) {
            Some(name) => name,
            None => {
                reject(
                    allow_corrupt,
                    format!("unsupported key {:?} in {}", key, directory.display_path()),
                )?;
                continue;
            }
        };

        if directory.contains(&name) {
            reject(
                allow_corrupt,
                format!("duplicate entry {}", join_child(directory, &name)),
            )?;
            continue;
        }

        match value {
            Value::Number(number) => match number.as_i64() {
                Some(reference) => {
                    directory.insert_file(name, reference)?;
                }
                None => reject(
                    allow_corrupt,
                    format!(
                        "{} is not an integer reference",
                        join_child(directory, &name)
                    ),
                )?,
            },
            Value::Mapping(children) => {
                let mut child = Directory::child_of(directory, name);
                populate(&mut child, children, allow_corrupt)?;
                directory.insert_subdirectory(child)?;
            }
            _ => reject(
                allow_corrupt,
                format!(
                    "{} is neither a file nor a directory",
                    join_child(directory, &name)
                ),
            )?,
        }
    }
    Ok(())
}

/// Turns a mapping key into an entry name. Integer keys are accepted in
/// their decimal form.
fn entry_name(key: &Value) -> Option<String> {
    let name = match key {
        Value::String(name) => name.clone(),
        Value::Number(number) if number.is_i64() || number.is_u64() => number.to_string(),
        _ => return None,
    };
    validate_name(&name).ok().map(|_| name)
}

fn reject(allow_corrupt: bool, reason: String) -> Result<(), NamespaceError> {
    if allow_corrupt {
        warn!("Skipping corrupt entry: {}", reason);
        Ok(())
    } else {
        Err(NamespaceError::CorruptFileSystem(reason))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load(text: &str, allow_corrupt: bool) -> Result<Directory, NamespaceError> {
        build(&parse_document(text)?, allow_corrupt)
    }

    #[test]
    fn test_nested_document() {
        let root = load("docs:\n  readme: 1\n  old:\n    log: 7\ngeneral: 2\n", false).unwrap();

        assert_eq!(root.file("general").unwrap().reference(), 2);
        let docs = root.subdirectory("docs").unwrap();
        assert_eq!(docs.file("readme").unwrap().reference(), 1);

        let old = docs.subdirectory("old").unwrap();
        assert_eq!(old.path(), ["docs".to_string()]);
        assert_eq!(old.display_path(), "/docs/old");
        assert_eq!(old.file("log").unwrap().parent(), ["docs", "old"]);
    }

    #[test]
    fn test_json_is_accepted() {
        let root = load(r#"{"docs": {"readme": 1}, "general": 2}"#, false).unwrap();
        assert!(root.is_dir("docs"));
        assert!(root.is_file("general"));
    }

    #[test]
    fn test_empty_document_is_fatal() {
        for text in ["", "~", "null"] {
            assert_eq!(
                load(text, true),
                Err(NamespaceError::CorruptFileSystem("empty".into()))
            );
        }
    }

    #[test]
    fn test_empty_mapping_is_an_empty_root() {
        let root = load("{}", false).unwrap();
        assert!(root.file_names().is_empty());
        assert!(root.directory_names().is_empty());
    }

    #[test]
    fn test_non_mapping_root_is_fatal() {
        assert!(matches!(
            load("- 1\n- 2\n", true),
            Err(NamespaceError::CorruptFileSystem(_))
        ));
    }

    #[test]
    fn test_float_entry_strict_and_lenient() {
        assert!(matches!(
            load(r#"{"x": 3.5}"#, false),
            Err(NamespaceError::CorruptFileSystem(_))
        ));

        let root = load(r#"{"x": 3.5}"#, true).unwrap();
        assert!(!root.contains("x"));
    }

    #[test]
    fn test_lenient_skips_only_bad_entries() {
        let text = "a: text\nb: true\nc: ~\nd: [1, 2]\nsub:\n  bad: 1.5\n  good: 4\nkeep: 5\n";
        assert!(load(text, false).is_err());

        let root = load(text, true).unwrap();
        assert_eq!(root.file_names().into_iter().collect::<Vec<_>>(), ["keep"]);
        let sub = root.subdirectory("sub").unwrap();
        assert_eq!(sub.file_names().into_iter().collect::<Vec<_>>(), ["good"]);
    }

    #[test]
    fn test_integer_keys_and_collisions() {
        let root = load("1: 10\n", false).unwrap();
        assert_eq!(root.file("1").unwrap().reference(), 10);

        let text = "1: 10\n\"1\": 11\n";
        assert!(matches!(
            load(text, false),
            Err(NamespaceError::CorruptFileSystem(_))
        ));
        let root = load(text, true).unwrap();
        assert_eq!(root.file("1").unwrap().reference(), 10);
    }

    #[test]
    fn test_unusable_key_names_are_corrupt() {
        assert!(load("\"..\": 1\n", false).is_err());
        assert!(load("\"a/b\": 1\n", false).is_err());
        assert!(load("\"\": 1\n", true).unwrap().file_names().is_empty());
    }

    #[test]
    fn test_keys_with_line_breaks_are_corrupt() {
        let text = "\"a\\r\\n212 End\": 1\nok: 2\n";
        assert!(matches!(
            load(text, false),
            Err(NamespaceError::CorruptFileSystem(_))
        ));
        let root = load(text, true).unwrap();
        assert_eq!(root.file_names().into_iter().collect::<Vec<_>>(), ["ok"]);
    }

    #[test]
    fn test_unparsable_document() {
        assert!(matches!(
            parse_document("a: [1, 2"),
            Err(NamespaceError::CorruptFileSystem(_))
        ));
    }
}
