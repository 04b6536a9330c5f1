//! Command handlers module.
//!
//! Maps parsed commands onto namespace operations and turns their outcome
//! into coded replies. Handlers never fail: namespace errors become failure
//! replies and the session carries on.

use std::collections::BTreeSet;

use crate::error::NamespaceError;
use crate::error::handlers::error_response;
use crate::namespace::{Directory, Namespace, ReferenceId};
use crate::protocol::commands::USAGE;
use crate::protocol::responses::{self, format_multiline, format_response};
use crate::protocol::{Command, CommandResult, CommandStatus};

/// Dispatches a parsed command to its handler.
///
/// # Arguments
///
/// * `namespace` - The namespace, with the caller's working directory installed.
/// * `command` - Reference to the parsed command.
pub fn handle_command(namespace: &mut Namespace, command: &Command) -> CommandResult {
    match command {
        Command::Quit => handle_cmd_quit(),
        Command::Help => handle_cmd_help(),
        Command::Pwd => handle_cmd_pwd(namespace),
        Command::Cd(path) => handle_cmd_cd(namespace, path),
        Command::Ls(path) => handle_cmd_ls(namespace, path.as_deref()),
        Command::LsFile(path) => {
            handle_cmd_list(namespace, path.as_deref(), Directory::file_names)
        }
        Command::LsDir(path) => {
            handle_cmd_list(namespace, path.as_deref(), Directory::directory_names)
        }
        Command::Tree(path) => handle_cmd_tree(namespace, path.as_deref()),
        Command::Get(path) => handle_cmd_get(namespace, path),
        Command::Mkdir(path) => handle_cmd_mkdir(namespace, path),
        Command::Touch(path, reference) => handle_cmd_touch(namespace, path, *reference),
        Command::Rm(path) => handle_cmd_rm(namespace, path),
        Command::Rmdir(path) => handle_cmd_rmdir(namespace, path),
        Command::Malformed(usage) => CommandResult {
            status: CommandStatus::Failure("Syntax error".into()),
            message: Some(format_response(
                responses::SYNTAX_ERROR,
                &format!("Usage: {}", usage),
            )),
        },
        Command::Unknown(raw) => CommandResult {
            status: CommandStatus::Failure(format!("Unknown command: {}", raw)),
            message: Some(format_response(responses::UNKNOWN_COMMAND, "Unknown command")),
        },
    }
}

/// Handles QUIT: signals the front end to close the session.
fn handle_cmd_quit() -> CommandResult {
    CommandResult {
        status: CommandStatus::CloseConnection,
        message: Some(format_response(responses::CLOSING, "Goodbye")),
    }
}

fn handle_cmd_help() -> CommandResult {
    success(format_multiline(responses::HELP, "Commands", USAGE))
}

fn handle_cmd_pwd(namespace: &Namespace) -> CommandResult {
    success(format_response(
        responses::PATH_CREATED,
        &format!("\"{}\"", namespace.pwd()),
    ))
}

fn handle_cmd_cd(namespace: &mut Namespace, path: &str) -> CommandResult {
    match namespace.cd(path) {
        Ok(()) => success(format_response(
            responses::ACTION_OK,
            &format!("Directory changed to {}", namespace.pwd()),
        )),
        Err(e) => failure(e),
    }
}

/// Handles LS: directories first, each suffixed with `/`, then files.
fn handle_cmd_ls(namespace: &Namespace, path: Option<&str>) -> CommandResult {
    let directory = match listed_directory(namespace, path) {
        Ok(directory) => directory,
        Err(e) => return failure(e),
    };

    let entries = directory
        .directory_names()
        .into_iter()
        .map(|name| format!("{}/", name))
        .chain(directory.file_names());
    success(format_multiline(
        responses::DIRECTORY_STATUS,
        &format!("Listing {}", directory.display_path()),
        entries,
    ))
}

/// Handles LSF and LSD: one kind of child names, headed by the absolute path.
fn handle_cmd_list(
    namespace: &Namespace,
    path: Option<&str>,
    names: fn(&Directory) -> BTreeSet<String>,
) -> CommandResult {
    match listed_directory(namespace, path) {
        Ok(directory) => success(format_multiline(
            responses::DIRECTORY_STATUS,
            &format!("Listing {}", directory.display_path()),
            names(&directory),
        )),
        Err(e) => failure(e),
    }
}

fn listed_directory(
    namespace: &Namespace,
    path: Option<&str>,
) -> Result<Directory, NamespaceError> {
    match path {
        Some(path) => namespace.get_directory(path),
        None => Ok(namespace.working_directory().clone()),
    }
}

fn handle_cmd_tree(namespace: &Namespace, path: Option<&str>) -> CommandResult {
    let directory = match namespace.get_directory(path.unwrap_or(".")) {
        Ok(directory) => directory,
        Err(e) => return failure(e),
    };

    let mut lines = Vec::new();
    render_tree(&directory, 0, &mut lines);
    success(format_multiline(
        responses::DIRECTORY_STATUS,
        &directory.display_path(),
        lines,
    ))
}

fn render_tree(directory: &Directory, depth: usize, lines: &mut Vec<String>) {
    let indent = "  ".repeat(depth);
    for subdirectory in directory.subdirectories() {
        lines.push(format!(
            "{}{}/",
            indent,
            subdirectory.name().unwrap_or_default()
        ));
        render_tree(subdirectory, depth + 1, lines);
    }
    for file in directory.files() {
        lines.push(format!("{}{} -> {}", indent, file.name(), file.reference()));
    }
}

fn handle_cmd_get(namespace: &Namespace, path: &str) -> CommandResult {
    match namespace.get_file(path) {
        Ok(file) => success(format_response(
            responses::FILE_STATUS,
            &format!("{} {}", file.display_path(), file.reference()),
        )),
        Err(e) => failure(e),
    }
}

fn handle_cmd_mkdir(namespace: &mut Namespace, path: &str) -> CommandResult {
    match namespace.mkdir(path) {
        Ok(()) => success(format_response(
            responses::PATH_CREATED,
            &format!("\"{}\" created", path),
        )),
        Err(e) => failure(e),
    }
}

fn handle_cmd_touch(
    namespace: &mut Namespace,
    path: &str,
    reference: ReferenceId,
) -> CommandResult {
    match namespace.touch(path, reference) {
        Ok(()) => success(format_response(
            responses::ACTION_OK,
            &format!("File {} created", path),
        )),
        Err(e) => failure(e),
    }
}

fn handle_cmd_rm(namespace: &mut Namespace, path: &str) -> CommandResult {
    match namespace.rm(path) {
        Ok(()) => success(format_response(
            responses::ACTION_OK,
            &format!("File {} removed", path),
        )),
        Err(e) => failure(e),
    }
}

fn handle_cmd_rmdir(namespace: &mut Namespace, path: &str) -> CommandResult {
    match namespace.rmdir(path) {
        Ok(()) => success(format_response(
            responses::ACTION_OK,
            &format!("Directory {} removed", path),
        )),
        Err(e) => failure(e),
    }
}

fn success(message: String) -> CommandResult {
    CommandResult {
        status: CommandStatus::Success,
        message: Some(message),
    }
}

fn failure(err: NamespaceError) -> CommandResult {
    CommandResult {
        status: CommandStatus::Failure(err.to_string()),
        message: Some(error_response(&err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::parse_command;

    fn namespace() -> Namespace {
        Namespace::from_yaml("docs:\n  readme: 1\n  old: {}\ngeneral: 2\n", false).unwrap()
    }

    fn run(namespace: &mut Namespace, line: &str) -> String {
        handle_command(namespace, &parse_command(line))
            .message
            .unwrap_or_default()
    }

    #[test]
    fn test_handle_pwd_and_cd() {
        let mut ns = namespace();
        assert_eq!(run(&mut ns, "PWD"), "257 \"/\"\r\n");
        assert_eq!(
            run(&mut ns, "CD docs"),
            "250 Directory changed to /docs\r\n"
        );
        assert_eq!(run(&mut ns, "pwd"), "257 \"/docs\"\r\n");
        assert!(run(&mut ns, "cd readme").starts_with("551 "));
        assert!(run(&mut ns, "cd ../..").starts_with("554 "));
    }

    #[test]
    fn test_handle_listings() {
        let mut ns = namespace();
        assert_eq!(
            run(&mut ns, "ls"),
            "212-Listing /\r\n docs/\r\n general\r\n212 End\r\n"
        );
        assert_eq!(
            run(&mut ns, "lsf docs"),
            "212-Listing /docs\r\n readme\r\n212 End\r\n"
        );
        assert_eq!(
            run(&mut ns, "lsd docs/old/.."),
            "212-Listing /docs\r\n old\r\n212 End\r\n"
        );
        assert!(run(&mut ns, "ls general").starts_with("551 "));
        assert!(run(&mut ns, "lsf nowhere").starts_with("550 "));
    }

    #[test]
    fn test_handle_tree() {
        let mut ns = namespace();
        assert_eq!(
            run(&mut ns, "tree"),
            "212-/\r\n docs/\r\n   old/\r\n   readme -> 1\r\n general -> 2\r\n212 End\r\n"
        );
    }

    #[test]
    fn test_handle_get() {
        let mut ns = namespace();
        assert_eq!(run(&mut ns, "get docs/readme"), "213 /docs/readme 1\r\n");
        assert!(run(&mut ns, "get docs").starts_with("551 "));
    }

    #[test]
    fn test_handle_mutations() {
        let mut ns = namespace();
        assert_eq!(run(&mut ns, "mkdir docs/new"), "257 \"docs/new\" created\r\n");
        assert!(run(&mut ns, "mkdir docs/new").starts_with("552 "));
        assert_eq!(
            run(&mut ns, "touch docs/new/f 42"),
            "250 File docs/new/f created\r\n"
        );
        assert_eq!(run(&mut ns, "get docs/new/f"), "213 /docs/new/f 42\r\n");
        assert!(run(&mut ns, "rm docs/new").starts_with("551 "));
        assert!(run(&mut ns, "rmdir docs/new/f").starts_with("551 "));
        assert_eq!(
            run(&mut ns, "rm docs/new/f"),
            "250 File docs/new/f removed\r\n"
        );
        assert_eq!(
            run(&mut ns, "rmdir docs/new"),
            "250 Directory docs/new removed\r\n"
        );
        assert!(run(&mut ns, "mkdir ..").starts_with("553 "));
    }

    #[test]
    fn test_handle_malformed_and_unknown() {
        let mut ns = namespace();
        assert_eq!(
            run(&mut ns, "touch lonely"),
            "501 Usage: TOUCH <path> <reference>\r\n"
        );
        assert_eq!(run(&mut ns, "download x"), "500 Unknown command\r\n");
    }

    #[test]
    fn test_handle_quit() {
        let mut ns = namespace();
        let result = handle_command(&mut ns, &Command::Quit);
        assert_eq!(result.status, CommandStatus::CloseConnection);
        assert_eq!(result.message.as_deref(), Some("221 Goodbye\r\n"));
    }
}
