//! Module `commands`
//!
//! Defines the command parsing logic and the data structures used to
//! represent commands, their status and their results.

use crate::namespace::ReferenceId;

/// Represents a command parsed from one line of user input.
///
/// Commands that take a path store it verbatim; listings take an optional
/// path and fall back to the working directory.
#[derive(Debug, PartialEq)]
pub enum Command {
    Quit,
    Help,
    Pwd,
    Cd(String),
    Ls(Option<String>),
    LsFile(Option<String>),
    LsDir(Option<String>),
    Tree(Option<String>),
    Get(String),
    Mkdir(String),
    Touch(String, ReferenceId),
    Rm(String),
    Rmdir(String),
    /// A known verb with missing or unusable arguments; holds the usage line.
    Malformed(&'static str),
    Unknown(String),
}

/// Represents the outcome status of executing a command.
#[derive(Debug, PartialEq)]
pub enum CommandStatus {
    Success,
    Failure(String),
    CloseConnection,
}

/// Struct encapsulating the full result of a command execution.
#[derive(Debug)]
pub struct CommandResult {
    pub status: CommandStatus,
    pub message: Option<String>,
}

/// Splits an input line into the commands separated by `;`.
pub fn split_commands(line: &str) -> impl Iterator<Item = &str> {
    line.split(';').map(str::trim).filter(|command| !command.is_empty())
}

/// Parses a raw command string into the `Command` enum.
///
/// Verbs are case-insensitive. Path arguments keep inner whitespace.
pub fn parse_command(raw: &str) -> Command {
    let trimmed = raw.trim();
    let mut parts = trimmed.splitn(2, char::is_whitespace);
    let cmd = parts.next().unwrap_or("").to_ascii_uppercase();
    let arg = parts.next().unwrap_or("").trim();
    let optional = (!arg.is_empty()).then(|| arg.to_string());

    match cmd.as_str() {
        "QUIT" | "EXIT" | "Q" => Command::Quit,
        "HELP" => Command::Help,
        "PWD" => Command::Pwd,
        "CD" if !arg.is_empty() => Command::Cd(arg.to_string()),
        "LS" => Command::Ls(optional),
        "LSF" => Command::LsFile(optional),
        "LSD" => Command::LsDir(optional),
        "TREE" => Command::Tree(optional),
        "GET" if !arg.is_empty() => Command::Get(arg.to_string()),
        "MKDIR" if !arg.is_empty() => Command::Mkdir(arg.to_string()),
        "TOUCH" => parse_touch(arg),
        "RM" if !arg.is_empty() => Command::Rm(arg.to_string()),
        "RMDIR" if !arg.is_empty() => Command::Rmdir(arg.to_string()),
        "CD" => Command::Malformed("CD <path>"),
        "GET" => Command::Malformed("GET <path>"),
        "MKDIR" => Command::Malformed("MKDIR <path>"),
        "RM" => Command::Malformed("RM <path>"),
        "RMDIR" => Command::Malformed("RMDIR <path>"),
        _ => Command::Unknown(trimmed.to_string()),
    }
}

fn parse_touch(arg: &str) -> Command {
    let parsed = arg
        .rsplit_once(char::is_whitespace)
        .and_then(|(path, reference)| {
            let path = path.trim_end();
            let reference = reference.parse::<ReferenceId>().ok()?;
            (!path.is_empty()).then(|| Command::Touch(path.to_string(), reference))
        });
    parsed.unwrap_or(Command::Malformed("TOUCH <path> <reference>"))
}

/// One line per supported command, used by `HELP`.
pub const USAGE: &[&str] = &[
    "PWD                      print the working directory",
    "CD <path>                change the working directory",
    "LS [path]                list files and directories",
    "LSF [path]               list files",
    "LSD [path]               list directories",
    "TREE [path]              list a directory recursively",
    "GET <path>               show the reference of a file",
    "MKDIR <path>             create a directory",
    "TOUCH <path> <reference> create a file",
    "RM <path>                remove a file",
    "RMDIR <path>             remove a directory",
    "QUIT                     end the session",
];
