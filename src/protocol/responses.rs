//! Reply handling
//!
//! Defines reply codes and formatting.

/// Reply codes
pub const SERVICE_READY: u16 = 220;
pub const CLOSING: u16 = 221;
pub const DIRECTORY_STATUS: u16 = 212;
pub const FILE_STATUS: u16 = 213;
pub const HELP: u16 = 214;
pub const ACTION_OK: u16 = 250;
pub const PATH_CREATED: u16 = 257;
pub const SERVICE_UNAVAILABLE: u16 = 421;
pub const LOCAL_ERROR: u16 = 451;
pub const UNKNOWN_COMMAND: u16 = 500;
pub const SYNTAX_ERROR: u16 = 501;
pub const NOT_FOUND: u16 = 550;
pub const WRONG_KIND: u16 = 551;
pub const NAME_COLLISION: u16 = 552;
pub const INVALID_NAME: u16 = 553;
pub const ABOVE_ROOT: u16 = 554;

/// Format a single-line reply
pub fn format_response(code: u16, message: &str) -> String {
    format!("{} {}\r\n", code, message)
}

/// Format a multi-line reply.
///
/// The first line carries `code-`, every entry is indented by one space and
/// the reply ends with `code End`, so readers can stop at the first line
/// whose code is followed by a space.
pub fn format_multiline<I, S>(code: u16, header: &str, lines: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut reply = format!("{}-{}\r\n", code, header);
    for line in lines {
        reply.push(' ');
        reply.push_str(line.as_ref());
        reply.push_str("\r\n");
    }
    reply.push_str(&format!("{} End\r\n", code));
    reply
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_response() {
        assert_eq!(format_response(ACTION_OK, "done"), "250 done\r\n");
    }

    #[test]
    fn test_format_multiline() {
        assert_eq!(
            format_multiline(DIRECTORY_STATUS, "Listing /", ["a", "b/"]),
            "212-Listing /\r\n a\r\n b/\r\n212 End\r\n"
        );
        assert_eq!(
            format_multiline(DIRECTORY_STATUS, "Listing /", Vec::<String>::new()),
            "212-Listing /\r\n212 End\r\n"
        );
    }
}
