/// What a line of player input asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Empty line: bet and spin
    Spin,
    /// Leave the game
    Quit,
    /// Anything else, skipped without a message
    Ignore,
}

/// Parse one line of player input.
///
/// Matching is case-insensitive and ignores surrounding whitespace.
///
/// # Examples
///
/// ```
/// use slots_cli::commands::{Command, parse_command};
///
/// assert_eq!(parse_command(""), Command::Spin);
/// assert_eq!(parse_command("  QUIT \n"), Command::Quit);
/// assert_eq!(parse_command("spin please"), Command::Ignore);
/// ```
pub fn parse_command(input: &str) -> Command {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        Command::Spin
    } else if trimmed.eq_ignore_ascii_case("quit") {
        Command::Quit
    } else {
        Command::Ignore
    }
}
