//! The fixed command table.

/// Every command the bot answers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Command {
    Start,
    Greeting,
    Help,
    Check,
    Status,
    Health,
    Uptime,
    Endpoints,
    Alerts,
    Ping,
}

pub const COMMAND_PREFIX: char = '/';

const TABLE: &[(&str, Command)] = &[
    ("/start", Command::Start),
    ("/greeting", Command::Greeting),
    ("/help", Command::Help),
    ("/check", Command::Check),
    ("/status", Command::Status),
    ("/health", Command::Health),
    ("/uptime", Command::Uptime),
    ("/endpoints", Command::Endpoints),
    ("/alerts", Command::Alerts),
    ("/ping", Command::Ping),
];

impl Command {
    /// Resolve an already-lowercased token such as `/check` or `/check@MyBot`.
    pub fn from_token(token: &str) -> Option<Self> {
        // Telegram appends `@botname` to commands picked from the menu in groups.
        let bare = token.split('@').next().unwrap_or(token);
        TABLE
            .iter()
            .find(|(name, _)| *name == bare)
            .map(|(_, cmd)| *cmd)
    }

    pub fn token(self) -> &'static str {
        TABLE
            .iter()
            .find(|(_, cmd)| *cmd == self)
            .map(|(name, _)| *name)
            .unwrap_or_default()
    }

    /// Whether rendering needs a fresh snapshot from the status source.
    pub fn needs_snapshot(self) -> bool {
        matches!(
            self,
            Command::Check | Command::Status | Command::Health | Command::Uptime | Command::Endpoints
        )
    }

    pub fn all() -> impl Iterator<Item = Command> {
        TABLE.iter().map(|(_, cmd)| *cmd)
    }
}

/// How the dispatcher should treat a message body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Parsed {
    Command(Command),
    /// Looks like a command but is not in the table; carries the lowercased token.
    Unknown(String),
    Plain,
}

/// Classify a raw message text by its first whitespace-delimited word.
pub fn parse(text: &str) -> Parsed {
    let text = text.trim();
    let token = text
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .to_lowercase();

    if let Some(cmd) = Command::from_token(&token) {
        return Parsed::Command(cmd);
    }
    if text.starts_with(COMMAND_PREFIX) {
        return Parsed::Unknown(token);
    }
    Parsed::Plain
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_round_trips_every_command() {
        for cmd in Command::all() {
            assert_eq!(Command::from_token(cmd.token()), Some(cmd));
        }
        assert_eq!(Command::all().count(), 10);
    }

    #[test]
    fn parses_case_insensitively_with_arguments() {
        assert_eq!(parse("/CHECK"), Parsed::Command(Command::Check));
        assert_eq!(parse("  /Status please  "), Parsed::Command(Command::Status));
        assert_eq!(parse("/uptime\nextra"), Parsed::Command(Command::Uptime));
    }

    #[test]
    fn ignores_bot_mention_suffix() {
        assert_eq!(parse("/ping@BctMonitorBot"), Parsed::Command(Command::Ping));
    }

    #[test]
    fn unknown_command_keeps_token() {
        assert_eq!(parse("/foo bar"), Parsed::Unknown("/foo".to_string()));
        assert_eq!(parse("/"), Parsed::Unknown("/".to_string()));
    }

    #[test]
    fn plain_text_and_empty_are_plain() {
        assert_eq!(parse("hello /check"), Parsed::Plain);
        assert_eq!(parse(""), Parsed::Plain);
        assert_eq!(parse("   "), Parsed::Plain);
    }

    #[test]
    fn only_data_commands_need_a_snapshot() {
        assert!(Command::Check.needs_snapshot());
        assert!(Command::Endpoints.needs_snapshot());
        assert!(!Command::Ping.needs_snapshot());
        assert!(!Command::Alerts.needs_snapshot());
        assert!(!Command::Help.needs_snapshot());
    }
}
