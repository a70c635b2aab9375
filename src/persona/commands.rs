//! Command interception.
//!
//! The trailing user message is matched against an ordered rule table; the
//! first rule whose prefix matches wins. Matching is literal and
//! case-sensitive on the trimmed text.

use super::{find, replies};
use crate::web::models::{last_user_text, ChatMessage};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    /// `*agent` without an argument.
    Directory,
    /// `*agent <name>`; the name is not validated yet.
    Switch(String),
    Shortcut(&'static str),
    Status,
    Workflow,
}

struct Rule {
    prefixes: &'static [&'static str],
    build: fn(&str) -> Command,
}

// Explicit generic forms come before the shorthand specialist tokens.
const RULES: &[Rule] = &[
    Rule {
        prefixes: &["*/help", "*help"],
        build: |_| Command::Help,
    },
    Rule {
        prefixes: &["*/agent", "*agent"],
        build: agent_command,
    },
    Rule {
        prefixes: &["*analyst", "*brainstorm"],
        build: |_| Command::Shortcut("analyst"),
    },
    Rule {
        prefixes: &["*pm"],
        build: |_| Command::Shortcut("pm"),
    },
    Rule {
        prefixes: &["*ux-expert"],
        build: |_| Command::Shortcut("ux-expert"),
    },
    Rule {
        prefixes: &["*architect"],
        build: |_| Command::Shortcut("architect"),
    },
    Rule {
        prefixes: &["*po"],
        build: |_| Command::Shortcut("po"),
    },
    Rule {
        prefixes: &["*/status", "*status"],
        build: |_| Command::Status,
    },
    Rule {
        prefixes: &["*/workflow", "*workflow"],
        build: |_| Command::Workflow,
    },
];

fn agent_command(text: &str) -> Command {
    match text.split_whitespace().nth(1) {
        Some(name) => Command::Switch(name.to_string()),
        None => Command::Directory,
    }
}

pub fn parse(text: &str) -> Option<Command> {
    let trimmed = text.trim();
    RULES
        .iter()
        .find(|rule| rule.prefixes.iter().any(|p| trimmed.starts_with(p)))
        .map(|rule| (rule.build)(trimmed))
}

/// Outcome of interception. `response_text` is set exactly when `matched`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayCommand {
    pub matched: bool,
    pub response_text: Option<String>,
    /// Persona the command switched to, if any.
    pub selected: Option<&'static str>,
}

impl RelayCommand {
    pub fn unmatched() -> Self {
        Self {
            matched: false,
            response_text: None,
            selected: None,
        }
    }

    fn reply(text: String, selected: Option<&'static str>) -> Self {
        Self {
            matched: true,
            response_text: Some(text),
            selected,
        }
    }
}

/// Inspect the trailing message; `current` is the persona in effect before
/// this message.
pub fn intercept(messages: &[ChatMessage], current: &str) -> RelayCommand {
    let Some(command) = last_user_text(messages).and_then(parse) else {
        return RelayCommand::unmatched();
    };
    execute(command, current)
}

pub fn execute(command: Command, current: &str) -> RelayCommand {
    let current = find(current);
    match command {
        Command::Help => RelayCommand::reply(replies::help(current), None),
        Command::Directory => RelayCommand::reply(replies::directory(current), None),
        Command::Switch(name) => match find(&name) {
            Some(persona) => RelayCommand::reply(replies::switched(persona), Some(persona.id)),
            None => RelayCommand::reply(replies::invalid_selection(&name), None),
        },
        Command::Shortcut(id) => match find(id) {
            Some(persona) => RelayCommand::reply(replies::switched(persona), Some(persona.id)),
            None => RelayCommand::unmatched(),
        },
        Command::Status => RelayCommand::reply(replies::status(current), None),
        Command::Workflow => RelayCommand::reply(replies::workflow(current), None),
    }
}
