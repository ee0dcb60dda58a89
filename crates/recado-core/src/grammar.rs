//! Command grammar: verb recognition and positional field extraction.
//!
//! A command is a case-insensitive verb prefix (`tarefa:`, `evento:`,
//! `contato:`) followed by pipe-delimited positional fields. This layer does
//! not validate field counts; the dispatcher decides which positions are
//! required per verb.

/// The command keyword selecting which record type a message produces.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verb {
    Task,
    Event,
    Contact,
    Unrecognized,
}

impl Verb {
    fn prefix(self) -> &'static str {
        match self {
            Verb::Task => "tarefa:",
            Verb::Event => "evento:",
            Verb::Contact => "contato:",
            Verb::Unrecognized => "",
        }
    }
}

/// A recognized verb plus its trimmed positional fields.
#[derive(Clone, Debug)]
pub struct ParsedCommand {
    pub verb: Verb,
    pub fields: Vec<String>,
}

/// Classify a raw message into a verb and its fields.
///
/// The prefix match is case-insensitive but the fields keep the sender's
/// original casing.
pub fn classify(raw: &str) -> ParsedCommand {
    let text = raw.trim();

    for verb in [Verb::Task, Verb::Event, Verb::Contact] {
        let prefix = verb.prefix();
        let matches = text
            .get(..prefix.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(prefix));
        if matches {
            let body = &text[prefix.len()..];
            let fields = body.split('|').map(|f| f.trim().to_string()).collect();
            return ParsedCommand { verb, fields };
        }
    }

    ParsedCommand {
        verb: Verb::Unrecognized,
        fields: Vec::new(),
    }
}
