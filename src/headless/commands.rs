//! Stdin command language of the headless driver
//!
//! One command per line, first word is the verb:
//!
//! ```text
//! goto /en/get-started
//! select platform mac
//! vote up
//! comment Clear and short
//! send
//! search ssh
//! key down
//! key enter
//! quit
//! ```

use std::str::FromStr;

use docsite_app::{InputKey, Message};
use docsite_core::{PickerKind, SurveyVote};

/// Parse one stdin line. `Ok(None)` for blank lines and `#` comments.
pub fn parse_command(line: &str) -> Result<Option<Message>, String> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let msg = match verb {
        "goto" | "open" => Message::Navigate {
            target: required(verb, rest)?.to_string(),
        },
        "reload" => Message::Reload,

        "select" => {
            let (kind, value) = rest
                .split_once(char::is_whitespace)
                .ok_or_else(|| "usage: select <platform|tool|language|version> <value>".to_string())?;
            Message::SelectPicker {
                kind: PickerKind::from_str(kind)?,
                value: value.trim().to_string(),
            }
        }
        "locale" => Message::SelectLocale {
            locale: required(verb, rest)?.to_string(),
        },
        "version" => Message::SelectVersion {
            version: required(verb, rest)?.to_string(),
        },

        "vote" => Message::SurveyVote(match required(verb, rest)? {
            "up" | "yes" => SurveyVote::Up,
            "down" | "no" => SurveyVote::Down,
            other => return Err(format!("unknown vote '{other}' (expected up or down)")),
        }),
        "comment" => Message::SurveyComment(rest.to_string()),
        "email" => Message::SurveyEmail(rest.to_string()),
        "send" => Message::SurveySubmit,
        "cancel" => Message::SurveyCancel,

        "search" => Message::OpenSearch {
            initial: rest.to_string(),
        },
        "type" => Message::SearchInput(rest.to_string()),
        "key" => Message::Key(InputKey::from_str(required(verb, rest)?)?),

        "hover" => Message::HoverLink {
            link_id: required(verb, rest)?.to_string(),
        },
        "unhover" => Message::UnhoverLink,
        "card-enter" => Message::CardEnter,
        "card-leave" => Message::CardLeave,
        "focus" => Message::FocusLink {
            link_id: (!rest.is_empty()).then(|| rest.to_string()),
        },

        "q" | "quit" => Message::Quit,

        other => return Err(format!("unknown command '{other}'")),
    };
    Ok(Some(msg))
}

fn required<'a>(verb: &str, rest: &'a str) -> Result<&'a str, String> {
    if rest.is_empty() {
        Err(format!("'{verb}' needs an argument"))
    } else {
        Ok(rest)
    }
}
