//! Line commands accepted by the terminal wizard.

use std::str::FromStr;

use crate::onboarding::model::{DraftField, FieldEdit};

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Set(FieldEdit),
    Next,
    Back,
    AddLocation {
        name: String,
        address: Option<String>,
        primary: bool,
    },
    /// 0-based index of the location to remove.
    RemoveLocation(usize),
    Show,
    Help,
    Quit,
}

pub const HELP: &str = "\
Commands:
  set <field> <value>                       edit a field of the current step
                                            (name, timezone, street, city, state,
                                             zip, country, tier)
  add-location <name> [| <address>] [--primary]
  remove-location <n>                       remove location number n
  next                                      validate and go to the next step
                                            (on review: save the client)
  back                                      go to the previous step
  show                                      redraw the current step
  help                                      show this help
  quit                                      leave without saving";

impl FromStr for ConsoleCommand {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        match verb.to_ascii_lowercase().as_str() {
            "next" | "n" => Ok(Self::Next),
            "back" | "b" => Ok(Self::Back),
            "show" | "s" => Ok(Self::Show),
            "help" | "?" => Ok(Self::Help),
            "quit" | "q" | "exit" => Ok(Self::Quit),
            "set" => {
                let (field, value) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
                if field.is_empty() {
                    return Err("usage: set <field> <value>".to_string());
                }
                let field: DraftField = field.parse()?;
                FieldEdit::parse(field, value.trim()).map(Self::Set)
            }
            "add-location" | "add" => Ok(parse_add_location(rest)),
            "remove-location" | "rm" => {
                let position: usize = rest
                    .parse()
                    .map_err(|_| "usage: remove-location <n>".to_string())?;
                position
                    .checked_sub(1)
                    .map(Self::RemoveLocation)
                    .ok_or_else(|| "locations are numbered from 1".to_string())
            }
            "" => Err("empty command".to_string()),
            other => Err(format!("unknown command {other:?}, type 'help'")),
        }
    }
}

fn parse_add_location(rest: &str) -> ConsoleCommand {
    let mut primary = false;
    let words: Vec<&str> = rest
        .split(' ')
        .filter(|w| {
            let flag = *w == "--primary";
            primary |= flag;
            !flag
        })
        .collect();
    let rest = words.join(" ");

    let (name, address) = match rest.split_once('|') {
        Some((name, address)) => (name, Some(address.trim().to_string())),
        None => (rest.as_str(), None),
    };

    ConsoleCommand::AddLocation {
        name: name.trim().to_string(),
        address: address.filter(|a| !a.is_empty()),
        primary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::model::Tier;

    #[test]
    fn parses_navigation() {
        assert_eq!("next".parse::<ConsoleCommand>().unwrap(), ConsoleCommand::Next);
        assert_eq!(" B ".parse::<ConsoleCommand>().unwrap(), ConsoleCommand::Back);
        assert_eq!("q".parse::<ConsoleCommand>().unwrap(), ConsoleCommand::Quit);
    }

    #[test]
    fn parses_set_with_spaces_in_value() {
        assert_eq!(
            "set name Acme Foods Ltd".parse::<ConsoleCommand>().unwrap(),
            ConsoleCommand::Set(FieldEdit::Name("Acme Foods Ltd".to_string()))
        );
        assert_eq!(
            "set tier growth".parse::<ConsoleCommand>().unwrap(),
            ConsoleCommand::Set(FieldEdit::Tier(Tier::Growth))
        );
        assert_eq!(
            "set name".parse::<ConsoleCommand>().unwrap(),
            ConsoleCommand::Set(FieldEdit::Name(String::new()))
        );
        assert!("set".parse::<ConsoleCommand>().is_err());
        assert!("set colour red".parse::<ConsoleCommand>().is_err());
    }

    #[test]
    fn parses_add_location() {
        assert_eq!(
            "add-location Main Store | 1 Main St --primary"
                .parse::<ConsoleCommand>()
                .unwrap(),
            ConsoleCommand::AddLocation {
                name: "Main Store".to_string(),
                address: Some("1 Main St".to_string()),
                primary: true,
            }
        );
        assert_eq!(
            "add-location Depot".parse::<ConsoleCommand>().unwrap(),
            ConsoleCommand::AddLocation {
                name: "Depot".to_string(),
                address: None,
                primary: false,
            }
        );
        // Empty names reach the controller, which reports them
        assert_eq!(
            "add-location --primary".parse::<ConsoleCommand>().unwrap(),
            ConsoleCommand::AddLocation {
                name: String::new(),
                address: None,
                primary: true,
            }
        );
    }

    #[test]
    fn remove_location_is_one_based() {
        assert_eq!(
            "remove-location 2".parse::<ConsoleCommand>().unwrap(),
            ConsoleCommand::RemoveLocation(1)
        );
        assert!("remove-location 0".parse::<ConsoleCommand>().is_err());
        assert!("remove-location x".parse::<ConsoleCommand>().is_err());
    }

    #[test]
    fn unknown_command() {
        let err = "launch".parse::<ConsoleCommand>().unwrap_err();
        assert!(err.contains("launch"));
    }
}
