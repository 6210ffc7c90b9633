use selector::InteractionEvent;

/// One line from the interaction source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Event(InteractionEvent),
    /// Re-emit the current view.
    Show,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    UnknownCommand(String),
    UnexpectedArgument(String),
}

impl std::fmt::Display for InputError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputError::UnknownCommand(verb) => write!(
                f,
                "unknown command {verb:?} (expected click, tooltip, pick, clear, show, quit)"
            ),
            InputError::UnexpectedArgument(verb) => write!(f, "{verb} takes no argument"),
        }
    }
}

impl std::error::Error for InputError {}

/// Parses `<verb> [argument]`.
///
/// The argument is everything after the first space, kept verbatim so that
/// name matching sees exactly what the host sent. Blank lines yield `None`.
pub fn parse_command(line: &str) -> Result<Option<Command>, InputError> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() {
        return Ok(None);
    }
    let (verb, arg) = match line.split_once(' ') {
        Some((verb, arg)) => (verb, Some(arg)),
        None => (line, None),
    };
    let text = || arg.unwrap_or_default().to_string();

    let command = match verb {
        "click" => Command::Event(InteractionEvent::FeatureClicked { name: text() }),
        "tooltip" => Command::Event(InteractionEvent::TooltipClicked { text: text() }),
        "pick" => Command::Event(InteractionEvent::CountryPicked { key: text() }),
        "clear" | "show" | "quit" if arg.is_some_and(|a| !a.trim().is_empty()) => {
            return Err(InputError::UnexpectedArgument(verb.to_string()));
        }
        "clear" => Command::Event(InteractionEvent::Cleared),
        "show" => Command::Show,
        "quit" => Command::Quit,
        other => return Err(InputError::UnknownCommand(other.to_string())),
    };
    Ok(Some(command))
}
