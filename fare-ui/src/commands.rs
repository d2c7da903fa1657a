//! Line commands accepted by the interactive front end.
//!
//! ```text
//! base-old <amount>        set the old base fare
//! base-new <amount>        set the new base fare
//! penalty <amount>         set the airline penalty
//! fee <amount>             set the service fee
//! flex yes|no              set flexibility
//! add                      add a tax row
//! remove <id>              remove a tax row
//! row <id> type|old|new <value>
//! copy                     copy the ticket change summary
//! clear                    clear every field
//! show                     redraw
//! help
//! quit
//! ```
//!
//! A field command without a value clears that field.

use fare_core::{Flexibility, ParseRowIdError, RowId};
use thiserror::Error;

use crate::{
    models::{FareField, RowField},
    session::UiEvent,
};

pub const HELP: &str = "\
Commands:
  base-old <amount>             set the old base fare
  base-new <amount>             set the new base fare
  penalty <amount>              set the airline penalty
  fee <amount>                  set the service fee
  flex yes|no                   set flexibility
  add                           add a tax row
  remove <id>                   remove a tax row
  row <id> type|old|new <value> edit a tax row
  copy                          copy the ticket change summary
  clear                         clear every field
  show                          redraw
  help                          show this help
  quit                          exit
";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Event(UiEvent),
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("empty command")]
    Empty,

    #[error("unknown command '{0}', try 'help'")]
    Unknown(String),

    #[error("'{command}' expects {expected}")]
    MissingArgument {
        command: &'static str,
        expected: &'static str,
    },

    #[error("invalid flexibility '{0}', expected yes or no")]
    InvalidFlexibility(String),

    #[error("invalid row field '{0}', expected type, old or new")]
    InvalidRowField(String),

    #[error(transparent)]
    InvalidRowId(#[from] ParseRowIdError),
}

pub fn parse_command(line: &str) -> Result<Command, CommandError> {
    let line = line.trim();
    let (head, rest) = split_word(line);

    let event = match head.to_ascii_lowercase().as_str() {
        "" => return Err(CommandError::Empty),
        "help" | "?" => return Ok(Command::Help),
        "quit" | "exit" => return Ok(Command::Quit),
        "base-old" => edit_fare(FareField::BaseOldFare, rest),
        "base-new" => edit_fare(FareField::BaseNewFare, rest),
        "penalty" => edit_fare(FareField::AirlinePenalty, rest),
        "fee" => edit_fare(FareField::ServiceFee, rest),
        "flex" => UiEvent::SetFlexibility(parse_flexibility(rest)?),
        "add" => UiEvent::AddRow,
        "remove" => {
            if rest.is_empty() {
                return Err(CommandError::MissingArgument {
                    command: "remove",
                    expected: "a row id",
                });
            }
            UiEvent::RemoveRow(rest.parse()?)
        }
        "row" => parse_row_edit(rest)?,
        "copy" => UiEvent::Copy,
        "clear" => UiEvent::Clear,
        "show" => UiEvent::Show,
        _ => return Err(CommandError::Unknown(head.to_string())),
    };

    Ok(Command::Event(event))
}

fn split_word(input: &str) -> (&str, &str) {
    match input.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (input, ""),
    }
}

fn edit_fare(
    field: FareField,
    value: &str,
) -> UiEvent {
    UiEvent::EditFare {
        field,
        value: value.to_string(),
    }
}

fn parse_flexibility(input: &str) -> Result<Flexibility, CommandError> {
    match input.to_ascii_lowercase().as_str() {
        "yes" | "y" => Ok(Flexibility::Yes),
        "no" | "n" => Ok(Flexibility::No),
        "" => Err(CommandError::MissingArgument {
            command: "flex",
            expected: "yes or no",
        }),
        _ => Err(CommandError::InvalidFlexibility(input.to_string())),
    }
}

fn parse_row_edit(input: &str) -> Result<UiEvent, CommandError> {
    let (id, rest) = split_word(input);
    let (field, value) = split_word(rest);
    if id.is_empty() || field.is_empty() {
        return Err(CommandError::MissingArgument {
            command: "row",
            expected: "<id> type|old|new <value>",
        });
    }

    let id: RowId = id.parse()?;
    let field = match field.to_ascii_lowercase().as_str() {
        "type" => RowField::TaxType,
        "old" => RowField::OldFare,
        "new" => RowField::NewFare,
        _ => return Err(CommandError::InvalidRowField(field.to_string())),
    };

    Ok(UiEvent::EditRow {
        id,
        field,
        value: value.to_string(),
    })
}
