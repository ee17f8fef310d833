//! Named user commands, as bound to global keys by the host.

use crate::error::ApiError;
use crate::types::CycleDirection;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Command {
    FocusNextWindow,
    FocusPreviousWindow,
    MoveTabsNextWindow,
    MoveTabsPreviousWindow,
}

/// What a command does once dispatched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandAction {
    Focus(CycleDirection),
    Relocate(CycleDirection),
}

impl Command {
    pub const ALL: [Command; 4] = [
        Command::FocusNextWindow,
        Command::FocusPreviousWindow,
        Command::MoveTabsNextWindow,
        Command::MoveTabsPreviousWindow,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Command::FocusNextWindow => "focus-next-window",
            Command::FocusPreviousWindow => "focus-previous-window",
            Command::MoveTabsNextWindow => "move-tabs-next-window",
            Command::MoveTabsPreviousWindow => "move-tabs-previous-window",
        }
    }

    pub fn action(self) -> CommandAction {
        match self {
            Command::FocusNextWindow => CommandAction::Focus(CycleDirection::Next),
            Command::FocusPreviousWindow => CommandAction::Focus(CycleDirection::Previous),
            Command::MoveTabsNextWindow => CommandAction::Relocate(CycleDirection::Next),
            Command::MoveTabsPreviousWindow => CommandAction::Relocate(CycleDirection::Previous),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Command {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Command::ALL
            .into_iter()
            .find(|command| command.name() == s)
            .ok_or_else(|| ApiError::InvalidArgument(format!("Unknown command: {s}")))
    }
}

impl TryFrom<String> for Command {
    type Error = ApiError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Command> for String {
    fn from(command: Command) -> Self {
        command.name().to_string()
    }
}
