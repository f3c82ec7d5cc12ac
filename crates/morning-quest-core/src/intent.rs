//! User intents forwarded from a renderer.
//!
//! Intents also parse from short command lines (`toggle 2`, `start 1`,
//! `add Pack lunch`, `quest`), which is how the interactive CLI reads them.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::routine::{DepartureTime, TaskId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "intent", rename_all = "snake_case")]
pub enum Intent {
    ToggleTask { id: TaskId },
    /// Same gesture starts and stops.
    StartStopTimer { id: TaskId },
    StopTimer,
    AddTask {
        label: String,
        #[serde(default)]
        icon: Option<String>,
    },
    RemoveTask { id: TaskId },
    /// Raw form value; coerced by the engine.
    UpdateDuration { id: TaskId, value: String },
    /// Raw form value; coerced by the engine.
    UpdateReward { id: TaskId, value: String },
    SetDepartureTime { departure: DepartureTime },
    CompleteQuest,
}

impl Intent {
    /// Whether applying this intent can change the persisted snapshot.
    pub fn touches_snapshot(&self) -> bool {
        !matches!(self, Intent::StartStopTimer { .. } | Intent::StopTimer)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IntentParseError {
    #[error("empty command")]
    Empty,
    #[error("unknown command '{0}'")]
    UnknownCommand(String),
    #[error("'{command}' needs {what}")]
    MissingArgument {
        command: &'static str,
        what: &'static str,
    },
    #[error("invalid task id '{0}'")]
    InvalidId(String),
    #[error(transparent)]
    Departure(#[from] crate::error::ValidationError),
}

impl FromStr for Intent {
    type Err = IntentParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (command, rest) = line
            .split_once(char::is_whitespace)
            .map(|(c, r)| (c, r.trim()))
            .unwrap_or((line, ""));
        if command.is_empty() {
            return Err(IntentParseError::Empty);
        }

        let id_arg = |command: &'static str, raw: &str| -> Result<TaskId, IntentParseError> {
            if raw.is_empty() {
                return Err(IntentParseError::MissingArgument {
                    command,
                    what: "a task id",
                });
            }
            raw.parse()
                .map_err(|_| IntentParseError::InvalidId(raw.to_string()))
        };
        let id_and_value = |command: &'static str| -> Result<(TaskId, String), IntentParseError> {
            let (id, value) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
            Ok((id_arg(command, id)?, value.trim().to_string()))
        };

        match command.to_ascii_lowercase().as_str() {
            "toggle" | "done" => Ok(Intent::ToggleTask {
                id: id_arg("toggle", rest)?,
            }),
            "start" => Ok(Intent::StartStopTimer {
                id: id_arg("start", rest)?,
            }),
            "stop" => Ok(Intent::StopTimer),
            "add" => {
                if rest.is_empty() {
                    return Err(IntentParseError::MissingArgument {
                        command: "add",
                        what: "a label",
                    });
                }
                Ok(Intent::AddTask {
                    label: rest.to_string(),
                    icon: None,
                })
            }
            "remove" | "rm" => Ok(Intent::RemoveTask {
                id: id_arg("remove", rest)?,
            }),
            "duration" => {
                let (id, value) = id_and_value("duration")?;
                Ok(Intent::UpdateDuration { id, value })
            }
            "reward" | "points" => {
                let (id, value) = id_and_value("reward")?;
                Ok(Intent::UpdateReward { id, value })
            }
            "depart" => {
                if rest.is_empty() {
                    return Err(IntentParseError::MissingArgument {
                        command: "depart",
                        what: "a time (HH:MM)",
                    });
                }
                Ok(Intent::SetDepartureTime {
                    departure: DepartureTime::parse(rest)?,
                })
            }
            "quest" | "complete" => Ok(Intent::CompleteQuest),
            _ => Err(IntentParseError::UnknownCommand(command.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands() {
        assert_eq!("toggle 2".parse::<Intent>(), Ok(Intent::ToggleTask { id: TaskId(2) }));
        assert_eq!(" START 1 ".parse::<Intent>(), Ok(Intent::StartStopTimer { id: TaskId(1) }));
        assert_eq!("stop".parse::<Intent>(), Ok(Intent::StopTimer));
        assert_eq!(
            "add Pack   lunch".parse::<Intent>(),
            Ok(Intent::AddTask {
                label: "Pack   lunch".into(),
                icon: None
            })
        );
        assert_eq!(
            "duration 3 abc".parse::<Intent>(),
            Ok(Intent::UpdateDuration {
                id: TaskId(3),
                value: "abc".into()
            })
        );
        assert_eq!(
            "reward 3".parse::<Intent>(),
            Ok(Intent::UpdateReward {
                id: TaskId(3),
                value: String::new()
            })
        );
        assert_eq!(
            "depart 7:50".parse::<Intent>(),
            Ok(Intent::SetDepartureTime {
                departure: DepartureTime::new(7, 50).unwrap()
            })
        );
        assert_eq!("quest".parse::<Intent>(), Ok(Intent::CompleteQuest));
    }

    #[test]
    fn rejects_malformed_commands() {
        assert_eq!("".parse::<Intent>(), Err(IntentParseError::Empty));
        assert!(matches!("dance".parse::<Intent>(), Err(IntentParseError::UnknownCommand(_))));
        assert!(matches!("toggle".parse::<Intent>(), Err(IntentParseError::MissingArgument { .. })));
        assert!(matches!("toggle x".parse::<Intent>(), Err(IntentParseError::InvalidId(_))));
        assert!(matches!("add".parse::<Intent>(), Err(IntentParseError::MissingArgument { .. })));
        assert!(matches!("depart noon".parse::<Intent>(), Err(IntentParseError::Departure(_))));
    }

    #[test]
    fn timer_intents_do_not_touch_snapshot() {
        assert!(!Intent::StopTimer.touches_snapshot());
        assert!(!Intent::StartStopTimer { id: TaskId(1) }.touches_snapshot());
        assert!(Intent::CompleteQuest.touches_snapshot());
    }
}
