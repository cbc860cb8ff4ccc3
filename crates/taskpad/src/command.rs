//! Line commands understood by the front end

use chrono::NaiveDate;
use thiserror::Error;

use taskpad_core::task::TaskPriority;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("Unknown command: {0} (try `help`)")]
    Unknown(String),

    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error("Title cannot be empty")]
    EmptyTitle,

    #[error("Invalid priority: {0} (expected low, medium or high)")]
    InvalidPriority(String),

    #[error("Invalid date: {0} (expected YYYY-MM-DD or none)")]
    InvalidDate(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add(String),
    List,
    Show(String),
    Done(String),
    Remove(String),
    Sub { task: String, title: String },
    SubDone { task: String, subtask: String },
    Rename { task: String, title: String },
    Priority { task: String, priority: TaskPriority },
    Due { task: String, date: Option<NaiveDate> },
    Stats,
    Help,
    Quit,
}

pub const HELP: &str = "\
Commands:
  add <title>                    create a task (try \"Call John tomorrow\")
  list                           show tasks grouped by urgency
  show <id>                      show one task with its subtasks
  done <id>                      toggle a task's completed flag
  rm <id>                        delete a task and its subtasks
  sub <id> <title>               add a subtask
  subdone <id> <subid>           toggle a subtask's completed flag
  rename <id> <title>            change a task's title
  priority <id> <low|medium|high>
  due <id> <YYYY-MM-DD|none>     set or clear the due date
  stats                          show counts and completion rate
  help                           show this help
  quit                           exit
Ids may be shortened to any unique prefix.";

/// Split off the first whitespace-delimited word
fn split_word(input: &str) -> (&str, &str) {
    let input = input.trim();
    match input.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (input, ""),
    }
}

fn title(raw: &str) -> Result<String, CommandError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(CommandError::EmptyTitle);
    }
    Ok(raw.to_string())
}

fn id(raw: &str, usage: &'static str) -> Result<String, CommandError> {
    let (id, rest) = split_word(raw);
    if id.is_empty() || !rest.is_empty() {
        return Err(CommandError::Usage(usage));
    }
    Ok(id.to_string())
}

fn id_and_rest(raw: &str, usage: &'static str) -> Result<(String, String), CommandError> {
    let (id, rest) = split_word(raw);
    if id.is_empty() || rest.is_empty() {
        return Err(CommandError::Usage(usage));
    }
    Ok((id.to_string(), rest.to_string()))
}

impl Command {
    /// Parse one input line. Blank lines yield `None`.
    pub fn parse(line: &str) -> Result<Option<Self>, CommandError> {
        let (name, rest) = split_word(line);
        if name.is_empty() {
            return Ok(None);
        }

        let command = match name.to_ascii_lowercase().as_str() {
            "add" => Self::Add(title(rest)?),
            "list" | "ls" => Self::List,
            "show" => Self::Show(id(rest, "show <id>")?),
            "done" => Self::Done(id(rest, "done <id>")?),
            "rm" | "delete" => Self::Remove(id(rest, "rm <id>")?),
            "sub" => {
                let (task, title_raw) = id_and_rest(rest, "sub <id> <title>")?;
                Self::Sub {
                    task,
                    title: title(&title_raw)?,
                }
            }
            "subdone" => {
                let (task, subtask) = id_and_rest(rest, "subdone <id> <subid>")?;
                Self::SubDone {
                    task,
                    subtask: id(&subtask, "subdone <id> <subid>")?,
                }
            }
            "rename" => {
                let (task, title_raw) = id_and_rest(rest, "rename <id> <title>")?;
                Self::Rename {
                    task,
                    title: title(&title_raw)?,
                }
            }
            "priority" => {
                let (task, raw) = id_and_rest(rest, "priority <id> <low|medium|high>")?;
                let priority = raw
                    .parse::<TaskPriority>()
                    .map_err(|_| CommandError::InvalidPriority(raw.clone()))?;
                Self::Priority { task, priority }
            }
            "due" => {
                let (task, raw) = id_and_rest(rest, "due <id> <YYYY-MM-DD|none>")?;
                let date = if raw.eq_ignore_ascii_case("none") {
                    None
                } else {
                    Some(
                        NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
                            .map_err(|_| CommandError::InvalidDate(raw.clone()))?,
                    )
                };
                Self::Due { task, date }
            }
            "stats" => Self::Stats,
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            other => return Err(CommandError::Unknown(other.to_string())),
        };
        Ok(Some(command))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Command {
        Command::parse(line).unwrap().unwrap()
    }

    #[test]
    fn test_blank_line() {
        assert_eq!(Command::parse("   ").unwrap(), None);
    }

    #[test]
    fn test_add_keeps_inner_spacing_trimmed() {
        assert_eq!(parse("add   Call John tomorrow  "), Command::Add("Call John tomorrow".into()));
        assert_eq!(Command::parse("add   "), Err(CommandError::EmptyTitle));
    }

    #[test]
    fn test_id_commands() {
        assert_eq!(parse("done 3f2a"), Command::Done("3f2a".into()));
        assert_eq!(parse("RM 3f2a"), Command::Remove("3f2a".into()));
        assert_eq!(Command::parse("show"), Err(CommandError::Usage("show <id>")));
        assert_eq!(Command::parse("done a b"), Err(CommandError::Usage("done <id>")));
    }

    #[test]
    fn test_subtask_commands() {
        assert_eq!(
            parse("sub 3f2a Find number"),
            Command::Sub {
                task: "3f2a".into(),
                title: "Find number".into()
            }
        );
        assert_eq!(
            parse("subdone 3f2a 91bc"),
            Command::SubDone {
                task: "3f2a".into(),
                subtask: "91bc".into()
            }
        );
        assert_eq!(
            Command::parse("sub 3f2a"),
            Err(CommandError::Usage("sub <id> <title>"))
        );
    }

    #[test]
    fn test_priority_and_due() {
        assert_eq!(
            parse("priority 3f2a HIGH"),
            Command::Priority {
                task: "3f2a".into(),
                priority: TaskPriority::High
            }
        );
        assert_eq!(
            Command::parse("priority 3f2a critical"),
            Err(CommandError::InvalidPriority("critical".into()))
        );
        assert_eq!(
            parse("due 3f2a 2024-05-02"),
            Command::Due {
                task: "3f2a".into(),
                date: NaiveDate::from_ymd_opt(2024, 5, 2)
            }
        );
        assert_eq!(
            parse("due 3f2a none"),
            Command::Due {
                task: "3f2a".into(),
                date: None
            }
        );
        assert_eq!(
            Command::parse("due 3f2a friday"),
            Err(CommandError::InvalidDate("friday".into()))
        );
    }

    #[test]
    fn test_unknown() {
        assert_eq!(
            Command::parse("frobnicate"),
            Err(CommandError::Unknown("frobnicate".into()))
        );
    }
}
