//! Terminal front end for the binary.
//!
//! Parses one command per input line and renders the view container as
//! text. The mounted view's region is printed to stdout after every
//! command, standing in for the page body.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::application::{FlashKind, FormInput, MountedView, NavigationController, Panel, Region};
use crate::domain::Route;

/// A line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Change the location fragment.
    Go(String),
    Login { username: String, password: String },
    Register { username: String, password: String },
    Score(String),
    Refresh(Option<String>),
    Logout,
    Show,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("Empty command")]
    Empty,

    #[error("Unknown command '{0}' (type 'help')")]
    Unknown(String),

    #[error("Usage: {0}")]
    Usage(&'static str),
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            return Err(CommandError::Empty);
        };
        let args: Vec<&str> = words.collect();

        if head.starts_with('#') && args.is_empty() {
            return Ok(Command::Go(head.to_string()));
        }

        match (head.to_ascii_lowercase().as_str(), args.as_slice()) {
            ("go", [fragment]) => Ok(Command::Go(fragment.to_string())),
            ("go", _) => Err(CommandError::Usage("go <fragment>")),
            ("login", [username, password]) => Ok(Command::Login {
                username: username.to_string(),
                password: password.to_string(),
            }),
            ("login", _) => Err(CommandError::Usage("login <username> <password>")),
            ("register", [username, password]) => Ok(Command::Register {
                username: username.to_string(),
                password: password.to_string(),
            }),
            ("register", _) => Err(CommandError::Usage("register <username> <password>")),
            ("score", [value]) => Ok(Command::Score(value.to_string())),
            ("score", _) => Err(CommandError::Usage("score <number>")),
            ("refresh", []) => Ok(Command::Refresh(None)),
            ("refresh", [limit]) => Ok(Command::Refresh(Some(limit.to_string()))),
            ("refresh", _) => Err(CommandError::Usage("refresh [limit]")),
            ("logout", []) => Ok(Command::Logout),
            ("show", []) => Ok(Command::Show),
            ("help", _) => Ok(Command::Help),
            ("quit" | "exit", []) => Ok(Command::Quit),
            _ => Err(CommandError::Unknown(head.to_string())),
        }
    }
}

pub const HELP: &str = "\
Commands:
  #<route> | go <route>          navigate (login, register, profile, scores)
  login <username> <password>    submit the login form
  register <username> <password> submit the registration form
  score <number>                 update your score (profile)
  refresh [limit]                reload the scoreboard
  logout                         sign out
  show                           redraw the screen
  quit                           exit";

/// What the input loop should do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Applies a command to the controller.
pub async fn execute(controller: &NavigationController, command: Command) -> Flow {
    let outcome: Option<MountedView> = match command {
        Command::Go(fragment) => controller.navigate(&fragment).await,
        Command::Login { username, password } => {
            controller.submit(FormInput::login(username, password)).await
        }
        Command::Register { username, password } => {
            controller
                .submit(FormInput::register(username, password))
                .await
        }
        Command::Score(value) => controller.submit(FormInput::score(value)).await,
        Command::Refresh(limit) => {
            controller
                .submit(FormInput::scoreboard(limit.as_deref()))
                .await
        }
        Command::Logout => Some(controller.logout().await),
        Command::Show | Command::Help => None,
        Command::Quit => return Flow::Quit,
    };

    if let Some(mounted) = outcome {
        tracing::debug!(route = %mounted.route, generation = mounted.generation, "Mounted");
    }
    Flow::Continue
}

/// Escapes control characters so server-supplied text cannot drive the terminal.
fn printable(text: &str) -> Cow<'_, str> {
    if !text.chars().any(char::is_control) {
        return Cow::Borrowed(text);
    }
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_control() {
            escaped.extend(c.escape_default());
        } else {
            escaped.push(c);
        }
    }
    Cow::Owned(escaped)
}

/// Text rendering of the mounted view.
pub struct Screen<'a> {
    pub route: Option<Route>,
    pub region: &'a Region,
}

impl fmt::Display for Screen<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tabs: Vec<String> = Route::ALL
            .iter()
            .map(|route| {
                if Some(*route) == self.route {
                    format!("[{}]", route)
                } else {
                    route.to_string()
                }
            })
            .collect();
        writeln!(f, "{}", tabs.join("  "))?;
        writeln!(f, "== {} ==", self.region.heading)?;

        match &self.region.panel {
            Panel::Blank => {}
            Panel::LoginForm => writeln!(f, "  login <username> <password>")?,
            Panel::RegisterForm => writeln!(f, "  register <username> <password>")?,
            Panel::Profile { card: None } => writeln!(f, "  ...")?,
            Panel::Profile { card: Some(card) } => {
                writeln!(f, "  User:  {}", printable(&card.username))?;
                writeln!(f, "  Score: {}", card.score)?;
            }
            Panel::Scoreboard { limit, rows } => {
                writeln!(f, "  Top {}", limit)?;
                for row in rows {
                    let username = printable(&row.username);
                    writeln!(f, "  {:>3}. {:<16} {:>8}", row.rank, username, row.score)?;
                }
            }
        }

        if self.region.busy {
            writeln!(f, "  (working...)")?;
        }
        if let Some(message) = &self.region.message {
            let tag = match message.kind {
                FlashKind::Info => "info",
                FlashKind::Success => "ok",
                FlashKind::Error => "error",
            };
            writeln!(f, "  [{}] {}", tag, printable(&message.text))?;
        }
        Ok(())
    }
}
