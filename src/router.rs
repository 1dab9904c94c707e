use planthabitat::{ScheduledActivation, Screen};

use crate::error::CommandError;

/// A parsed line of user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Login { username: String, password: String },
    OpenRegister,
    Register {
        username: String,
        password: String,
        confirm_password: String,
    },
    Back,
    Toggle { index: usize },
    Schedule {
        index: usize,
        activation: ScheduledActivation,
    },
    Unschedule { index: usize },
    Show,
    Logout,
    Help,
    Quit,
}

/// Route a line of input for the current screen
///
/// Verbs are case-insensitive; arguments are split on whitespace, so form
/// fields cannot contain spaces. Fields that are left out arrive as empty
/// strings and are rejected by the session gate, not here; surplus fields are
/// a usage error.
pub fn route_input(screen: Screen, line: &str) -> Result<Command, CommandError> {
    let mut parts = line.split_whitespace();
    let verb = match parts.next() {
        Some(verb) => verb.to_ascii_lowercase(),
        None => return Ok(Command::Help),
    };
    let args: Vec<&str> = parts.collect();

    match (screen, verb.as_str()) {
        (_, "quit") | (_, "exit") => Ok(Command::Quit),
        (_, "help") => Ok(Command::Help),

        (Screen::Login, "login") if args.len() > 2 => {
            Err(CommandError::Usage("login <username> <password>"))
        }
        (Screen::Login, "login") => Ok(Command::Login {
            username: field(&args, 0),
            password: field(&args, 1),
        }),
        (Screen::Login, "register") => Ok(Command::OpenRegister),

        (Screen::Register, "register") if args.len() > 3 => Err(CommandError::Usage(
            "register <username> <password> <confirm>",
        )),
        (Screen::Register, "register") => Ok(Command::Register {
            username: field(&args, 0),
            password: field(&args, 1),
            confirm_password: field(&args, 2),
        }),
        (Screen::Register, "back") => Ok(Command::Back),

        (Screen::Dashboard, "toggle") => match args.as_slice() {
            [device] => Ok(Command::Toggle {
                index: device_index(device)?,
            }),
            _ => Err(CommandError::Usage("toggle <n>")),
        },
        (Screen::Dashboard, "schedule") => match args.as_slice() {
            [device, date, time] => {
                let index = device_index(device)?;
                let activation = ScheduledActivation::parse(date, time)
                    .map_err(|_| CommandError::Usage("schedule <n> <YYYY-MM-DD> <HH:MM>"))?;
                Ok(Command::Schedule { index, activation })
            }
            _ => Err(CommandError::Usage("schedule <n> <YYYY-MM-DD> <HH:MM>")),
        },
        (Screen::Dashboard, "unschedule") => match args.as_slice() {
            [device] => Ok(Command::Unschedule {
                index: device_index(device)?,
            }),
            _ => Err(CommandError::Usage("unschedule <n>")),
        },
        (Screen::Dashboard, "show") => Ok(Command::Show),
        (Screen::Dashboard, "logout") => Ok(Command::Logout),

        _ => Err(CommandError::Unknown(verb)),
    }
}

/// Commands available on a screen, for the help text
pub fn help_text(screen: Screen) -> &'static str {
    match screen {
        Screen::Login => "login <username> <password> | register | quit",
        Screen::Register => "register <username> <password> <confirm> | back | quit",
        Screen::Dashboard => {
            "toggle <n> | schedule <n> <YYYY-MM-DD> <HH:MM> | unschedule <n> | show | logout | quit"
        }
    }
}

fn field(args: &[&str], position: usize) -> String {
    args.get(position).map(|s| s.to_string()).unwrap_or_default()
}

/// Parse a 1-based device number into a 0-based index
fn device_index(raw: &str) -> Result<usize, CommandError> {
    match raw.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n - 1),
        _ => Err(CommandError::InvalidDevice(raw.to_string())),
    }
}
