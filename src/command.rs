use crate::request::SKIP_TOKEN;

/// What to do with one display during `set`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetDirective {
    Skip,
    Apply(String),
}

impl From<&str> for SetDirective {
    fn from(token: &str) -> SetDirective {
        if token == SKIP_TOKEN {
            SetDirective::Skip
        } else {
            SetDirective::Apply(token.to_string())
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Get,
    GetMax,
    List { verbose: bool },
    /// One directive per display, in enumeration order.
    Set(Vec<SetDirective>),
    Version,
    Help,
    Unknown(String),
}

impl Command {
    /// Builds a command from the word after the program name and the rest
    /// of the line. Tokens are taken verbatim; mode tokens are parsed per
    /// display later.
    pub fn from_args<S: AsRef<str>>(name: &str, args: &[S]) -> Command {
        match name {
            "get" => Command::Get,
            "getMax" => Command::GetMax,
            "list" => Command::List {
                verbose: args
                    .iter()
                    .any(|arg| matches!(arg.as_ref(), "-verbose" | "--verbose" | "-v")),
            },
            "set" => Command::Set(
                args.iter()
                    .map(|arg| SetDirective::from(arg.as_ref()))
                    .collect(),
            ),
            "-version" | "--version" => Command::Version,
            "help" | "-help" | "--help" | "-h" => Command::Help,
            other => Command::Unknown(other.to_string()),
        }
    }

    /// Whether the command works on the active displays at all.
    pub fn needs_displays(&self) -> bool {
        matches!(
            self,
            Command::Get | Command::GetMax | Command::List { .. } | Command::Set(_)
        )
    }
}

pub const USAGE: &str = "\
usage: displayres <command> [args]

commands:
  get                     print the current mode of every active display
  getMax                  print the largest mode every active display supports
  list [-verbose]         print every mode each active display supports
  set <mode> [<mode>...]  set one mode per display, in display order
  -version                print version information
  help                    print this text

modes are WIDTHxHEIGHTxDEPTH@REFRESH or WIDTHxHEIGHTxDEPTH (refresh 60Hz);
use 'skip' to leave a display as it is.";
