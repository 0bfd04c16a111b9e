use core::fmt;
use num_derive::FromPrimitive;
use num_traits::FromPrimitive;
use thiserror::Error;

use crate::request::ModeSpec;

/// Raw status code reported by the display subsystem.
pub type PlatformCode = i32;

/// Status codes in CoreGraphics numbering. Backends that are not
/// CoreGraphics map their failures onto these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive)]
pub enum StatusCode {
    Success = 0,
    Failure = 1000,
    IllegalArgument = 1001,
    InvalidConnection = 1002,
    InvalidContext = 1003,
    CannotComplete = 1004,
    NotImplemented = 1006,
    RangeCheck = 1007,
    TypeCheck = 1008,
    InvalidOperation = 1010,
    NoneAvailable = 1011,
}

impl StatusCode {
    pub fn code(self) -> PlatformCode {
        self as PlatformCode
    }

    pub fn from_code(code: PlatformCode) -> Option<StatusCode> {
        StatusCode::from_i32(code)
    }
}

/// The three ordered stages of a configuration session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigStage {
    Begin,
    Configure,
    Complete,
}

impl fmt::Display for ConfigStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConfigStage::Begin => "begin",
            ConfigStage::Configure => "configure",
            ConfigStage::Complete => "complete",
        };
        f.write_str(name)
    }
}

/// Formats a platform code as `1001 (IllegalArgument)` when the name is known.
pub struct CodeName(pub PlatformCode);

fn code_name(code: &PlatformCode) -> CodeName {
    CodeName(*code)
}

impl fmt::Display for CodeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match StatusCode::from_code(self.0) {
            Some(status) => write!(f, "{} ({:?})", self.0, status),
            None => write!(f, "{}", self.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("failed trying to look up modes")]
    CatalogUnavailable,
    #[error("unable to copy current display mode")]
    NoCurrentMode,
    #[error("display reports no modes")]
    EmptyCatalog,
    #[error("the mode '{0}' couldn't be parsed")]
    MalformedSpec(String),
    #[error("mode {0} not available")]
    ModeNotFound(ModeSpec),
    #[error("failed {stage} display configuration err({})", code_name(.code))]
    ConfigurationStageFailure {
        stage: ConfigStage,
        code: PlatformCode,
    },
    #[error("failed to get list of active displays err({})", code_name(.0))]
    DisplayList(PlatformCode),
    #[error("display subsystem unavailable: {0}")]
    Unavailable(String),
}

impl Error {
    /// Errors that stop the whole run instead of a single display.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::DisplayList(_) | Error::Unavailable(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
