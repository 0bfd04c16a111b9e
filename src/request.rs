use core::fmt;

use crate::error::{Error, Result};
use crate::modes::DisplayMode;

/// Refresh rate assumed when a mode token leaves it out.
pub const DEFAULT_REFRESH_RATE: f64 = 60.0;

/// Token that leaves a display untouched during `set`.
pub const SKIP_TOKEN: &str = "skip";

/// A requested mode. Every populated field must match exactly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModeSpec {
    pub width: u64,
    pub height: u64,
    pub depth: u32,
    pub refresh_rate: Option<f64>,
}

impl ModeSpec {
    pub fn matches(&self, mode: &DisplayMode) -> bool {
        mode.width == self.width
            && mode.height == self.height
            && mode.depth == self.depth
            && self.refresh_rate.map_or(true, |rate| mode.refresh_rate == rate)
    }
}

impl fmt::Display for ModeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}x{}", self.width, self.height, self.depth)?;
        match self.refresh_rate {
            Some(rate) => write!(f, "@{rate}"),
            None => Ok(()),
        }
    }
}

/// Non-fatal notes produced while parsing a token.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpecWarning {
    RefreshAssumed(f64),
}

impl fmt::Display for SpecWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpecWarning::RefreshAssumed(rate) => {
                write!(f, "no refresh rate specified, assuming {rate:.0}Hz")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedSpec {
    pub spec: ModeSpec,
    pub warning: Option<SpecWarning>,
}

/// Parses `WxHxD@R` or `WxHxD`. Anything else, including trailing
/// characters, is rejected.
pub fn parse_spec(token: &str) -> Result<ParsedSpec> {
    let malformed = || Error::MalformedSpec(token.to_string());
    let (dims, refresh) = match token.split_once('@') {
        Some((dims, refresh)) => (dims, Some(refresh)),
        None => (token, None),
    };

    let mut fields = dims.split('x');
    let width = fields.next().and_then(parse_uint).ok_or_else(malformed)?;
    let height = fields.next().and_then(parse_uint).ok_or_else(malformed)?;
    let depth = fields
        .next()
        .and_then(parse_uint)
        .and_then(|d| u32::try_from(d).ok())
        .ok_or_else(malformed)?;
    if fields.next().is_some() {
        return Err(malformed());
    }

    let (refresh_rate, warning) = match refresh {
        Some(text) => (parse_rate(text).ok_or_else(malformed)?, None),
        None => (
            DEFAULT_REFRESH_RATE,
            Some(SpecWarning::RefreshAssumed(DEFAULT_REFRESH_RATE)),
        ),
    };

    Ok(ParsedSpec {
        spec: ModeSpec {
            width,
            height,
            depth,
            refresh_rate: Some(refresh_rate),
        },
        warning,
    })
}

fn parse_uint(text: &str) -> Option<u64> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

fn parse_rate(text: &str) -> Option<f64> {
    let (whole, frac) = text.split_once('.').unwrap_or((text, ""));
    let digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if (whole.is_empty() && frac.is_empty()) || !digits(whole) || !digits(frac) {
        return None;
    }
    text.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn full_token_populates_every_field() {
        let parsed = parse_spec("1920x1080x32@60").unwrap();
        assert_eq!(
            parsed.spec,
            ModeSpec {
                width: 1920,
                height: 1080,
                depth: 32,
                refresh_rate: Some(60.0)
            }
        );
        assert_eq!(parsed.warning, None);
    }

    #[test]
    fn fractional_refresh_rate() {
        let parsed = parse_spec("2560x1440x30@59.94").unwrap();
        assert_eq!(parsed.spec.refresh_rate, Some(59.94));
        let parsed = parse_spec("640x480x8@.5").unwrap();
        assert_eq!(parsed.spec.refresh_rate, Some(0.5));
    }

    #[test]
    fn missing_refresh_defaults_with_warning() {
        let parsed = parse_spec("1920x1080x32").unwrap();
        assert_eq!(parsed.spec.refresh_rate, Some(60.0));
        assert_eq!(parsed.warning, Some(SpecWarning::RefreshAssumed(60.0)));
        assert_eq!(
            parsed.warning.unwrap().to_string(),
            "no refresh rate specified, assuming 60Hz"
        );
    }

    #[test]
    fn rejects_other_shapes() {
        for token in [
            "1920x1080",
            "",
            "skip",
            "1920x1080x32@",
            "1920x1080x32@60Hz",
            "1920x1080x32x8",
            "1920x1080x32 ",
            " 1920x1080x32",
            "1920xx32",
            "-1920x1080x32",
            "1920x1080x32@-60",
            "1920x1080x32@inf",
            "1920x1080x32@.",
            "1920x1080x32@60@60",
            "1920X1080X32",
        ] {
            assert_eq!(
                parse_spec(token),
                Err(Error::MalformedSpec(token.to_string())),
                "{token:?}"
            );
        }
    }

    #[test]
    fn omitted_refresh_matches_any_rate() {
        let spec = ModeSpec {
            width: 800,
            height: 600,
            depth: 32,
            refresh_rate: None,
        };
        assert!(spec.matches(&DisplayMode::new(800, 600, 32, 75.0)));
        assert!(!spec.matches(&DisplayMode::new(800, 600, 16, 75.0)));
        assert_eq!(spec.to_string(), "800x600x32");
    }
}
