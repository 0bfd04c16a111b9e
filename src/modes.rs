use bitflags::bitflags;
use core::fmt;

/// IOKit pixel encoding names, paired with the depth code they report as.
/// The float entries carry made-up codes that scripts already rely on.
const PIXEL_ENCODINGS: [(&str, u32); 7] = [
    ("-32FR32FG32FB32", 96),                  // kIO32BitFloatPixels
    ("-16R16G16B16", 64),                     // kIO64BitDirectPixels
    ("-16FR16FG16FB16", 48),                  // kIO16BitFloatPixels
    ("--------RRRRRRRRGGGGGGGGBBBBBBBB", 32), // IO32BitDirectPixels
    ("--RRRRRRRRRRGGGGGGGGGGBBBBBBBBBB", 30), // kIO30BitDirectPixels
    ("-RRRRRGGGGGBBBBB", 16),                 // IO16BitDirectPixels
    ("PPPPPPPP", 8),                          // IO8BitIndexedPixels
];

/// Encoding reported for the common 8 bits per channel layout.
pub const DIRECT_32BIT_ENCODING: &str = "--------RRRRRRRRGGGGGGGGBBBBBBBB";

/// Maps a pixel encoding name to its bit depth, `0` when the name is unknown.
pub fn bit_depth(encoding: &str) -> u32 {
    PIXEL_ENCODINGS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(encoding))
        .map(|(_, depth)| *depth)
        .unwrap_or(0)
}

bitflags! {
    /// IO mode flags attached to a display mode by the driver.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ModeFlags: u32 {
        const VALID = 0x0000_0001;
        const SAFE = 0x0000_0002;
        const DEFAULT = 0x0000_0004;
        const ALWAYS_SHOW = 0x0000_0008;
        const NEVER_SHOW = 0x0000_0080;
        const NOT_RESIZE = 0x0000_0010;
        const REQUIRES_PAN = 0x0000_0020;
        const INTERLACED = 0x0000_0040;
        const SIMULSCAN = 0x0000_0100;
        const BUILT_IN = 0x0000_0400;
        const NOT_PRESET = 0x0000_0200;
        const STRETCHED = 0x0000_0800;
        const NOT_GRAPHICS_QUALITY = 0x0000_1000;
        const VALIDATE_AGAINST_DISPLAY = 0x0000_2000;
        const TELEVISION = 0x0010_0000;
        const VALID_FOR_MIRRORING = 0x0020_0000;
    }
}

/// A mode record as the display subsystem hands it out.
pub trait PlatformMode {
    fn width(&self) -> u64;
    fn height(&self) -> u64;
    fn refresh_rate(&self) -> f64;
    fn pixel_encoding(&self) -> String;
    fn io_flags(&self) -> ModeFlags {
        ModeFlags::empty()
    }
}

/// One hardware-advertised configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayMode {
    pub width: u64,
    pub height: u64,
    pub depth: u32,
    pub refresh_rate: f64,
}

impl DisplayMode {
    pub fn new(width: u64, height: u64, depth: u32, refresh_rate: f64) -> DisplayMode {
        DisplayMode {
            width,
            height,
            depth,
            refresh_rate,
        }
    }

    pub fn from_platform<M: PlatformMode>(mode: &M) -> DisplayMode {
        DisplayMode {
            width: mode.width(),
            height: mode.height(),
            depth: bit_depth(&mode.pixel_encoding()),
            refresh_rate: mode.refresh_rate(),
        }
    }
}

impl AsRef<DisplayMode> for DisplayMode {
    fn as_ref(&self) -> &DisplayMode {
        self
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}x{}x{}@{:.0}",
            self.width, self.height, self.depth, self.refresh_rate
        )
    }
}

/// One `list -verbose` line: the mode followed by its decoded IO flags.
pub fn describe_flags(display: usize, mode: &DisplayMode, flags: ModeFlags) -> String {
    let bit = |flag: ModeFlags| u8::from(flags.contains(flag));
    let mut names = String::new();
    if bitflags::parser::to_writer(&flags, &mut names).is_err() || names.is_empty() {
        names.push('-');
    }
    format!(
        "display: {} {:4}x{:4}x{:2}@{:.0} ioflags:{:4x} valid:{} safe:{} default:{} \
         alwaysshow:{} nevershow:{} notresize:{} requirepan:{} int:{} simul:{} \
         builtin:{} notpreset:{} stretched:{} notgfxqual:{} valagnstdisp:{} tv:{} vldmirror:{} [{}]",
        display,
        mode.width,
        mode.height,
        mode.depth,
        mode.refresh_rate,
        flags.bits(),
        bit(ModeFlags::VALID),
        bit(ModeFlags::SAFE),
        bit(ModeFlags::DEFAULT),
        bit(ModeFlags::ALWAYS_SHOW),
        bit(ModeFlags::NEVER_SHOW),
        bit(ModeFlags::NOT_RESIZE),
        bit(ModeFlags::REQUIRES_PAN),
        bit(ModeFlags::INTERLACED),
        bit(ModeFlags::SIMULSCAN),
        bit(ModeFlags::BUILT_IN),
        bit(ModeFlags::NOT_PRESET),
        bit(ModeFlags::STRETCHED),
        bit(ModeFlags::NOT_GRAPHICS_QUALITY),
        bit(ModeFlags::VALIDATE_AGAINST_DISPLAY),
        bit(ModeFlags::TELEVISION),
        bit(ModeFlags::VALID_FOR_MIRRORING),
        names
    )
}
