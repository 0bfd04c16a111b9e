use core_foundation::base::TCFType;
use core_foundation::boolean::CFBoolean;
use core_foundation::dictionary::CFDictionary;
use core_foundation::string::{CFString, CFStringRef};
use core_graphics::display::{
    CGConfigureOption, CGDirectDisplayID, CGDisplay, CGDisplayConfigRef, CGDisplayMode,
};
use log::{debug, warn};

use crate::error::{CodeName, Error, PlatformCode, Result};
use crate::modes::{ModeFlags, PlatformMode};
use crate::system::DisplaySystem;

#[link(name = "CoreGraphics", kind = "framework")]
extern "C" {
    static kCGDisplayShowDuplicateLowResolutionModes: CFStringRef;
}

/// CoreGraphics display services.
#[derive(Debug, Default)]
pub struct QuartzDisplays;

pub struct QuartzMode(CGDisplayMode);

impl PlatformMode for QuartzMode {
    fn width(&self) -> u64 {
        self.0.width()
    }

    fn height(&self) -> u64 {
        self.0.height()
    }

    fn refresh_rate(&self) -> f64 {
        self.0.refresh_rate()
    }

    fn pixel_encoding(&self) -> String {
        self.0.pixel_encoding().to_string()
    }

    fn io_flags(&self) -> ModeFlags {
        ModeFlags::from_bits_retain(self.0.io_flags())
    }
}

/// An open `CGBeginDisplayConfiguration` session.
pub struct QuartzTransaction {
    config_ref: CGDisplayConfigRef,
}

impl QuartzDisplays {
    pub fn new() -> QuartzDisplays {
        QuartzDisplays
    }
}

impl DisplaySystem for QuartzDisplays {
    type Handle = CGDirectDisplayID;
    type Mode = QuartzMode;
    type Transaction = QuartzTransaction;

    async fn active_displays(&self) -> Result<Vec<CGDirectDisplayID>> {
        CGDisplay::active_displays().map_err(Error::DisplayList)
    }

    async fn copy_all_modes(
        &self,
        display: &CGDirectDisplayID,
        include_duplicates: bool,
    ) -> Option<Vec<QuartzMode>> {
        let modes = if include_duplicates {
            let key = unsafe { CFString::wrap_under_get_rule(kCGDisplayShowDuplicateLowResolutionModes) };
            let options = CFDictionary::from_CFType_pairs(&[(key, CFBoolean::true_value())]);
            CGDisplayMode::all_display_modes(*display, options.as_concrete_TypeRef())
        } else {
            CGDisplayMode::all_display_modes(*display, std::ptr::null())
        }?;
        Some(modes.into_iter().map(QuartzMode).collect())
    }

    async fn copy_current_mode(&self, display: &CGDirectDisplayID) -> Option<QuartzMode> {
        CGDisplay::new(*display).display_mode().map(QuartzMode)
    }

    async fn display_name(&self, display: &CGDirectDisplayID) -> Option<String> {
        let display = CGDisplay::new(*display);
        let kind = if display.is_builtin() { "built-in" } else { "external" };
        Some(format!(
            "{} {:04x}:{:04x}",
            kind,
            display.vendor_number(),
            display.model_number()
        ))
    }

    async fn begin_configuration(&self) -> std::result::Result<QuartzTransaction, PlatformCode> {
        let config_ref = CGDisplay::main().begin_configuration()?;
        Ok(QuartzTransaction { config_ref })
    }

    async fn configure_display(
        &self,
        transaction: &mut QuartzTransaction,
        display: &CGDirectDisplayID,
        mode: &QuartzMode,
    ) -> std::result::Result<(), PlatformCode> {
        CGDisplay::new(*display).configure_display_with_display_mode(&transaction.config_ref, &mode.0)
    }

    async fn complete_configuration(
        &self,
        transaction: QuartzTransaction,
    ) -> std::result::Result<(), PlatformCode> {
        CGDisplay::main()
            .complete_configuration(&transaction.config_ref, CGConfigureOption::ConfigureForSession)
    }

    async fn cancel_configuration(&self, transaction: QuartzTransaction) {
        match CGDisplay::main().cancel_configuration(&transaction.config_ref) {
            Ok(()) => debug!("display configuration cancelled"),
            Err(code) => warn!("failed CGCancelDisplayConfiguration err({})", CodeName(code)),
        }
    }
}
