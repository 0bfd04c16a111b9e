use log::debug;

use crate::error::{Error, Result};
use crate::matcher;
use crate::modes::{DisplayMode, ModeFlags, PlatformMode};
use crate::request::ModeSpec;
use crate::system::DisplaySystem;

/// A platform mode together with the values derived from it.
#[derive(Debug, Clone)]
pub struct CatalogEntry<M> {
    pub mode: DisplayMode,
    pub flags: ModeFlags,
    pub raw: M,
}

impl<M: PlatformMode> CatalogEntry<M> {
    pub fn new(raw: M) -> CatalogEntry<M> {
        CatalogEntry {
            mode: DisplayMode::from_platform(&raw),
            flags: raw.io_flags(),
            raw,
        }
    }
}

impl<M> AsRef<DisplayMode> for CatalogEntry<M> {
    fn as_ref(&self) -> &DisplayMode {
        &self.mode
    }
}

/// Modes supported by one display, in the order the OS listed them.
/// Always read fresh; never cached between calls.
#[derive(Debug, Clone)]
pub struct ModeCatalog<M> {
    entries: Vec<CatalogEntry<M>>,
}

impl<M: PlatformMode> ModeCatalog<M> {
    pub fn from_platform(modes: Vec<M>) -> ModeCatalog<M> {
        ModeCatalog {
            entries: modes.into_iter().map(CatalogEntry::new).collect(),
        }
    }

    pub async fn load<S>(
        system: &S,
        display: &S::Handle,
        include_duplicates: bool,
    ) -> Result<ModeCatalog<M>>
    where
        S: DisplaySystem<Mode = M>,
    {
        let modes = system
            .copy_all_modes(display, include_duplicates)
            .await
            .ok_or(Error::CatalogUnavailable)?;
        debug!("display {:?} reports {} modes", display, modes.len());
        Ok(ModeCatalog::from_platform(modes))
    }

    pub fn entries(&self) -> &[CatalogEntry<M>] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn modes(&self) -> impl Iterator<Item = &DisplayMode> {
        self.entries.iter().map(|entry| &entry.mode)
    }

    pub fn find_exact(&self, spec: &ModeSpec) -> Result<&CatalogEntry<M>> {
        matcher::find_exact(&self.entries, spec)
    }

    pub fn find_maximum(&self) -> Result<&CatalogEntry<M>> {
        matcher::find_maximum(&self.entries)
    }

    pub fn sorted(&self) -> Vec<&CatalogEntry<M>> {
        matcher::sorted(&self.entries)
    }
}

/// The mode the display is using right now.
pub async fn current_mode<S: DisplaySystem>(
    system: &S,
    display: &S::Handle,
) -> Result<CatalogEntry<S::Mode>> {
    system
        .copy_current_mode(display)
        .await
        .map(CatalogEntry::new)
        .ok_or(Error::NoCurrentMode)
}
