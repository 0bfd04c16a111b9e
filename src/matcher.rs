use std::cmp::Ordering;

use crate::error::{Error, Result};
use crate::modes::DisplayMode;
use crate::request::ModeSpec;

/// Canonical mode order: width, height, refresh rate, then depth, ascending.
pub fn compare_modes(a: &DisplayMode, b: &DisplayMode) -> Ordering {
    a.width
        .cmp(&b.width)
        .then(a.height.cmp(&b.height))
        .then(a.refresh_rate.total_cmp(&b.refresh_rate))
        .then(a.depth.cmp(&b.depth))
}

/// First mode in catalog order matching every populated field of `spec`.
pub fn find_exact<'a, T: AsRef<DisplayMode>>(
    catalog: impl IntoIterator<Item = &'a T>,
    spec: &ModeSpec,
) -> Result<&'a T>
where
    T: 'a,
{
    catalog
        .into_iter()
        .find(|candidate| spec.matches(candidate.as_ref()))
        .ok_or(Error::ModeNotFound(*spec))
}

/// Greatest mode under [`compare_modes`]; the earliest one wins ties.
pub fn find_maximum<'a, T: AsRef<DisplayMode>>(
    catalog: impl IntoIterator<Item = &'a T>,
) -> Result<&'a T>
where
    T: 'a,
{
    catalog
        .into_iter()
        .fold(None, |best: Option<&'a T>, candidate| match best {
            Some(current)
                if compare_modes(candidate.as_ref(), current.as_ref()) != Ordering::Greater =>
            {
                Some(current)
            }
            _ => Some(candidate),
        })
        .ok_or(Error::EmptyCatalog)
}

/// Catalog in display order, independent of how the OS enumerated it.
pub fn sorted<'a, T: AsRef<DisplayMode>>(catalog: impl IntoIterator<Item = &'a T>) -> Vec<&'a T>
where
    T: 'a,
{
    let mut modes: Vec<&T> = catalog.into_iter().collect();
    modes.sort_by(|a, b| compare_modes(a.as_ref(), b.as_ref()));
    modes
}
