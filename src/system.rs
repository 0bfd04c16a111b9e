use core::fmt::Debug;

use crate::error::{PlatformCode, Result};
use crate::modes::PlatformMode;

/// The operating system's display subsystem, as far as this tool needs it.
///
/// Every call completes before the next one is issued; implementations do
/// not need to be `Send` or `Sync`.
#[allow(async_fn_in_trait)]
pub trait DisplaySystem {
    /// Opaque display identifier. Only valid for the current process.
    type Handle: Clone + Debug;
    /// Mode record owned by the platform.
    type Mode: PlatformMode;
    /// An open configuration session.
    type Transaction;

    /// Active displays, in the order the OS reports them.
    async fn active_displays(&self) -> Result<Vec<Self::Handle>>;

    /// All modes the display supports, or `None` when the OS has no data.
    /// `include_duplicates` asks for low resolution duplicates as well.
    async fn copy_all_modes(
        &self,
        display: &Self::Handle,
        include_duplicates: bool,
    ) -> Option<Vec<Self::Mode>>;

    async fn copy_current_mode(&self, display: &Self::Handle) -> Option<Self::Mode>;

    async fn display_name(&self, display: &Self::Handle) -> Option<String>;

    async fn begin_configuration(&self) -> std::result::Result<Self::Transaction, PlatformCode>;

    async fn configure_display(
        &self,
        transaction: &mut Self::Transaction,
        display: &Self::Handle,
        mode: &Self::Mode,
    ) -> std::result::Result<(), PlatformCode>;

    /// Commits the session for the current login session only.
    async fn complete_configuration(
        &self,
        transaction: Self::Transaction,
    ) -> std::result::Result<(), PlatformCode>;

    /// Drops an open session without applying anything.
    async fn cancel_configuration(&self, transaction: Self::Transaction);
}
