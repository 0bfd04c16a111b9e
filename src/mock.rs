// src/mock.rs

use std::cell::{Cell, RefCell};

use crate::error::{ConfigStage, Error, PlatformCode, Result};
use crate::modes::{ModeFlags, PlatformMode};
use crate::system::DisplaySystem;

#[derive(Debug, Clone, PartialEq)]
pub struct MockMode {
    width: u64,
    height: u64,
    encoding: String,
    refresh_rate: f64,
    flags: ModeFlags,
}

impl MockMode {
    pub fn new(width: u64, height: u64, encoding: &str, refresh_rate: f64) -> Self {
        Self {
            width,
            height,
            encoding: encoding.to_string(),
            refresh_rate,
            flags: ModeFlags::empty(),
        }
    }

    pub fn with_flags(mut self, flags: ModeFlags) -> Self {
        self.flags = flags;
        self
    }
}

impl PlatformMode for MockMode {
    fn width(&self) -> u64 {
        self.width
    }

    fn height(&self) -> u64 {
        self.height
    }

    fn refresh_rate(&self) -> f64 {
        self.refresh_rate
    }

    fn pixel_encoding(&self) -> String {
        self.encoding.clone()
    }

    fn io_flags(&self) -> ModeFlags {
        self.flags
    }
}

#[derive(Debug)]
struct MockDisplay {
    modes: Option<Vec<MockMode>>,
    duplicates: Vec<MockMode>,
    current: Option<MockMode>,
    name: Option<String>,
}

#[derive(Debug, Default)]
pub struct MockTransaction {
    changes: Vec<(usize, MockMode)>,
}

/// In-memory display subsystem. Display handles are indices into the list
/// given to [`MockDisplays::new`]; each display starts in its first mode.
#[derive(Debug)]
pub struct MockDisplays {
    displays: RefCell<Vec<MockDisplay>>,
    enumeration_error: Cell<Option<PlatformCode>>,
    fail_at: Cell<Option<(ConfigStage, PlatformCode)>>,
    applied: RefCell<Vec<(usize, MockMode)>>,
    configure_calls: Cell<usize>,
    cancelled: Cell<usize>,
}

impl MockDisplays {
    pub fn new(displays: Vec<Vec<MockMode>>) -> Self {
        let displays = displays
            .into_iter()
            .map(|modes| MockDisplay {
                current: modes.first().cloned(),
                modes: Some(modes),
                duplicates: Vec::new(),
                name: None,
            })
            .collect();
        Self {
            displays: RefCell::new(displays),
            enumeration_error: Cell::new(None),
            fail_at: Cell::new(None),
            applied: RefCell::new(Vec::new()),
            configure_calls: Cell::new(0),
            cancelled: Cell::new(0),
        }
    }

    pub fn set_name(&self, display: usize, name: &str) {
        self.displays.borrow_mut()[display].name = Some(name.to_string());
    }

    pub fn add_duplicate(&self, display: usize, mode: MockMode) {
        self.displays.borrow_mut()[display].duplicates.push(mode);
    }

    pub fn withhold_modes(&self, display: usize) {
        self.displays.borrow_mut()[display].modes = None;
    }

    pub fn clear_current(&self, display: usize) {
        self.displays.borrow_mut()[display].current = None;
    }

    pub fn fail_enumeration(&self, code: PlatformCode) {
        self.enumeration_error.set(Some(code));
    }

    pub fn fail_at(&self, stage: ConfigStage, code: PlatformCode) {
        self.fail_at.set(Some((stage, code)));
    }

    pub fn applied(&self) -> Vec<(usize, MockMode)> {
        self.applied.borrow().clone()
    }

    pub fn configure_calls(&self) -> usize {
        self.configure_calls.get()
    }

    pub fn cancelled(&self) -> usize {
        self.cancelled.get()
    }

    fn check(&self, stage: ConfigStage) -> std::result::Result<(), PlatformCode> {
        match self.fail_at.get() {
            Some((failing, code)) if failing == stage => Err(code),
            _ => Ok(()),
        }
    }
}

impl DisplaySystem for MockDisplays {
    type Handle = usize;
    type Mode = MockMode;
    type Transaction = MockTransaction;

    async fn active_displays(&self) -> Result<Vec<usize>> {
        if let Some(code) = self.enumeration_error.get() {
            return Err(Error::DisplayList(code));
        }
        Ok((0..self.displays.borrow().len()).collect())
    }

    async fn copy_all_modes(&self, display: &usize, include_duplicates: bool) -> Option<Vec<MockMode>> {
        let displays = self.displays.borrow();
        let entry = displays.get(*display)?;
        let mut modes = entry.modes.clone()?;
        if include_duplicates {
            modes.extend(entry.duplicates.iter().cloned());
        }
        Some(modes)
    }

    async fn copy_current_mode(&self, display: &usize) -> Option<MockMode> {
        self.displays.borrow().get(*display)?.current.clone()
    }

    async fn display_name(&self, display: &usize) -> Option<String> {
        self.displays.borrow().get(*display)?.name.clone()
    }

    async fn begin_configuration(&self) -> std::result::Result<MockTransaction, PlatformCode> {
        self.check(ConfigStage::Begin)?;
        Ok(MockTransaction::default())
    }

    async fn configure_display(
        &self,
        transaction: &mut MockTransaction,
        display: &usize,
        mode: &MockMode,
    ) -> std::result::Result<(), PlatformCode> {
        self.configure_calls.set(self.configure_calls.get() + 1);
        self.check(ConfigStage::Configure)?;
        transaction.changes.push((*display, mode.clone()));
        Ok(())
    }

    async fn complete_configuration(
        &self,
        transaction: MockTransaction,
    ) -> std::result::Result<(), PlatformCode> {
        self.check(ConfigStage::Complete)?;
        let mut displays = self.displays.borrow_mut();
        for (display, mode) in transaction.changes {
            displays[display].current = Some(mode.clone());
            self.applied.borrow_mut().push((display, mode));
        }
        Ok(())
    }

    async fn cancel_configuration(&self, _transaction: MockTransaction) {
        self.cancelled.set(self.cancelled.get() + 1);
    }
}
