use log::{debug, error, info};
use swayipc_async::{Connection, Mode as SwayMode, Output};
use tokio::sync::Mutex;

use crate::error::{Error, PlatformCode, Result, StatusCode};
use crate::modes::{ModeFlags, PlatformMode, DIRECT_32BIT_ENCODING};
use crate::system::DisplaySystem;

/// Sway outputs as displays, driven over the sway IPC socket.
pub struct SwayDisplays {
    sway_connection: Mutex<Connection>,
}

/// A mode as reported by sway. Refresh is in mHz on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwayOutputMode {
    width: i32,
    height: i32,
    refresh: i32,
}

impl From<SwayMode> for SwayOutputMode {
    fn from(mode_info: SwayMode) -> SwayOutputMode {
        let SwayMode {
            width,
            height,
            refresh,
            ..
        } = mode_info;
        SwayOutputMode {
            width,
            height,
            refresh,
        }
    }
}

impl PlatformMode for SwayOutputMode {
    fn width(&self) -> u64 {
        u64::try_from(self.width).unwrap_or(0)
    }

    fn height(&self) -> u64 {
        u64::try_from(self.height).unwrap_or(0)
    }

    fn refresh_rate(&self) -> f64 {
        self.refresh as f64 / 1000f64
    }

    // sway renders XRGB8888 unless told otherwise and does not report it
    fn pixel_encoding(&self) -> String {
        DIRECT_32BIT_ENCODING.to_string()
    }

    fn io_flags(&self) -> ModeFlags {
        ModeFlags::VALID
    }
}

/// Commands queued for one `complete_configuration` call.
#[derive(Debug, Default)]
pub struct SwayTransaction {
    commands: Vec<String>,
}

impl SwayDisplays {
    pub async fn connect() -> Result<SwayDisplays> {
        let sway_connection = Connection::new().await.map_err(|e| {
            Error::Unavailable(format!(
                "unable to connect to sway ipc interface ({e}). Make sure sway is running and SWAYSOCK is set"
            ))
        })?;
        Ok(SwayDisplays {
            sway_connection: Mutex::new(sway_connection),
        })
    }

    async fn output(&self, name: &str) -> Option<Output> {
        let outputs = match self.sway_connection.lock().await.get_outputs().await {
            Ok(outputs) => outputs,
            Err(e) => {
                error!("{e}");
                return None;
            }
        };
        outputs.into_iter().find(|o| o.name == name)
    }

    fn build_mode_cmd(output: &str, mode: &SwayOutputMode) -> String {
        format!(
            "output {} mode {}x{}@{}.{:03}Hz",
            output,
            mode.width,
            mode.height,
            mode.refresh / 1000,
            mode.refresh % 1000
        )
    }
}

impl DisplaySystem for SwayDisplays {
    type Handle = String;
    type Mode = SwayOutputMode;
    type Transaction = SwayTransaction;

    async fn active_displays(&self) -> Result<Vec<String>> {
        let outputs = self
            .sway_connection
            .lock()
            .await
            .get_outputs()
            .await
            .map_err(|e| {
                error!("{e}");
                Error::DisplayList(StatusCode::CannotComplete.code())
            })?;
        Ok(outputs
            .into_iter()
            .filter(|o| o.active)
            .map(|o| o.name)
            .collect())
    }

    // sway has no low resolution duplicates to add
    async fn copy_all_modes(
        &self,
        display: &String,
        _include_duplicates: bool,
    ) -> Option<Vec<SwayOutputMode>> {
        let output = self.output(display).await?;
        Some(output.modes.into_iter().map(SwayOutputMode::from).collect())
    }

    async fn copy_current_mode(&self, display: &String) -> Option<SwayOutputMode> {
        self.output(display).await?.current_mode.map(SwayOutputMode::from)
    }

    async fn display_name(&self, display: &String) -> Option<String> {
        let output = self.output(display).await?;
        Some(format!("{} {} {}", output.make, output.model, output.serial))
    }

    async fn begin_configuration(&self) -> std::result::Result<SwayTransaction, PlatformCode> {
        Ok(SwayTransaction::default())
    }

    async fn configure_display(
        &self,
        transaction: &mut SwayTransaction,
        display: &String,
        mode: &SwayOutputMode,
    ) -> std::result::Result<(), PlatformCode> {
        match self.output(display).await {
            Some(output) if output.active => {
                transaction
                    .commands
                    .push(Self::build_mode_cmd(&output.name, mode));
                Ok(())
            }
            _ => Err(StatusCode::IllegalArgument.code()),
        }
    }

    async fn complete_configuration(
        &self,
        transaction: SwayTransaction,
    ) -> std::result::Result<(), PlatformCode> {
        let payload = transaction.commands.join("; ");
        info!("running sway command: {payload}");
        let outcomes = self
            .sway_connection
            .lock()
            .await
            .run_command(&payload)
            .await
            .map_err(|e| {
                error!("{e}");
                StatusCode::CannotComplete.code()
            })?;
        for outcome in outcomes {
            if let Err(e) = outcome {
                error!("sway rejected '{payload}': {e}");
                return Err(StatusCode::Failure.code());
            }
        }
        Ok(())
    }

    async fn cancel_configuration(&self, transaction: SwayTransaction) {
        debug!("dropping {} queued sway commands", transaction.commands.len());
    }
}
