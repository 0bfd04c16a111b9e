use log::{debug, info};

use crate::error::{CodeName, ConfigStage, Error, PlatformCode, Result, StatusCode};
use crate::system::DisplaySystem;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Begun,
    Configured,
    Completed,
    /// Absorbing: nothing further runs once a stage has failed.
    Failed {
        stage: ConfigStage,
        code: PlatformCode,
    },
}

/// One begin/configure/complete transaction against the display subsystem.
///
/// The display either keeps its previous mode or ends up in the new one;
/// a failure after `begin` cancels the open transaction.
pub struct ConfigSession<'a, S: DisplaySystem> {
    system: &'a S,
    state: SessionState,
    transaction: Option<S::Transaction>,
}

impl<'a, S: DisplaySystem> ConfigSession<'a, S> {
    pub fn new(system: &'a S) -> ConfigSession<'a, S> {
        ConfigSession {
            system,
            state: SessionState::Idle,
            transaction: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub async fn begin(&mut self) -> Result<()> {
        self.expect(ConfigStage::Begin, SessionState::Idle).await?;
        match self.system.begin_configuration().await {
            Ok(transaction) => {
                self.transaction = Some(transaction);
                self.state = SessionState::Begun;
                Ok(())
            }
            Err(code) => self.fail(ConfigStage::Begin, code).await,
        }
    }

    pub async fn configure(&mut self, display: &S::Handle, mode: &S::Mode) -> Result<()> {
        self.expect(ConfigStage::Configure, SessionState::Begun).await?;
        let Some(transaction) = self.transaction.as_mut() else {
            return self
                .fail(ConfigStage::Configure, StatusCode::InvalidContext.code())
                .await;
        };
        match self.system.configure_display(transaction, display, mode).await {
            Ok(()) => {
                self.state = SessionState::Configured;
                Ok(())
            }
            Err(code) => self.fail(ConfigStage::Configure, code).await,
        }
    }

    pub async fn complete(&mut self) -> Result<()> {
        self.expect(ConfigStage::Complete, SessionState::Configured).await?;
        let Some(transaction) = self.transaction.take() else {
            return self
                .fail(ConfigStage::Complete, StatusCode::InvalidContext.code())
                .await;
        };
        match self.system.complete_configuration(transaction).await {
            Ok(()) => {
                self.state = SessionState::Completed;
                Ok(())
            }
            Err(code) => self.fail(ConfigStage::Complete, code).await,
        }
    }

    async fn expect(&mut self, stage: ConfigStage, wanted: SessionState) -> Result<()> {
        match self.state {
            SessionState::Failed { stage, code } => {
                Err(Error::ConfigurationStageFailure { stage, code })
            }
            state if state == wanted => Ok(()),
            state => {
                debug!("{stage} requested while session is {state:?}");
                self.fail(stage, StatusCode::InvalidOperation.code()).await
            }
        }
    }

    async fn fail(&mut self, stage: ConfigStage, code: PlatformCode) -> Result<()> {
        debug!("display configuration failed at {stage}: err({})", CodeName(code));
        if let Some(transaction) = self.transaction.take() {
            self.system.cancel_configuration(transaction).await;
        }
        self.state = SessionState::Failed { stage, code };
        Err(Error::ConfigurationStageFailure { stage, code })
    }
}

/// Moves `display` to `mode` for the current login session.
pub async fn apply<S: DisplaySystem>(system: &S, display: &S::Handle, mode: &S::Mode) -> Result<()> {
    let mut session = ConfigSession::new(system);
    session.begin().await?;
    session.configure(display, mode).await?;
    session.complete().await?;
    info!("display {display:?} configured");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::current_mode;
    use crate::mock::{MockDisplays, MockMode};
    use crate::modes::DisplayMode;
    use test_log::test;

    const RGB32: &str = "--------RRRRRRRRGGGGGGGGBBBBBBBB";

    fn two_mode_display() -> MockDisplays {
        MockDisplays::new(vec![vec![
            MockMode::new(1920, 1080, RGB32, 60.0),
            MockMode::new(800, 600, RGB32, 60.0),
        ]])
    }

    #[test(tokio::test)]
    async fn successful_apply_walks_every_state() {
        let system = two_mode_display();
        let target = MockMode::new(800, 600, RGB32, 60.0);
        let mut session = ConfigSession::new(&system);
        assert_eq!(session.state(), SessionState::Idle);
        session.begin().await.unwrap();
        assert_eq!(session.state(), SessionState::Begun);
        session.configure(&0, &target).await.unwrap();
        assert_eq!(session.state(), SessionState::Configured);
        session.complete().await.unwrap();
        assert_eq!(session.state(), SessionState::Completed);

        let current = current_mode(&system, &0).await.unwrap();
        assert_eq!(current.mode, DisplayMode::new(800, 600, 32, 60.0));
    }

    #[test(tokio::test)]
    async fn configure_failure_leaves_mode_unchanged() {
        let system = two_mode_display();
        system.fail_at(ConfigStage::Configure, 1001);
        let before = current_mode(&system, &0).await.unwrap().mode;

        let target = MockMode::new(800, 600, RGB32, 60.0);
        let err = apply(&system, &0, &target).await.unwrap_err();
        assert_eq!(
            err,
            Error::ConfigurationStageFailure {
                stage: ConfigStage::Configure,
                code: 1001
            }
        );
        assert_eq!(current_mode(&system, &0).await.unwrap().mode, before);
        assert_eq!(system.cancelled(), 1);
        assert!(system.applied().is_empty());
    }

    #[test(tokio::test)]
    async fn complete_failure_leaves_mode_unchanged() {
        let system = two_mode_display();
        system.fail_at(ConfigStage::Complete, 1004);
        let target = MockMode::new(800, 600, RGB32, 60.0);
        let mut session = ConfigSession::new(&system);
        session.begin().await.unwrap();
        session.configure(&0, &target).await.unwrap();
        assert!(session.complete().await.is_err());
        assert_eq!(
            session.state(),
            SessionState::Failed {
                stage: ConfigStage::Complete,
                code: 1004
            }
        );
        assert_eq!(
            current_mode(&system, &0).await.unwrap().mode,
            DisplayMode::new(1920, 1080, 32, 60.0)
        );
    }

    #[test(tokio::test)]
    async fn begin_failure_skips_later_stages() {
        let system = two_mode_display();
        system.fail_at(ConfigStage::Begin, 1000);
        let target = MockMode::new(800, 600, RGB32, 60.0);
        let mut session = ConfigSession::new(&system);
        assert!(session.begin().await.is_err());

        // Failed is absorbing and reports the original stage.
        let err = session.configure(&0, &target).await.unwrap_err();
        assert_eq!(
            err,
            Error::ConfigurationStageFailure {
                stage: ConfigStage::Begin,
                code: 1000
            }
        );
        assert_eq!(system.configure_calls(), 0);
        assert_eq!(system.cancelled(), 0);
    }

    #[test(tokio::test)]
    async fn stages_out_of_order_are_rejected() {
        let system = two_mode_display();
        let mut session = ConfigSession::new(&system);
        let err = session.complete().await.unwrap_err();
        assert_eq!(
            err,
            Error::ConfigurationStageFailure {
                stage: ConfigStage::Complete,
                code: StatusCode::InvalidOperation.code()
            }
        );
        assert!(session.begin().await.is_err());
        assert!(system.applied().is_empty());
    }
}
