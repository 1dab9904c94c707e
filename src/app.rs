use std::sync::Arc;

use tracing::{info, warn};

use crate::config::{Config, DataSourceKind};
use crate::error::{AppError, CommandError};
use crate::router::{help_text, route_input, Command};
use planthabitat::{Alert, Clock, Dashboard, DataSource, HttpDeviceClient, Navigator, Screen};

/// What the terminal should show after handling a line
#[derive(Debug, Default, PartialEq)]
pub struct Outcome {
    pub alert: Option<Alert>,
    pub output: Option<String>,
    pub quit: bool,
}

impl Outcome {
    fn render(view: String) -> Self {
        Self {
            output: Some(view),
            ..Self::default()
        }
    }

    fn alert(alert: Alert) -> Self {
        Self {
            alert: Some(alert),
            ..Self::default()
        }
    }
}

/// Screen flow plus the dashboard while it is mounted
pub struct App {
    config: Config,
    source: DataSource,
    clock: Arc<dyn Clock>,
    navigator: Navigator,
    dashboard: Option<Dashboard>,
}

impl App {
    /// Build the app for the configured data source
    pub fn new(config: Config, clock: Arc<dyn Clock>) -> Result<Self, AppError> {
        let source = match config.data_source {
            DataSourceKind::Live => DataSource::live(HttpDeviceClient::new(&config.device_host)?),
            DataSourceKind::Mock => DataSource::mock(),
        };
        info!(
            source = ?config.data_source,
            device_host = %config.device_host,
            "App initialized"
        );
        Ok(Self::with_source(config, source, clock))
    }

    pub fn with_source(config: Config, source: DataSource, clock: Arc<dyn Clock>) -> Self {
        Self {
            config,
            source,
            clock,
            navigator: Navigator::new(),
            dashboard: None,
        }
    }

    pub fn screen(&self) -> Screen {
        self.navigator.current()
    }

    #[cfg(test)]
    pub fn dashboard(&self) -> Option<&Dashboard> {
        self.dashboard.as_ref()
    }

    pub fn prompt(&self) -> String {
        format!("{}> ", self.screen().title())
    }

    /// Parse and handle one line of input
    ///
    /// Errors never escape: they become alerts, like a form would show them.
    pub fn handle_line(&mut self, line: &str) -> Outcome {
        let result = route_input(self.screen(), line)
            .map_err(AppError::from)
            .and_then(|command| self.handle(command));

        match result {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(screen = ?self.screen(), error = %e, "Command rejected");
                Outcome::alert(e.to_alert())
            }
        }
    }

    /// Handle a routed command
    pub fn handle(&mut self, command: Command) -> Result<Outcome, AppError> {
        let outcome = match command {
            Command::Quit => Outcome {
                quit: true,
                ..Outcome::default()
            },
            Command::Help => Outcome::render(help_text(self.screen()).to_string()),
            Command::Login { username, password } => {
                self.navigator.submit_login(&username, &password)?;
                self.sync_dashboard();
                self.render_dashboard()
            }
            Command::OpenRegister => {
                self.navigator.navigate(Screen::Register);
                Outcome::render(help_text(Screen::Register).to_string())
            }
            Command::Register {
                username,
                password,
                confirm_password,
            } => {
                let alert =
                    self.navigator
                        .submit_registration(&username, &password, &confirm_password)?;
                Outcome::alert(alert)
            }
            Command::Back => {
                self.navigator.back();
                Outcome::default()
            }
            Command::Toggle { index } => {
                // The write task is detached; its outcome is only logged
                let _ = self.mounted()?.toggle(index)?;
                self.render_dashboard()
            }
            Command::Schedule { index, activation } => {
                self.mounted()?.schedule(index, activation)?;
                self.render_dashboard()
            }
            Command::Unschedule { index } => {
                self.mounted()?.clear_schedule(index)?;
                self.render_dashboard()
            }
            Command::Show => {
                if let Some(dashboard) = self.dashboard.as_mut() {
                    dashboard.drain_events();
                }
                self.render_dashboard()
            }
            Command::Logout => {
                self.navigator.logout();
                self.sync_dashboard();
                Outcome::default()
            }
        };
        Ok(outcome)
    }

    /// Wait for the next poll result and return the re-rendered dashboard
    ///
    /// Never resolves while no dashboard is mounted.
    pub async fn next_dashboard_update(&mut self) -> Option<String> {
        match self.dashboard.as_mut() {
            Some(dashboard) => {
                dashboard.next_event().await?;
                Some(dashboard.view().render())
            }
            None => std::future::pending().await,
        }
    }

    /// Mount or unmount the dashboard to match the current screen
    fn sync_dashboard(&mut self) {
        let on_dashboard = self.screen() == Screen::Dashboard;
        match (on_dashboard, self.dashboard.is_some()) {
            (true, false) => {
                self.dashboard = Some(Dashboard::mount(
                    self.source.clone(),
                    self.config.dashboard_settings(),
                    Arc::clone(&self.clock),
                ));
            }
            (false, true) => {
                if let Some(dashboard) = self.dashboard.take() {
                    dashboard.unmount();
                }
            }
            _ => {}
        }
    }

    fn mounted(&mut self) -> Result<&mut Dashboard, AppError> {
        self.dashboard
            .as_mut()
            .ok_or(AppError::Command(CommandError::Usage(
                "log in to use the dashboard",
            )))
    }

    fn render_dashboard(&self) -> Outcome {
        match &self.dashboard {
            Some(dashboard) => Outcome::render(dashboard.view().render()),
            None => Outcome::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use planthabitat::test_utils::fakes::{RecordingRelayWriter, ScriptedTelemetry};
    use planthabitat::{ActuatorBank, FixedClock, RelayCommand, StaticTelemetry};

    fn clock() -> Arc<dyn Clock> {
        Arc::new(FixedClock::from_display("2024-06-01 08:00").unwrap())
    }

    fn mock_app() -> App {
        App::with_source(Config::default(), DataSource::mock(), clock())
    }

    #[tokio::test]
    async fn test_login_mounts_dashboard() {
        let mut app = mock_app();
        assert_eq!(app.prompt(), "Login> ");

        let outcome = app.handle_line("login u p");
        assert!(outcome.alert.is_none());
        assert_eq!(app.screen(), Screen::Dashboard);
        assert!(app.dashboard().is_some());
        assert!(outcome.output.unwrap().contains("Device Controls"));
    }

    #[tokio::test]
    async fn test_failed_login_shows_alert() {
        let mut app = mock_app();
        let outcome = app.handle_line("login u");

        assert_eq!(
            outcome.alert,
            Some(Alert::error("Please enter both username and password"))
        );
        assert_eq!(app.screen(), Screen::Login);
        assert!(app.dashboard().is_none());
    }

    #[tokio::test]
    async fn test_registration_flow() {
        let mut app = mock_app();
        app.handle_line("register");
        assert_eq!(app.screen(), Screen::Register);

        let outcome = app.handle_line("register u p q");
        assert_eq!(outcome.alert, Some(Alert::error("Passwords do not match")));
        assert_eq!(app.screen(), Screen::Register);

        let outcome = app.handle_line("register u p");
        assert_eq!(outcome.alert, Some(Alert::error("Please fill in all fields")));

        let outcome = app.handle_line("register u p p");
        assert_eq!(outcome.alert, Some(Alert::success("Account created!")));
        assert_eq!(app.screen(), Screen::Login);
    }

    #[tokio::test]
    async fn test_logout_unmounts_dashboard() {
        let mut app = mock_app();
        app.handle_line("login u p");
        app.handle_line("logout");

        assert_eq!(app.screen(), Screen::Login);
        assert!(app.dashboard().is_none());
    }

    #[tokio::test]
    async fn test_toggle_sends_relay_command() {
        let writer = RecordingRelayWriter::new();
        let source = DataSource {
            telemetry: Arc::new(StaticTelemetry::default()),
            relays: Arc::new(writer.clone()),
            actuators: ActuatorBank::water_pump(),
        };
        let mut app = App::with_source(Config::default(), source, clock());
        app.handle_line("login u p");

        let outcome = app.handle_line("toggle 1");
        assert!(outcome.output.unwrap().contains("Water Pump   ON"));

        // Let the detached write run
        for _ in 0..5 {
            tokio::task::yield_now().await;
        }
        assert_eq!(writer.commands(), vec![RelayCommand { relay: 1, on: true }]);
    }

    #[tokio::test]
    async fn test_toggle_unknown_device() {
        let mut app = mock_app();
        app.handle_line("login u p");

        let outcome = app.handle_line("toggle 3");
        assert_eq!(outcome.alert, Some(Alert::error("No device number 3")));
    }

    #[tokio::test]
    async fn test_schedule_doser() {
        let mut app = mock_app();
        app.handle_line("login u p");

        let outcome = app.handle_line("schedule 1 2024-06-02 07:30");
        assert!(outcome
            .output
            .unwrap()
            .contains("scheduled for 2024-06-02 07:30"));

        let outcome = app.handle_line("unschedule 1");
        assert!(outcome.output.unwrap().contains("not scheduled"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_next_dashboard_update_renders_after_poll() {
        let source = DataSource {
            telemetry: Arc::new(ScriptedTelemetry::new(vec![])),
            relays: Arc::new(RecordingRelayWriter::new()),
            actuators: ActuatorBank::water_pump(),
        };
        let mut app = App::with_source(Config::default(), source, clock());
        app.handle_line("login u p");

        // Exhausted script: the poll fails and the failure is counted
        let rendered = app.next_dashboard_update().await.unwrap();
        assert!(rendered.contains("(1 failed polls)"));
    }

    #[tokio::test]
    async fn test_quit_from_any_screen() {
        let mut app = mock_app();
        assert!(app.handle_line("quit").quit);
        app.handle_line("login u p");
        assert!(app.handle_line("QUIT").quit);
    }
}
