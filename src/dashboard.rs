// Terminal dashboard binary entry point

mod app;
mod config;
mod error;
mod router;

use std::sync::Arc;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{error, info};

use app::{App, Outcome};
use config::Config;
use error::AppError;
use planthabitat::SystemClock;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout carries only the dashboard
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    info!("PlantHabitat dashboard starting");

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            let e = AppError::from(e);
            error!(error = %e, "Failed to load configuration");
            eprintln!("{}", e.to_alert());
            return Err(e.into());
        }
    };

    let mut app = App::new(config, Arc::new(SystemClock::new()))
        .context("Failed to initialize dashboard")?;

    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    write_out(
        &mut stdout,
        &format!("(type 'help' for commands)\n{}", app.prompt()),
    )
    .await?;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read input")? else {
                    info!("Input closed");
                    break;
                };

                let outcome = app.handle_line(&line);
                let quit = outcome.quit;
                write_out(&mut stdout, &present(&outcome)).await?;
                if quit {
                    break;
                }
                write_out(&mut stdout, &app.prompt()).await?;
            }
            Some(view) = app.next_dashboard_update() => {
                write_out(&mut stdout, &format!("\n{}{}", view, app.prompt())).await?;
            }
        }
    }

    info!("PlantHabitat dashboard exiting");
    Ok(())
}

fn present(outcome: &Outcome) -> String {
    let mut text = String::new();
    if let Some(alert) = &outcome.alert {
        text.push_str(&format!("{}\n", alert));
    }
    if let Some(output) = &outcome.output {
        text.push_str(output);
        if !output.ends_with('\n') {
            text.push('\n');
        }
    }
    text
}

async fn write_out(stdout: &mut tokio::io::Stdout, text: &str) -> anyhow::Result<()> {
    stdout.write_all(text.as_bytes()).await?;
    stdout.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use planthabitat::Alert;

    #[test]
    fn test_present_alert_and_output() {
        let outcome = Outcome {
            alert: Some(Alert::error("Please fill in all fields")),
            output: Some("Login".to_string()),
            quit: false,
        };
        assert_eq!(present(&outcome), "[Error] Please fill in all fields\nLogin\n");
    }

    #[test]
    fn test_present_empty_outcome() {
        assert_eq!(present(&Outcome::default()), "");
    }
}
