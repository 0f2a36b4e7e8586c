use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use slack_merge_queue::cli::{self, Cli};
use slack_merge_queue::events::parse_event;
use slack_merge_queue::modes::{self, ActionOutcome, ActionStatus};
use slack_merge_queue::outputs::ActionOutputs;
use slack_merge_queue::slack::{DEFAULT_REQUEST_TIMEOUT, RetryConfig, SlackClient};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "slack_merge_queue=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if cli::is_informational(&err) => {
            let _ = err.print();
            return ExitCode::SUCCESS;
        }
        Err(err) => {
            let _ = err.print();
            error!(error = %err.kind(), "invalid command line");
            record_failure(&ActionOutputs::from_env());
            return ExitCode::FAILURE;
        }
    };
    let outputs = ActionOutputs::new(cli.output_path.clone());

    match run(&cli).await {
        Ok(Some(outcome)) => match outputs.write_outcome(&outcome) {
            Ok(()) => ExitCode::SUCCESS,
            Err(err) => {
                error!(error = %err, "could not record outputs");
                ExitCode::FAILURE
            }
        },
        Ok(None) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = format!("{err:#}"), "merge queue run failed");
            record_failure(&outputs);
            ExitCode::FAILURE
        }
    }
}

fn record_failure(outputs: &ActionOutputs) {
    if let Err(err) = outputs.set("status", ActionStatus::Failed.as_str()) {
        warn!(error = %err, "could not record failure status");
    }
}

/// Runs one invocation. `None` means the event was not one the queue handles.
async fn run(cli: &Cli) -> anyhow::Result<Option<ActionOutcome>> {
    let config = cli.config().context("invalid inputs")?;

    let payload = std::fs::read(&cli.event_path)
        .with_context(|| format!("failed to read event payload {}", cli.event_path.display()))?;
    let Some(event) = parse_event(&cli.event_name, &payload)
        .with_context(|| format!("failed to parse {} event", cli.event_name))?
    else {
        info!(event = %cli.event_name, "ignoring event");
        return Ok(None);
    };

    let client = SlackClient::new(
        &cli.slack_api_base,
        &cli.slack_token,
        RetryConfig::DEFAULT,
        DEFAULT_REQUEST_TIMEOUT,
    )
    .context("failed to create Slack client")?;

    let outcome = modes::run(&config, &client, &event).await?;
    info!(
        mode = %config.mode,
        status = %outcome.status,
        next = ?outcome.next_issue,
        "done"
    );
    Ok(Some(outcome))
}
