// Portal smoke tool
//
// Runs the health check, or a full session → action → receipt round trip,
// against the Portal configured through GF_PORTAL_* environment variables.

use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use gf_portal_client::{
    ActionRequestOptions, PortalClient, ReadyWaitOptions, SESSION_KIND_SCRAP_NATIVE,
    SessionStartOptions, WaitOptions, WaitUntil,
};

#[derive(Parser)]
#[command(name = "gf-portal", version, about = "SCRAP Portal smoke checks")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the Portal health payload
    Health,
    /// Start a session, wait for payment, request and dispatch an action
    Smoke {
        #[arg(long, default_value = SESSION_KIND_SCRAP_NATIVE)]
        session_kind: String,
        #[arg(long, default_value_t = 1)]
        units: u64,
        #[arg(long, env = "ACTION", default_value = "demo:authorized")]
        action: String,
        #[arg(long, env = "EXECUTOR_ID", default_value = "JETSON-A")]
        executor_id: String,
        /// DELIVERED, COMPLETED or FINAL
        #[arg(long, default_value = "DELIVERED")]
        until: WaitUntil,
        #[arg(long, default_value_t = 600)]
        ready_timeout_secs: u64,
        #[arg(long, default_value_t = 120)]
        exec_timeout_secs: u64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let client = PortalClient::from_env().context("invalid Portal configuration")?;
    log::info!(
        "portal: {} (admin token {})",
        client.config().base_url(),
        if client.config().admin_token().is_some() { "set" } else { "unset" }
    );

    match cli.command {
        Command::Health => {
            let health = client.health().await.context("Portal healthcheck failed")?;
            println!("{}", serde_json::to_string_pretty(&health)?);
        }
        Command::Smoke {
            session_kind,
            units,
            action,
            executor_id,
            until,
            ready_timeout_secs,
            exec_timeout_secs,
        } => {
            let session = client
                .session_start(&SessionStartOptions { session_kind, units })
                .await
                .context("session start failed")?;
            log::info!("session_id: {}", session.session_id);
            if let Some(url) = session.extra.get("checkout_url").and_then(|v| v.as_str()) {
                log::info!("checkout_url: {url}");
            }

            let ready = client
                .wait_until_ready(
                    &session.session_id,
                    ReadyWaitOptions {
                        timeout: Duration::from_secs(ready_timeout_secs),
                        ..ReadyWaitOptions::default()
                    },
                )
                .await
                .context("session never became ready; pay the invoice before retrying")?;
            log::info!("settlement_state: {:?}", ready.settlement_state);

            let requested = client
                .action_request(
                    &session.session_id,
                    &ActionRequestOptions::new(action, executor_id),
                )
                .await
                .context("action request failed")?;
            log::info!("execution_id: {}", requested.execution_id);

            if client.config().admin_token().is_none() {
                log::warn!("action_run skipped (PORTAL_ADMIN_TOKEN not set)");
                return Ok(());
            }
            client
                .action_run(&session.session_id, &requested.execution_id)
                .await
                .context("action run failed")?;

            let receipt = client
                .execution(session.session_id, requested.execution_id)
                .wait_for(
                    WaitOptions::default()
                        .until(until)
                        .timeout(Duration::from_secs(exec_timeout_secs))
                        .on_update(|r| log::info!("status: {}", r.status)),
                )
                .await?;

            if receipt.executor_ok() == Some(false) {
                anyhow::bail!("executor reported ok=false");
            }
            println!("{}", serde_json::to_string_pretty(&receipt)?);
        }
    }

    Ok(())
}
