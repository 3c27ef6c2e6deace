//! cloudwait: block until a cloud resource reaches a state
//!
//! Exit codes: 0 reached, 1 failed (bad input, provider error), 2 timed out
//! or out of attempts, 130 interrupted.

mod cli;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Command, ResourceArg};
use cloudwait_core::{
    CancellationToken, PollConfig, PollError, PollReport, PollState, WaitService,
};
use cloudwait_provider::{ComputeProvider, ResourceHandle, create_provider_with_options};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const EXIT_FAILED: u8 = 1;
const EXIT_TIMED_OUT: u8 = 2;
const EXIT_CANCELLED: u8 = 130;

fn main() -> ExitCode {
    // stdout 只输出结果，日志写 stderr
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true),
        )
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    // clap 默认用 2 退出，和超时冲突
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::from(EXIT_FAILED)
            } else {
                ExitCode::SUCCESS
            };
        }
    };
    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(EXIT_FAILED)
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let provider =
        create_provider_with_options(cli.provider.credentials()?, &cli.provider.options())
            .context("failed to create provider")?;

    // 默认值 < 环境变量 < 命令行，最后统一校验
    let env = PollConfig::default()
        .apply_env()
        .context("invalid CLOUDWAIT_POLL_* environment")?;
    let config = cli.poll.apply(env);
    config.validate().context("invalid poll timing")?;
    let waits = WaitService::new(Arc::clone(&provider), config)?;
    let cancel = install_ctrl_c();

    let outcome = match &cli.command {
        Command::Validate => return validate(provider.as_ref()),
        Command::InstanceRunning(r) => waits.instance_running(&handle(r), Some(&cancel)),
        Command::InstanceStopped(r) => waits.instance_stopped(&handle(r), Some(&cancel)),
        Command::InstanceTerminated(r) => waits.instance_terminated(&handle(r), Some(&cancel)),
        Command::InstanceState { resource, state } => {
            waits.instance_state(&handle(resource), (*state).into(), Some(&cancel))
        }
        Command::VolumeAvailable(r) => waits.volume_available(&handle(r), Some(&cancel)),
        Command::VolumeAttached(r) => waits.volume_attached(&handle(r), Some(&cancel)),
        Command::VolumeDetached(r) => waits.volume_detached(&handle(r), Some(&cancel)),
        Command::AttachmentAttached {
            volume,
            instance_id,
        } => waits.attachment_attached(&handle(volume), instance_id, Some(&cancel)),
        Command::SnapshotCompleted(r) => waits.snapshot_completed(&handle(r), Some(&cancel)),
    };

    Ok(report(outcome))
}

fn handle(arg: &ResourceArg) -> ResourceHandle {
    match &arg.in_region {
        Some(region) => ResourceHandle::in_region(region.clone(), arg.id.clone()),
        None => ResourceHandle::new(arg.id.clone()),
    }
}

fn validate(provider: &dyn ComputeProvider) -> anyhow::Result<ExitCode> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    if runtime.block_on(provider.validate_credentials())? {
        println!("credentials accepted by {}", provider.id());
        Ok(ExitCode::SUCCESS)
    } else {
        println!("credentials rejected by {}", provider.id());
        Ok(ExitCode::from(EXIT_FAILED))
    }
}

fn report(outcome: Result<PollReport, PollError>) -> ExitCode {
    match outcome {
        Ok(report) => {
            if report.resource_gone {
                println!("gone after {} attempts", report.attempts);
            } else {
                println!("reached after {} attempts", report.attempts);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{e}");
            ExitCode::from(exit_code(e.state()))
        }
    }
}

fn exit_code(state: PollState) -> u8 {
    match state {
        PollState::TimedOut => EXIT_TIMED_OUT,
        PollState::Cancelled => EXIT_CANCELLED,
        PollState::Succeeded => 0,
        PollState::Polling | PollState::Failed => EXIT_FAILED,
    }
}

/// Cancels the returned token on Ctrl-C. The signal listener runs on its
/// own thread so the poller's runtime stays the only one on this thread.
fn install_ctrl_c() -> CancellationToken {
    let token = CancellationToken::new();
    let signalled = token.clone();
    let spawned = std::thread::Builder::new()
        .name("cloudwait-ctrl-c".into())
        .spawn(move || {
            let runtime = match tokio::runtime::Builder::new_current_thread()
                .enable_io()
                .build()
            {
                Ok(rt) => rt,
                Err(e) => {
                    tracing::warn!("Ctrl-C handling disabled: {e}");
                    return;
                }
            };
            if runtime.block_on(tokio::signal::ctrl_c()).is_ok() {
                tracing::info!("interrupted, stopping");
                signalled.cancel();
            }
        });
    if let Err(e) = spawned {
        tracing::warn!("Ctrl-C handling disabled: {e}");
    }
    token
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_by_state() {
        assert_eq!(exit_code(PollState::TimedOut), EXIT_TIMED_OUT);
        assert_eq!(exit_code(PollState::Cancelled), EXIT_CANCELLED);
        assert_eq!(exit_code(PollState::Failed), EXIT_FAILED);
        assert_eq!(exit_code(PollState::Succeeded), 0);
    }

    #[test]
    fn handle_uses_per_resource_region() {
        let arg = ResourceArg {
            id: "i-1".into(),
            in_region: Some("ap-south-1".into()),
        };
        let h = handle(&arg);
        assert_eq!(h.id, "i-1");
        assert_eq!(h.region.as_deref(), Some("ap-south-1"));
    }
}
