use std::io::BufRead;
use std::process::ExitCode;
use std::time::Duration;

use fitgoose_core::{DemoJudgmentSource, LogSpeech};
use fitgoose_runtime::{logging, LiveWorkout, RuntimeConfig};
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let config = match RuntimeConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("fitgoose: {err}");
            return ExitCode::FAILURE;
        }
    };

    let _log_guard = logging::init_tracing(&config);

    let (live, speech_worker) =
        LiveWorkout::spawn(config.core.clone(), config.seed, config.decay_poll, LogSpeech);

    if live.snapshot().await.classifier.current_exercise != config.exercise {
        live.change_exercise(config.exercise).await;
    }

    let event_log = spawn_event_log(&live);

    if let Err(err) = live.start().await {
        tracing::error!(error = %err, "failed to start workout");
        return ExitCode::FAILURE;
    }

    let demo = live.spawn_demo_feed(
        DemoJudgmentSource::new(config.exercise, config.demo_good_form, config.seed),
        config.demo_cadence,
    );

    let mut listener = live.spawn_command_listener(spawn_stdin_lines());

    tracing::info!(
        exercise = %config.exercise,
        cadence_ms = config.demo_cadence.as_millis() as u64,
        "demo workout running; type \"pause\", \"resume\", \"push ups\" or \"end workout\""
    );

    let ended_by_voice = tokio::select! {
        _ = shutdown_signal() => None,
        ended = &mut listener => match ended {
            Ok(Some(session)) => Some(session),
            Ok(None) => {
                tracing::info!("stdin closed; press Ctrl-C to finish");
                shutdown_signal().await;
                None
            }
            Err(err) => {
                tracing::warn!(error = %err, "command listener failed");
                None
            }
        },
    };

    let finished = match ended_by_voice {
        Some(session) => Some(session),
        None => live.stop().await,
    };

    demo.abort();
    listener.abort();
    event_log.abort();

    match finished {
        Some(session) => match serde_json::to_string_pretty(&session) {
            Ok(json) => println!("{json}"),
            Err(err) => tracing::error!(error = %err, "failed to serialize session"),
        },
        None => tracing::info!("no session recorded"),
    }

    drop(live);
    if tokio::time::timeout(Duration::from_secs(2), speech_worker)
        .await
        .is_err()
    {
        tracing::warn!("speech queue did not drain before exit");
    }

    tracing::info!("Graceful shutdown complete");
    ExitCode::SUCCESS
}

/// Stdin is read on a plain thread so a pending read never holds up
/// runtime shutdown.
fn spawn_stdin_lines() -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

fn spawn_event_log(live: &LiveWorkout) -> JoinHandle<()> {
    let mut events = live.events().subscribe_global();
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(envelope) => match serde_json::to_string(&envelope.event) {
                    Ok(json) => tracing::debug!(id = %envelope.id, "event {json}"),
                    Err(err) => tracing::warn!(error = %err, "unserializable event"),
                },
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "event log lagged");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    })
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
