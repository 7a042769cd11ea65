use super::state::{ReportSummary, StepKind};
use tokio::sync::broadcast;

/// Load test events for real-time progress output
#[derive(Debug, Clone)]
pub enum LoadEvent {
    // Run events
    RunStarted {
        session_id: String,
        cycles: u32,
        concurrency: usize,
    },
    RunFinished {
        summary: ReportSummary,
    },

    // Cycle events
    CycleStarted {
        run_number: u32,
        users: usize,
    },
    CycleFinished {
        run_number: u32,
        failed: usize,
        total: usize,
        duration_ms: u64,
    },

    // Workflow events
    AccountCreated {
        run_number: u32,
        user: usize,
        username: String,
    },
    StepFinished {
        run_number: u32,
        user: usize,
        kind: StepKind,
        attempt: usize,
        elapsed_ms: u64,
        error: Option<String>,
    },
    WorkflowFinished {
        run_number: u32,
        user: usize,
        error: Option<String>,
    },
}

/// Event emitter for broadcasting load test events
#[derive(Clone)]
pub struct EventEmitter {
    sender: broadcast::Sender<LoadEvent>,
}

impl EventEmitter {
    pub fn new() -> (Self, broadcast::Receiver<LoadEvent>) {
        let (sender, receiver) = broadcast::channel(256);
        (Self { sender }, receiver)
    }

    pub fn emit(&self, event: LoadEvent) {
        let _ = self.sender.send(event);
    }
}

impl Default for EventEmitter {
    fn default() -> Self {
        let (sender, _) = broadcast::channel(256);
        Self { sender }
    }
}

/// Console event listener for printing progress
pub struct ConsoleEventListener;

impl ConsoleEventListener {
    /// Print events until every emitter is dropped
    pub async fn listen(mut receiver: broadcast::Receiver<LoadEvent>) {
        use colored::Colorize;

        loop {
            let event = match receiver.recv().await {
                Ok(event) => event,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    log::warn!("Console output dropped {} events", skipped);
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => break,
            };

            match event {
                LoadEvent::RunStarted {
                    session_id,
                    cycles,
                    concurrency,
                } => {
                    println!(
                        "\n{} Load test {} started: {} cycle(s) x {} user(s)",
                        "▶".green().bold(),
                        session_id.cyan(),
                        cycles,
                        concurrency
                    );
                }

                LoadEvent::RunFinished { summary } => {
                    print_summary(&summary);
                }

                LoadEvent::CycleStarted { run_number, users } => {
                    println!(
                        "\n  {} Cycle {} ({} users)",
                        "→".blue(),
                        run_number.to_string().white().bold(),
                        users
                    );
                }

                LoadEvent::CycleFinished {
                    run_number,
                    failed,
                    total,
                    duration_ms,
                } => {
                    let status = if failed == 0 {
                        "PASSED".green().bold()
                    } else {
                        format!("{}/{} FAILED", failed, total).red().bold()
                    };
                    println!(
                        "  {} Cycle {} [{}] {}ms",
                        "←".blue(),
                        run_number,
                        status,
                        duration_ms
                    );
                }

                LoadEvent::AccountCreated {
                    run_number,
                    user,
                    username,
                } => {
                    println!(
                        "    [{}.{}] account {}",
                        run_number,
                        user,
                        username.dimmed()
                    );
                }

                LoadEvent::StepFinished {
                    run_number,
                    user,
                    kind,
                    attempt,
                    elapsed_ms,
                    error,
                } => match error {
                    None => println!(
                        "    [{}.{}] {} {} #{} ({}ms)",
                        run_number,
                        user,
                        "✓".green(),
                        kind,
                        attempt,
                        elapsed_ms
                    ),
                    Some(err) => println!(
                        "    [{}.{}] {} {} #{} ({}ms): {}",
                        run_number,
                        user,
                        "✗".red(),
                        kind,
                        attempt,
                        elapsed_ms,
                        err.red()
                    ),
                },

                LoadEvent::WorkflowFinished {
                    run_number,
                    user,
                    error,
                } => {
                    if let Some(err) = error {
                        println!(
                            "    [{}.{}] {} workflow stopped: {}",
                            run_number,
                            user,
                            "✗".red(),
                            err
                        );
                    }
                }
            }
        }
    }
}

/// Print a run summary to stdout
pub fn print_summary(summary: &ReportSummary) {
    use colored::Colorize;

    println!("\n{} Load test finished", "■".blue().bold());
    println!("  Cycles: {}", summary.total_runs);
    println!(
        "  Users: {} succeeded, {} failed",
        summary.succeeded_users.to_string().green(),
        summary.failed_users.to_string().red()
    );
    for (label, stats) in [("Uploads", &summary.uploads), ("Downloads", &summary.downloads)] {
        match (stats.min_ms, stats.avg_ms, stats.max_ms) {
            (Some(min), Some(avg), Some(max)) => println!(
                "  {}: {} ({} failed), min {}ms / avg {}ms / max {}ms",
                label, stats.count, stats.failed, min, avg, max
            ),
            _ => println!("  {}: none", label),
        }
    }
    if let Some(duration) = summary.total_duration_ms {
        println!("  Duration: {}ms", duration);
    }
}
