use super::cycle::CycleRunner;
use super::events::{EventEmitter, LoadEvent};
use super::executor::WorkflowExecutor;
use super::provision::AccountProvisioner;
use super::state::Report;
use super::steps::StepRunner;
use crate::loader::DataLoader;
use crate::platform::PlatformApi;
use crate::utils::config::Config;
use std::sync::Arc;

/// Runs cycles one after another and collects them into a report
pub struct LoadTestController {
    cycles: CycleRunner,
    emitter: EventEmitter,
}

impl LoadTestController {
    pub fn new(
        config: &Config,
        api: Arc<dyn PlatformApi>,
        loader: Arc<dyn DataLoader>,
        emitter: EventEmitter,
    ) -> Self {
        let executor = WorkflowExecutor::new(
            AccountProvisioner::new(api.clone(), &config.email_suffix),
            StepRunner::new(api, loader, config.source_file.clone()),
            emitter.clone(),
        );
        Self {
            cycles: CycleRunner::new(executor, emitter.clone()),
            emitter,
        }
    }

    /// Cycles never overlap: cycle N+1 starts only after every workflow of cycle N ended.
    /// Failed cycles are logged and the run carries on.
    pub async fn run(&self, cycles: u32, concurrency: usize) -> Report {
        let session_id = uuid::Uuid::new_v4().to_string();
        let mut report = Report::new(&session_id);

        self.emitter.emit(LoadEvent::RunStarted {
            session_id,
            cycles,
            concurrency,
        });

        for run_number in 1..=cycles {
            log::info!("Starting cycle {}/{}", run_number, cycles);
            let (cycle, outcome) = self.cycles.run(run_number, concurrency).await;
            match outcome {
                Ok(()) => log::info!("Cycle {} completed", run_number),
                Err(e) => log::warn!("A test run failed: {}", e),
            }
            report.push(cycle);
        }

        report.finish();
        self.emitter.emit(LoadEvent::RunFinished {
            summary: report.summary(),
        });
        report
    }
}
