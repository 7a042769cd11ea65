use super::events::{EventEmitter, LoadEvent};
use super::provision::AccountProvisioner;
use super::state::{StepKind, WorkflowResult};
use super::steps::StepRunner;

/// Steps every simulated user runs after its account is provisioned
pub const WORKFLOW_STEPS: [StepKind; 4] = [
    StepKind::Upload,
    StepKind::Download,
    StepKind::Upload,
    StepKind::Download,
];

/// Drives one simulated user through provision → upload → download → upload → download
#[derive(Clone)]
pub struct WorkflowExecutor {
    provisioner: AccountProvisioner,
    steps: StepRunner,
    emitter: EventEmitter,
}

impl WorkflowExecutor {
    pub fn new(provisioner: AccountProvisioner, steps: StepRunner, emitter: EventEmitter) -> Self {
        Self {
            provisioner,
            steps,
            emitter,
        }
    }

    /// Run the workflow, stopping after the first failed step.
    ///
    /// Results recorded before the failure are kept.
    pub async fn run(&self, run_number: u32, user: usize) -> WorkflowResult {
        let mut result = WorkflowResult::new(user);

        let account = match self.provisioner.provision().await {
            Ok(account) => account,
            Err(e) => {
                log::warn!("[{}.{}] provisioning failed: {}", run_number, user, e);
                return self.finish(run_number, result, Some(e.to_string()));
            }
        };

        self.emitter.emit(LoadEvent::AccountCreated {
            run_number,
            user,
            username: account.username.clone(),
        });
        result.account = Some(account.clone());

        for kind in WORKFLOW_STEPS {
            let step = self.steps.run(kind, &account).await;
            let attempt = match kind {
                StepKind::Upload => result.uploads.len() + 1,
                StepKind::Download => result.downloads.len() + 1,
            };

            self.emitter.emit(LoadEvent::StepFinished {
                run_number,
                user,
                kind,
                attempt,
                elapsed_ms: step.elapsed_ms,
                error: step.error.clone(),
            });

            let error = step.error.clone();
            result.record(step);

            if let Some(err) = error {
                return self.finish(run_number, result, Some(err));
            }
        }

        self.finish(run_number, result, None)
    }

    fn finish(&self, run_number: u32, mut result: WorkflowResult, error: Option<String>) -> WorkflowResult {
        result.finish(error);
        self.emitter.emit(LoadEvent::WorkflowFinished {
            run_number,
            user: result.user,
            error: result.error.clone(),
        });
        result
    }
}
