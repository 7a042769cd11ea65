use super::events::{EventEmitter, LoadEvent};
use super::executor::WorkflowExecutor;
use super::state::{CycleResult, WorkflowResult};
use crate::error::RunError;
use futures::future::join_all;

/// Runs one cycle: `concurrency` workflows at once, joined before returning
#[derive(Clone)]
pub struct CycleRunner {
    executor: WorkflowExecutor,
    emitter: EventEmitter,
}

impl CycleRunner {
    pub fn new(executor: WorkflowExecutor, emitter: EventEmitter) -> Self {
        Self { executor, emitter }
    }

    /// Every launched workflow runs to its own end; one failure never cancels a sibling.
    /// The returned `RunError` only signals that at least one user failed.
    pub async fn run(&self, run_number: u32, concurrency: usize) -> (CycleResult, Result<(), RunError>) {
        let mut cycle = CycleResult::new(run_number);
        self.emitter.emit(LoadEvent::CycleStarted {
            run_number,
            users: concurrency,
        });

        let handles: Vec<_> = (0..concurrency)
            .map(|user| {
                let executor = self.executor.clone();
                tokio::spawn(async move { executor.run(run_number, user).await })
            })
            .collect();

        for (user, joined) in join_all(handles).await.into_iter().enumerate() {
            let workflow = joined.unwrap_or_else(|e| {
                log::error!("[{}.{}] workflow task failed: {}", run_number, user, e);
                let mut result = WorkflowResult::new(user);
                result.finish(Some(format!("workflow task failed: {}", e)));
                result
            });
            cycle.push(workflow);
        }

        cycle.close();

        let failed = cycle.failed_users();
        let duration_ms = cycle
            .finished
            .map(|end| (end - cycle.started).num_milliseconds().max(0) as u64)
            .unwrap_or(0);
        self.emitter.emit(LoadEvent::CycleFinished {
            run_number,
            failed,
            total: cycle.users.len(),
            duration_ms,
        });

        let outcome = if failed == 0 {
            Ok(())
        } else {
            Err(RunError {
                run_number,
                failed,
                total: cycle.users.len(),
            })
        };
        (cycle, outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::provision::AccountProvisioner;
    use crate::runner::steps::StepRunner;
    use crate::runner::testing::{FakeLoader, FakePlatform};
    use std::sync::Arc;
    use std::time::Duration;

    fn runner(platform: Arc<FakePlatform>, loader: Arc<FakeLoader>) -> CycleRunner {
        let emitter = EventEmitter::default();
        let executor = WorkflowExecutor::new(
            AccountProvisioner::new(platform.clone(), "@x"),
            StepRunner::new(platform, loader, "d.ibf".into()),
            emitter.clone(),
        );
        CycleRunner::new(executor, emitter)
    }

    #[tokio::test]
    async fn test_all_users_succeed() {
        let (cycle, outcome) = runner(
            Arc::new(FakePlatform::default()),
            Arc::new(FakeLoader::default()),
        )
        .run(1, 2)
        .await;

        assert!(outcome.is_ok());
        assert_eq!(cycle.run_number, 1);
        assert_eq!(cycle.users.len(), 2);
        assert!(cycle.finished.is_some());
        for (i, user) in cycle.users.iter().enumerate() {
            assert_eq!(user.user, i);
            assert!(user.is_ok());
        }
    }

    #[tokio::test]
    async fn test_failures_do_not_cancel_siblings() {
        let platform = Arc::new(FakePlatform {
            fail_downloads_for: vec!["user-2".to_string()],
            delay: Some(Duration::from_millis(5)),
            ..Default::default()
        });
        let (cycle, outcome) = runner(platform, Arc::new(FakeLoader::default()))
            .run(1, 4)
            .await;

        assert_eq!(
            outcome,
            Err(RunError {
                run_number: 1,
                failed: 1,
                total: 4
            })
        );
        assert_eq!(cycle.users.len(), 4);
        let full = cycle
            .users
            .iter()
            .filter(|u| u.uploads.len() == 2 && u.downloads.len() == 2)
            .count();
        assert_eq!(full, 3);
    }

    #[tokio::test]
    async fn test_user_count_holds_when_every_signup_fails() {
        let platform = Arc::new(FakePlatform {
            fail_signup: true,
            ..Default::default()
        });
        let (cycle, outcome) = runner(platform, Arc::new(FakeLoader::default()))
            .run(2, 5)
            .await;

        assert_eq!(cycle.users.len(), 5);
        assert_eq!(outcome.unwrap_err().failed, 5);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_workflows_overlap() {
        let platform = Arc::new(FakePlatform {
            delay: Some(Duration::from_millis(50)),
            ..Default::default()
        });
        let (cycle, _) = runner(platform, Arc::new(FakeLoader::default()))
            .run(1, 4)
            .await;

        // 4 users x 4 platform calls x 50ms would take 800ms if serialized
        let elapsed = (cycle.finished.unwrap() - cycle.started).num_milliseconds();
        assert!(elapsed < 700, "cycle took {}ms", elapsed);
    }
}
