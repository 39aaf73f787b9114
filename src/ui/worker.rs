//! The single background generation task.
//!
//! The worker never touches UI state. It reports through a channel that the
//! UI loop drains on its own thread.

use crate::document::DocumentKind;
use crate::error::Error;
use crate::job::JobData;
use crate::workflow::{GenerationReport, Pipeline};
use std::sync::Arc;
use tokio::sync::mpsc::{self, error::TryRecvError, UnboundedReceiver};
use tracing::{error, info};

/// Result of one finished run.
#[derive(Debug)]
pub struct RunOutcome {
    pub job: JobData,
    pub result: Result<GenerationReport, RunFailure>,
}

/// Why a run failed, as shown to the user.
#[derive(Debug, thiserror::Error)]
pub enum RunFailure {
    #[error(transparent)]
    Generation(#[from] Error),

    #[error("The generation task stopped unexpectedly")]
    Aborted,
}

/// Messages from the worker to the UI loop.
#[derive(Debug)]
pub enum WorkerEvent {
    /// A document's workflow has started.
    Stage(DocumentKind),
    Finished(RunOutcome),
}

/// A second start while a run is in flight.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[error("A generation is already running")]
pub struct WorkerBusy;

/// Owns at most one in-flight generation.
#[derive(Default)]
pub struct Worker {
    events: Option<UnboundedReceiver<WorkerEvent>>,
    // Kept so an aborted task can still be reported against its job.
    job: Option<JobData>,
}

impl Worker {
    pub fn is_busy(&self) -> bool {
        self.events.is_some()
    }

    /// Spawn the pipeline for `job` on the runtime. Must be called from
    /// within a tokio runtime.
    pub fn start(
        &mut self,
        pipeline: Arc<Pipeline>,
        job: JobData,
        include_cover_letter: bool,
    ) -> Result<(), WorkerBusy> {
        if self.is_busy() {
            return Err(WorkerBusy);
        }

        let (tx, rx) = mpsc::unbounded_channel();
        self.events = Some(rx);
        self.job = Some(job.clone());

        tokio::spawn(async move {
            let stage_tx = tx.clone();
            let result = pipeline
                .run(&job, include_cover_letter, move |kind| {
                    let _ = stage_tx.send(WorkerEvent::Stage(kind));
                })
                .await;

            match &result {
                Ok(report) => info!(?report, "Generation finished"),
                Err(e) => error!("Generation failed: {}", e),
            }

            let outcome = RunOutcome {
                job,
                result: result.map_err(RunFailure::from),
            };
            // The receiver only goes away when the UI is shutting down.
            let _ = tx.send(WorkerEvent::Finished(outcome));
        });

        Ok(())
    }

    /// Take the next event without blocking.
    pub fn poll(&mut self) -> Option<WorkerEvent> {
        let rx = self.events.as_mut()?;
        match rx.try_recv() {
            Ok(WorkerEvent::Finished(outcome)) => {
                self.events = None;
                self.job = None;
                Some(WorkerEvent::Finished(outcome))
            }
            Ok(event) => Some(event),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.events = None;
                let job = self.job.take()?;
                error!("Generation task ended without reporting a result");
                Some(WorkerEvent::Finished(RunOutcome {
                    job,
                    result: Err(RunFailure::Aborted),
                }))
            }
        }
    }
}
