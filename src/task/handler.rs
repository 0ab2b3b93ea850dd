use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;

/// Shared cooperative-cancellation flag.
#[derive(Clone, Debug, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    /// Fresh, uncancelled token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Work observes it at its next check.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Whether cancellation was requested on this token or any of its clones.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Outcome of one run, delivered on the frame thread by [`TaskHandler::poll`].
#[derive(Clone, Debug, PartialEq)]
pub enum TaskEvent<I, O> {
    /// The latest run finished without being cancelled.
    Completed { input: I, output: O },
    /// The run was cancelled or superseded; its output, if any, was discarded.
    Cancelled { input: I },
}

impl<I, O> TaskEvent<I, O> {
    /// Input the run was started with.
    pub fn input(&self) -> &I {
        match self {
            Self::Completed { input, .. } | Self::Cancelled { input } => input,
        }
    }

    /// Whether the run delivered an output.
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }
}

struct Finished<I, O> {
    token: CancellationToken,
    input: I,
    output: Option<O>,
}

type Work<I, O> = dyn Fn(&I, &CancellationToken) -> Option<O> + Send + Sync;

/// Runs one kind of background work on the rayon pool, keeping only the latest run relevant.
///
/// Starting a run cancels the previous one. Results never touch the scene from the worker; they
/// queue up until the frame thread calls [`TaskHandler::poll`]. A run counts as cancelled when
/// its token is cancelled by delivery time or when the work gives up by returning `None`.
pub struct TaskHandler<I, O> {
    work: Arc<Work<I, O>>,
    current: Option<CancellationToken>,
    in_flight: usize,
    tx: mpsc::Sender<Finished<I, O>>,
    rx: mpsc::Receiver<Finished<I, O>>,
}

impl<I, O> fmt::Debug for TaskHandler<I, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskHandler")
            .field("in_flight", &self.in_flight)
            .finish_non_exhaustive()
    }
}

impl<I, O> TaskHandler<I, O>
where
    I: Send + 'static,
    O: Send + 'static,
{
    /// Handler running `work` for every [`TaskHandler::run`].
    pub fn new(work: impl Fn(&I, &CancellationToken) -> Option<O> + Send + Sync + 'static) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            work: Arc::new(work),
            current: None,
            in_flight: 0,
            tx,
            rx,
        }
    }

    /// Cancel the current run and start a new one with `input`.
    pub fn run(&mut self, input: I) -> CancellationToken {
        self.cancel();
        let token = CancellationToken::new();
        self.current = Some(token.clone());
        self.in_flight += 1;

        let work = Arc::clone(&self.work);
        let tx = self.tx.clone();
        let worker_token = token.clone();
        rayon::spawn(move || {
            let output = if worker_token.is_cancelled() {
                None
            } else {
                work(&input, &worker_token)
            };
            // The handler may be gone; nothing is left to notify then.
            let _ = tx.send(Finished {
                token: worker_token,
                input,
                output,
            });
        });
        token
    }

    /// Cancel the current run, if any.
    pub fn cancel(&mut self) {
        if let Some(token) = self.current.take() {
            token.cancel();
        }
    }

    /// Runs started but not yet delivered.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Deliver every finished run without blocking.
    pub fn poll(&mut self) -> Vec<TaskEvent<I, O>> {
        let finished: Vec<_> = self.rx.try_iter().collect();
        finished.into_iter().map(|f| self.deliver(f)).collect()
    }

    /// Block until every started run is delivered.
    pub fn wait_all(&mut self) -> Vec<TaskEvent<I, O>> {
        let mut events = Vec::with_capacity(self.in_flight);
        while self.in_flight > 0 {
            match self.rx.recv() {
                Ok(f) => events.push(self.deliver(f)),
                Err(_) => break,
            }
        }
        events
    }

    fn deliver(&mut self, finished: Finished<I, O>) -> TaskEvent<I, O> {
        self.in_flight = self.in_flight.saturating_sub(1);
        match finished.output {
            Some(output) if !finished.token.is_cancelled() => TaskEvent::Completed {
                input: finished.input,
                output,
            },
            _ => {
                tracing::debug!("dropping result of cancelled task");
                TaskEvent::Cancelled {
                    input: finished.input,
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/task/handler.rs"]
mod tests;
