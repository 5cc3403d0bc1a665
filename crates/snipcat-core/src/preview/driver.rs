//! Reactive re-rendering
//!
//! The driver is the single task that owns a renderer. It subscribes to a
//! triple supplier and re-renders whenever the triple changes, collapsing
//! bursts that arrive within the debounce window into one render of the
//! latest value. Explicit refreshes arrive as commands on the same task, so
//! renders are strictly ordered and never interleave.

use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;

use super::context::ExecutionContext;
use super::renderer::PreviewRenderer;
use crate::model::SnippetCode;

/// Default coalescing window for triple changes
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(120);

#[derive(Debug)]
enum Command {
    Refresh,
}

/// Control and observation side of a running driver
///
/// Dropping the handle stops the driver once it is idle.
#[derive(Debug)]
pub struct PreviewHandle {
    commands: mpsc::UnboundedSender<Command>,
    pending: watch::Receiver<bool>,
    rendered: watch::Receiver<u64>,
    task: JoinHandle<()>,
}

impl PreviewHandle {
    /// Ask for a re-render of the latest triple
    ///
    /// Returns false if the driver has stopped.
    pub fn refresh(&self) -> bool {
        self.commands.send(Command::Refresh).is_ok()
    }

    /// Busy flag of the owned renderer
    pub fn pending(&self) -> watch::Receiver<bool> {
        self.pending.clone()
    }

    /// Generation counter, bumped after every completed render
    pub fn rendered(&self) -> watch::Receiver<u64> {
        self.rendered.clone()
    }

    /// Stop the driver and wait for it to finish its current step
    pub async fn shutdown(self) {
        drop(self.commands);
        let _ = self.task.await;
    }
}

pub struct PreviewDriver;

impl PreviewDriver {
    /// Move `renderer` onto a new task driven by `code`
    ///
    /// The current value of `code` is rendered immediately. After that each
    /// change restarts the debounce window and the latest triple is rendered
    /// once the window passes quietly. A zero window renders every value the
    /// driver observes. Values equal to the triple on display are skipped. A
    /// refresh renders the supplier's latest triple, even one still waiting
    /// out the window.
    pub fn spawn<C>(
        renderer: PreviewRenderer<C>,
        code: watch::Receiver<SnippetCode>,
        debounce: Duration,
    ) -> PreviewHandle
    where
        C: ExecutionContext + Send + 'static,
    {
        let (commands, command_rx) = mpsc::unbounded_channel();
        let (rendered_tx, rendered) = watch::channel(renderer.generation());
        let pending = renderer.subscribe_pending();

        let task = tokio::spawn(run(renderer, code, command_rx, rendered_tx, debounce));

        PreviewHandle {
            commands,
            pending,
            rendered,
            task,
        }
    }
}

async fn run<C>(
    mut renderer: PreviewRenderer<C>,
    mut code: watch::Receiver<SnippetCode>,
    mut commands: mpsc::UnboundedReceiver<Command>,
    rendered: watch::Sender<u64>,
    debounce: Duration,
) where
    C: ExecutionContext + Send + 'static,
{
    let initial = code.borrow_and_update().clone();
    render_latest(&mut renderer, initial, &rendered);

    let mut supplier_open = true;
    let mut armed = false;
    let sleep = tokio::time::sleep_until(Instant::now() + debounce);
    tokio::pin!(sleep);

    loop {
        tokio::select! {
            changed = code.changed(), if supplier_open => {
                if changed.is_err() {
                    supplier_open = false;
                    if armed {
                        armed = false;
                        let latest = code.borrow().clone();
                        render_latest(&mut renderer, latest, &rendered);
                    }
                    continue;
                }
                if debounce.is_zero() {
                    let latest = code.borrow_and_update().clone();
                    render_latest(&mut renderer, latest, &rendered);
                } else {
                    armed = true;
                    sleep.as_mut().reset(Instant::now() + debounce);
                }
            }
            _ = &mut sleep, if armed => {
                armed = false;
                let latest = code.borrow_and_update().clone();
                render_latest(&mut renderer, latest, &rendered);
            }
            command = commands.recv() => match command {
                Some(Command::Refresh) => {
                    // Refresh the newest triple, folding in any armed change
                    armed = false;
                    let latest = code.borrow_and_update().clone();
                    if let Err(e) = renderer.refresh_with(latest).await {
                        tracing::warn!(err.code = e.code(), "preview refresh failed");
                    }
                    publish_generation(&rendered, renderer.generation());
                }
                None => break,
            }
        }
    }

    tracing::debug!(generation = renderer.generation(), "preview driver stopped");
}

fn render_latest<C: ExecutionContext>(
    renderer: &mut PreviewRenderer<C>,
    latest: SnippetCode,
    rendered: &watch::Sender<u64>,
) {
    if renderer.shown() == Some(&latest) {
        return;
    }
    if let Err(e) = renderer.render(latest) {
        tracing::warn!(err.code = e.code(), "preview render failed");
    }
    publish_generation(rendered, renderer.generation());
}

fn publish_generation(rendered: &watch::Sender<u64>, generation: u64) {
    rendered.send_if_modified(|current| {
        let changed = *current != generation;
        *current = generation;
        changed
    });
}
