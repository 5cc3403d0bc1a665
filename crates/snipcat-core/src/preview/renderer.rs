use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use super::context::ExecutionContext;
use super::document::{synthesize, PreviewDocument};
use super::sandbox::SandboxPolicy;
use crate::errors::{ExResult, SnipcatError};
use crate::model::SnippetCode;

/// Cosmetic pause inside `refresh` so a busy indicator is perceptible
pub const DEFAULT_REFRESH_DELAY: Duration = Duration::from_millis(300);

/// Owns one execution context and renders snippet triples into it
///
/// Every render is a full cycle: synthesize, tear down the old document,
/// load the new one. Only the most recent triple is retained, for `refresh`.
#[derive(Debug)]
pub struct PreviewRenderer<C> {
    context: C,
    policy: SandboxPolicy,
    current: Option<SnippetCode>,
    shown: Option<SnippetCode>,
    document: Option<PreviewDocument>,
    generation: u64,
    refresh_delay: Duration,
    pending: Arc<watch::Sender<bool>>,
}

impl<C: ExecutionContext> PreviewRenderer<C> {
    pub fn new(context: C) -> Self {
        let (pending, _) = watch::channel(false);
        Self {
            context,
            policy: SandboxPolicy::preview(),
            current: None,
            shown: None,
            document: None,
            generation: 0,
            refresh_delay: DEFAULT_REFRESH_DELAY,
            pending: Arc::new(pending),
        }
    }

    pub fn with_policy(mut self, policy: SandboxPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_refresh_delay(mut self, delay: Duration) -> Self {
        self.refresh_delay = delay;
        self
    }

    /// Render a triple, replacing whatever the context was showing
    ///
    /// The triple is retained even when rendering fails, so a later
    /// `refresh` on a mounted surface picks it up.
    ///
    /// # Errors
    /// `PreviewUnmounted` if the host surface is not attached. Failures of
    /// the rendered code itself are never reported.
    pub fn render(&mut self, code: SnippetCode) -> ExResult<()> {
        let document = synthesize(&code);
        self.current = Some(code);

        if !self.context.is_mounted() {
            return Err(SnipcatError::PreviewUnmounted.into());
        }

        self.context.teardown();
        self.document = None;
        self.shown = None;
        self.context.load(&document, &self.policy)?;
        self.generation += 1;

        tracing::debug!(
            generation = self.generation,
            document_len = document.len(),
            "preview loaded"
        );
        self.document = Some(document);
        self.shown = self.current.clone();
        Ok(())
    }

    /// Re-render the most recent triple
    ///
    /// No-op when nothing has been rendered yet. `pending` is true for the
    /// duration, including the cosmetic delay.
    ///
    /// # Errors
    /// Same as [`render`](Self::render).
    pub async fn refresh(&mut self) -> ExResult<()> {
        let Some(code) = self.current.clone() else {
            return Ok(());
        };
        self.refresh_with(code).await
    }

    /// Refresh, but render `code` instead of the retained triple
    ///
    /// For owners that know of a newer triple than the last one rendered.
    ///
    /// # Errors
    /// Same as [`render`](Self::render).
    pub async fn refresh_with(&mut self, code: SnippetCode) -> ExResult<()> {
        let _pending = PendingGuard::raise(Arc::clone(&self.pending));
        if !self.refresh_delay.is_zero() {
            tokio::time::sleep(self.refresh_delay).await;
        }
        self.render(code)
    }

    /// Whether a refresh is in flight
    pub fn pending(&self) -> bool {
        *self.pending.borrow()
    }

    pub fn subscribe_pending(&self) -> watch::Receiver<bool> {
        self.pending.subscribe()
    }

    /// The most recently supplied triple
    pub fn current(&self) -> Option<&SnippetCode> {
        self.current.as_ref()
    }

    /// The triple whose document the context is showing
    ///
    /// Differs from [`current`](Self::current) after a failed render.
    pub fn shown(&self) -> Option<&SnippetCode> {
        self.shown.as_ref()
    }

    /// The document currently loaded in the context
    pub fn document(&self) -> Option<&PreviewDocument> {
        self.document.as_ref()
    }

    /// Number of completed render cycles
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn policy(&self) -> &SandboxPolicy {
        &self.policy
    }

    pub fn context(&self) -> &C {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut C {
        &mut self.context
    }

    pub fn into_context(self) -> C {
        self.context
    }
}

/// Holds `pending` high until dropped, including on early return or
/// cancellation of the refresh future
struct PendingGuard {
    flag: Arc<watch::Sender<bool>>,
}

impl PendingGuard {
    fn raise(flag: Arc<watch::Sender<bool>>) -> Self {
        flag.send_replace(true);
        Self { flag }
    }
}

impl Drop for PendingGuard {
    fn drop(&mut self) {
        self.flag.send_replace(false);
    }
}
