use super::document::PreviewDocument;
use super::sandbox::SandboxPolicy;
use crate::errors::ExResult;

/// The isolated environment a preview document runs in
///
/// A context is exclusively owned by one renderer. Each render cycle is one
/// `teardown` followed by one `load`; a context never receives a partial or
/// incremental update.
pub trait ExecutionContext {
    /// Whether the host surface for this context is attached
    fn is_mounted(&self) -> bool;

    /// Discard the current document and everything it started
    fn teardown(&mut self);

    /// Load a complete document under `policy`
    ///
    /// # Errors
    /// Only host-side failures (e.g. the output could not be written).
    /// Whatever the document does once running is never reported here.
    fn load(&mut self, document: &PreviewDocument, policy: &SandboxPolicy) -> ExResult<()>;
}

/// Where in the host page a frame is attached
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountPoint {
    id: String,
}

impl MountPoint {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

/// A sandboxed iframe embedded in the host page
///
/// `load` produces the frame element with the document inlined through
/// `srcdoc`, so the frame never fetches anything from the host. The mount
/// point persists across renders; each load replaces the previous frame.
#[derive(Debug, Clone, Default)]
pub struct FrameContext {
    mount: Option<MountPoint>,
    markup: Option<String>,
    loads: u64,
}

impl FrameContext {
    /// An unmounted frame: rendering into it fails until `mount` is called
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mounted(mount: MountPoint) -> Self {
        Self {
            mount: Some(mount),
            ..Self::default()
        }
    }

    pub fn mount(&mut self, mount: MountPoint) {
        self.mount = Some(mount);
    }

    /// Detach from the host, discarding the current frame
    pub fn unmount(&mut self) -> Option<MountPoint> {
        self.teardown();
        self.mount.take()
    }

    pub fn mount_point(&self) -> Option<&MountPoint> {
        self.mount.as_ref()
    }

    /// The current frame element, if a document is loaded
    pub fn markup(&self) -> Option<&str> {
        self.markup.as_deref()
    }

    /// Number of documents loaded over this context's lifetime
    pub fn loads(&self) -> u64 {
        self.loads
    }
}

impl ExecutionContext for FrameContext {
    fn is_mounted(&self) -> bool {
        self.mount.is_some()
    }

    fn teardown(&mut self) {
        self.markup = None;
    }

    fn load(&mut self, document: &PreviewDocument, policy: &SandboxPolicy) -> ExResult<()> {
        let mount_id = self.mount.as_ref().map(MountPoint::id).unwrap_or_default();
        self.loads += 1;
        self.markup = Some(format!(
            "<iframe id=\"{}-frame\" data-generation=\"{}\" title=\"Snippet preview\" \
             sandbox=\"{}\" referrerpolicy=\"no-referrer\" srcdoc=\"{}\"></iframe>",
            escape_attribute(mount_id),
            self.loads,
            policy.sandbox_attribute(),
            escape_attribute(document.source()),
        ));
        Ok(())
    }
}

/// Escape text for use inside a double-quoted HTML attribute
pub fn escape_attribute(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + value.len() / 8);
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}
