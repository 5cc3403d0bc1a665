use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use snipcat_core::errors::ExResult;
use snipcat_core::model::{NewCategory, NewSnippet};
use snipcat_core::ops::catalog;
use snipcat_core::preview::{ExecutionContext, PreviewDocument, SandboxPolicy};
use snipcat_core::MemoryStore;

/// One call observed by a [`RecordingContext`]
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(dead_code)]
pub enum ContextCall {
    Teardown,
    Load { source: String, sandbox: String },
}

/// Execution context that records every call for later inspection
///
/// The call log and mount flag are shared so tests can keep reading and
/// toggling them after the context has moved into a driver task.
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub struct RecordingContext {
    mounted: Arc<AtomicBool>,
    calls: Arc<Mutex<Vec<ContextCall>>>,
}

#[allow(dead_code)]
impl RecordingContext {
    pub fn mounted() -> Self {
        Self {
            mounted: Arc::new(AtomicBool::new(true)),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn unmounted() -> Self {
        let context = Self::mounted();
        context.set_mounted(false);
        context
    }

    /// Attach or detach the host surface of every clone
    pub fn set_mounted(&self, mounted: bool) {
        self.mounted.store(mounted, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<ContextCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Sources of every loaded document, oldest first
    pub fn loaded_sources(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                ContextCall::Load { source, .. } => Some(source),
                ContextCall::Teardown => None,
            })
            .collect()
    }
}

impl ExecutionContext for RecordingContext {
    fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::SeqCst)
    }

    fn teardown(&mut self) {
        self.calls.lock().unwrap().push(ContextCall::Teardown);
    }

    fn load(&mut self, document: &PreviewDocument, policy: &SandboxPolicy) -> ExResult<()> {
        self.calls.lock().unwrap().push(ContextCall::Load {
            source: document.source().to_string(),
            sandbox: policy.sandbox_attribute(),
        });
        Ok(())
    }
}

/// A valid snippet submission in category 1
#[allow(dead_code)]
pub fn new_snippet(title: &str, description: &str) -> NewSnippet {
    NewSnippet {
        title: title.to_string(),
        description: description.to_string(),
        html: Some("<button class=\"atc\">Add</button>".to_string()),
        css: Some(".atc{color:red}".to_string()),
        javascript: None,
        installation: None,
        how_it_works: None,
        category_id: 1,
        tags: vec![],
        compatibility: "Shopify 2.0+".to_string(),
    }
}

/// Store with "Product Pages" (id 1) and "Cart Functionality" (id 2)
#[allow(dead_code)]
pub fn seeded_store() -> MemoryStore {
    let mut store = MemoryStore::new();
    catalog::create_category(&mut store, NewCategory::new("Product Pages", "product-pages"))
        .unwrap();
    catalog::create_category(
        &mut store,
        NewCategory::new("Cart Functionality", "cart-functionality"),
    )
    .unwrap();
    store
}
