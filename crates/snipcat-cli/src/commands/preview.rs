//! Preview commands
//!
//! Usage:
//!   snipcat preview render <ID> [--output <FILE>]
//!   snipcat preview watch [--html <F>] [--css <F>] [--js <F>] --output <FILE>

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Args, Subcommand};
use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use snipcat_core::errors::{ExError, ExErrorKind, ExResult};
use snipcat_core::model::SnippetCode;
use snipcat_core::ops::catalog;
use snipcat_core::preview::{
    synthesize, CodeSupplier, ExecutionContext, FrameContext, MountPoint, PreviewDocument,
    PreviewDriver, PreviewRenderer, SandboxPolicy, DEFAULT_DEBOUNCE,
};
use tokio::sync::mpsc;

use super::{open_store, CommandResult};

#[derive(Debug, Args)]
pub struct PreviewArgs {
    #[command(subcommand)]
    pub command: PreviewCommand,
}

#[derive(Debug, Subcommand)]
pub enum PreviewCommand {
    /// Write the synthesized document of a stored snippet
    Render(RenderArgs),
    /// Re-render a preview page whenever the source files change
    Watch(WatchArgs),
}

#[derive(Debug, Args)]
pub struct RenderArgs {
    /// Snippet ID to render
    pub id: i64,

    /// Output file path (default: stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// HTML source file
    #[arg(long)]
    pub html: Option<PathBuf>,

    /// CSS source file
    #[arg(long)]
    pub css: Option<PathBuf>,

    /// JavaScript source file
    #[arg(long)]
    pub js: Option<PathBuf>,

    /// Preview page to (re)write
    #[arg(short, long)]
    pub output: PathBuf,

    /// Quiet period before a burst of edits is rendered
    #[arg(long, default_value_t = DEFAULT_DEBOUNCE.as_millis() as u64)]
    pub debounce_ms: u64,
}

/// Execute preview command
pub fn execute(db: &Path, args: PreviewArgs) -> CommandResult {
    match args.command {
        PreviewCommand::Render(render_args) => execute_render(db, render_args),
        PreviewCommand::Watch(watch_args) => {
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()?;
            runtime.block_on(execute_watch(watch_args))
        }
    }
}

fn execute_render(db: &Path, args: RenderArgs) -> CommandResult {
    let store = open_store(db)?;
    let snippet = catalog::get_snippet(&store, args.id)?;
    let document = synthesize(&snippet.code());

    if let Some(output_path) = args.output {
        fs::write(&output_path, document.source())?;
        println!("✓ Rendered to {}", output_path.display());
    } else {
        print!("{}", document);
    }

    Ok(())
}

async fn execute_watch(args: WatchArgs) -> CommandResult {
    let sources = SourceFiles::new(args.html, args.css, args.js)?;
    let supplier = CodeSupplier::new(sources.read()?);

    let renderer = PreviewRenderer::new(FileContext::new(&args.output));
    let handle = PreviewDriver::spawn(
        renderer,
        supplier.subscribe(),
        Duration::from_millis(args.debounce_ms),
    );
    let mut rendered = handle.rendered();

    let (_watcher, mut changes) = start_source_watcher(&sources)?;
    println!(
        "Watching {} source file(s); preview at {} (ctrl-c to stop)",
        sources.len(),
        args.output.display()
    );

    loop {
        tokio::select! {
            change = changes.recv() => {
                if change.is_none() {
                    break;
                }
                // Read all three so one render never mixes old and new files
                match sources.read() {
                    Ok(code) => {
                        supplier.publish(code);
                    }
                    Err(e) => tracing::warn!(error = %e, "keeping last preview"),
                }
            }
            changed = rendered.changed() => {
                if changed.is_err() {
                    break;
                }
                let generation = *rendered.borrow_and_update();
                println!("✓ Rendered generation {}", generation);
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    handle.shutdown().await;
    Ok(())
}

/// The watched source files; an absent flag contributes an empty field
#[derive(Debug, Clone, Default)]
struct SourceFiles {
    html: Option<PathBuf>,
    css: Option<PathBuf>,
    javascript: Option<PathBuf>,
}

impl SourceFiles {
    fn new(
        html: Option<PathBuf>,
        css: Option<PathBuf>,
        javascript: Option<PathBuf>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let sources = Self {
            html,
            css,
            javascript,
        };
        if sources.paths().next().is_none() {
            return Err("at least one of --html, --css or --js is required".into());
        }
        Ok(sources)
    }

    fn paths(&self) -> impl Iterator<Item = &PathBuf> {
        [&self.html, &self.css, &self.javascript]
            .into_iter()
            .flatten()
    }

    fn len(&self) -> usize {
        self.paths().count()
    }

    fn read(&self) -> std::io::Result<SnippetCode> {
        Ok(SnippetCode {
            html: read_optional(self.html.as_deref())?,
            css: read_optional(self.css.as_deref())?,
            javascript: read_optional(self.javascript.as_deref())?,
        })
    }

    fn contains(&self, path: &Path) -> bool {
        self.paths().any(|p| same_file(p, path))
    }
}

fn read_optional(path: Option<&Path>) -> std::io::Result<String> {
    match path {
        Some(path) => fs::read_to_string(path),
        None => Ok(String::new()),
    }
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (absolute(a), absolute(b)) {
        (Some(a), Some(b)) => a == b,
        _ => a == b,
    }
}

/// Canonical form of a path whose file may have just been replaced
fn absolute(path: &Path) -> Option<PathBuf> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    Some(parent.canonicalize().ok()?.join(path.file_name()?))
}

/// Watch the directories holding the sources
///
/// Editors often save by writing a new file and renaming it over the old
/// one, so the directory is watched and events are filtered by file name.
fn start_source_watcher(
    sources: &SourceFiles,
) -> Result<(RecommendedWatcher, mpsc::UnboundedReceiver<()>), Box<dyn std::error::Error>> {
    let (tx, rx) = mpsc::unbounded_channel::<()>();
    let filter = sources.clone();
    let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| match res {
        Ok(event) => {
            if event.paths.iter().any(|p| filter.contains(p)) {
                let _ = tx.send(());
            }
        }
        Err(_) => {
            let _ = tx.send(());
        }
    })?;

    let mut dirs: Vec<PathBuf> = sources
        .paths()
        .filter_map(|p| absolute(p))
        .filter_map(|p| p.parent().map(Path::to_path_buf))
        .collect();
    dirs.sort();
    dirs.dedup();

    for dir in dirs {
        watcher.watch(&dir, RecursiveMode::NonRecursive)?;
    }

    Ok((watcher, rx))
}

/// A preview page on disk hosting the document in a sandboxed frame
///
/// Each load writes a sibling temp file and renames it over the target, so
/// readers never see a half-written page.
pub struct FileContext {
    path: PathBuf,
    frame: FrameContext,
}

impl FileContext {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            frame: FrameContext::mounted(MountPoint::new("snipcat-preview")),
        }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn host_page(markup: &str) -> String {
        format!(
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
             <title>Snippet preview</title>\n\
             <style>html, body {{ margin: 0; height: 100%; }} \
             iframe {{ border: 0; width: 100%; height: 100%; }}</style>\n\
             </head>\n<body>\n{}\n</body>\n</html>\n",
            markup
        )
    }
}

impl ExecutionContext for FileContext {
    fn is_mounted(&self) -> bool {
        match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.is_dir(),
            _ => true,
        }
    }

    fn teardown(&mut self) {
        self.frame.teardown();
        // A temp file left by an interrupted write
        let _ = fs::remove_file(self.temp_path());
    }

    fn load(&mut self, document: &PreviewDocument, policy: &SandboxPolicy) -> ExResult<()> {
        self.frame.load(document, policy)?;
        let page = Self::host_page(self.frame.markup().unwrap_or_default());

        let temp = self.temp_path();
        fs::write(&temp, page)
            .and_then(|_| fs::rename(&temp, &self.path))
            .map_err(|e| {
                ExError::new(ExErrorKind::Io)
                    .with_op("preview_write")
                    .with_entity_id(self.path.display().to_string())
                    .with_message(e.to_string())
            })
    }
}
