use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use doc_model::{AnnotationId, AnnotationStore, PageAnnotation, RawTarget, Rect, Selector};
use pdf_engine::{LopdfDocument, OpenSource};
use serde::Serialize;
use std::cell::RefCell;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use storage::{AnnotationJournal, Storage};
use viewer_core::{
    AnnotationCallbacks, EndlessViewer, FetchOutcome, HeadlessHost, Key, KeyEvent, PageEvent,
    PageRequest, PaginatedViewer, ViewerChrome, ViewerConfig, ViewerView,
};

#[derive(Debug, Parser)]
#[command(name = "folio-cli")]
#[command(about = "Folio annotatable PDF viewer CLI")]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print machine-readable PDF metadata.
    Info {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Drive a headless viewer through toolbar actions and print its view.
    Session {
        #[arg(value_name = "FILE")]
        file: PathBuf,
        #[arg(long, value_enum, default_value_t = Layout::Endless)]
        layout: Layout,
        /// Viewer configuration as JSON.
        #[arg(long)]
        config: Option<PathBuf>,
        /// Document identity stamped on annotation targets. Defaults to FILE.
        #[arg(long)]
        url: Option<String>,
        /// Container width in pixels used by `fit-width`.
        #[arg(long, default_value_t = 800.0)]
        container_width: f64,
        #[arg(long, value_enum, value_delimiter = ',')]
        actions: Vec<Action>,
        /// Annotation journal to render; no annotations when omitted.
        #[arg(long)]
        journal: Option<PathBuf>,
    },
    /// Normalize a rectangle drawn on a page and append it to the journal.
    Annotate {
        #[arg(value_name = "FILE")]
        file: PathBuf,
        #[arg(long)]
        page: u32,
        /// Viewport rectangle as `x,y,width,height` in pixels.
        #[arg(long, value_parser = parse_rect, allow_hyphen_values = true)]
        rect: Rect,
        /// Zoom factor the rectangle was drawn at.
        #[arg(long, default_value_t = 1.0)]
        zoom: f64,
        #[arg(long)]
        url: Option<String>,
        /// Annotation body as JSON.
        #[arg(long, value_parser = parse_json)]
        body: Option<serde_json::Value>,
        #[arg(long)]
        journal: Option<PathBuf>,
    },
    /// Print a page's stored annotations projected into viewport pixels.
    Annotations {
        #[arg(value_name = "FILE")]
        file: PathBuf,
        #[arg(long)]
        page: u32,
        #[arg(long, default_value_t = 1.0)]
        zoom: f64,
        #[arg(long)]
        journal: Option<PathBuf>,
    },
    /// Print CLI version.
    Version,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
enum Layout {
    Endless,
    Paginated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Action {
    ZoomIn,
    ZoomOut,
    Next,
    Prev,
    Debug,
    Relations,
    Image,
    FitWidth,
    Fullscreen,
    #[value(name = "ctrl+plus")]
    CtrlPlus,
    #[value(name = "ctrl+minus")]
    CtrlMinus,
    Escape,
}

#[derive(Debug, Serialize)]
struct InfoOutput {
    path: String,
    page_count: u32,
    first_page_size_pt: Option<PageSizeOutput>,
}

#[derive(Debug, Serialize)]
struct PageSizeOutput {
    width: f64,
    height: f64,
}

#[derive(Debug, Serialize)]
struct SessionOutput {
    layout: Layout,
    document_url: String,
    num_pages: u32,
    view: ViewerView,
}

#[derive(Debug, Serialize)]
struct AnnotationsOutput {
    page_number: u32,
    zoom: f64,
    annotations: Vec<ProjectedAnnotation>,
}

#[derive(Debug, Serialize)]
struct ProjectedAnnotation {
    id: AnnotationId,
    selector: Selector,
    body: serde_json::Value,
}

pub fn run<I, T>(args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = Cli::parse_from(args);

    match cli.command {
        Commands::Info { file } => run_info(&file),
        Commands::Session { file, layout, config, url, container_width, actions, journal } => {
            let options = SessionOptions {
                layout,
                config: config.as_deref(),
                url,
                container_width,
                journal: journal.as_deref(),
            };
            run_session(&file, options, &actions)
        }
        Commands::Annotate { file, page, rect, zoom, url, body, journal } => {
            let mut raw = RawTarget::new(Selector::Rect(rect), zoom);
            raw.body = body.unwrap_or_default();
            run_annotate(&file, page, raw, url, journal.as_deref())
        }
        Commands::Annotations { file, page, zoom, journal } => {
            run_annotations(&file, page, zoom, journal.as_deref())
        }
        Commands::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn run_info(file: &Path) -> Result<()> {
    let document = open_document(file)?;

    let first_page_size_pt = document
        .first_page_size()
        .map(|size| PageSizeOutput { width: size.width_pt, height: size.height_pt });

    let payload = InfoOutput {
        path: file.display().to_string(),
        page_count: document.page_count(),
        first_page_size_pt,
    };

    print_json(&payload)
}

struct SessionOptions<'a> {
    layout: Layout,
    config: Option<&'a Path>,
    url: Option<String>,
    container_width: f64,
    journal: Option<&'a Path>,
}

/// Either layout behind one surface for the action loop.
enum SessionViewer {
    Endless(EndlessViewer),
    Paginated(PaginatedViewer),
}

impl SessionViewer {
    fn chrome_mut(&mut self) -> &mut ViewerChrome {
        match self {
            Self::Endless(viewer) => viewer.chrome_mut(),
            Self::Paginated(viewer) => viewer.chrome_mut(),
        }
    }

    fn toggle_fullscreen(&mut self, host: &mut HeadlessHost) {
        match self {
            Self::Endless(viewer) => viewer.toggle_fullscreen(host),
            Self::Paginated(viewer) => viewer.toggle_fullscreen(host),
        }
    }

    /// Dispatch every queued host event to the viewer.
    fn pump(&mut self, host: &mut HeadlessHost) {
        for event in host.drain_events() {
            let outcome = match self {
                Self::Endless(viewer) => viewer.handle_event(&*host, &event),
                Self::Paginated(viewer) => viewer.handle_event(&*host, &event),
            };
            log::debug!("{event:?} -> {outcome:?}");
        }
    }

    fn unmount(&mut self, host: &mut HeadlessHost) {
        match self {
            Self::Endless(viewer) => viewer.unmount(host),
            Self::Paginated(viewer) => viewer.unmount(host),
        };
    }

    fn view(&self, store: &impl AnnotationStore) -> ViewerView {
        match self {
            Self::Endless(viewer) => viewer.view(store),
            Self::Paginated(viewer) => viewer.view(store),
        }
    }
}

fn run_session(file: &Path, options: SessionOptions<'_>, actions: &[Action]) -> Result<()> {
    let document = open_document(file)?;
    let config = load_config(options.config)?;
    let document_url = options.url.unwrap_or_else(|| file.display().to_string());
    let journal = match options.journal {
        Some(path) => AnnotationJournal::load(path)
            .with_context(|| format!("failed to read journal {}", path.display()))?
            .annotations()
            .to_vec(),
        None => Vec::new(),
    };

    let mut host = HeadlessHost::new();
    let mut viewer = match options.layout {
        Layout::Endless => {
            let mut viewer = EndlessViewer::new(&document, document_url.as_str(), &config)?;
            viewer.mount(&mut host);
            SessionViewer::Endless(viewer)
        }
        Layout::Paginated => {
            let mut viewer = PaginatedViewer::new(&document, document_url.as_str(), &config)?;
            let request = viewer.mount(&mut host);
            settle(&mut viewer, &document, request);
            SessionViewer::Paginated(viewer)
        }
    };

    for action in actions {
        log::debug!("applying {action:?}");
        match (*action, &mut viewer) {
            (Action::ZoomIn, viewer) => {
                viewer.chrome_mut().zoom_in();
            }
            (Action::ZoomOut, viewer) => {
                viewer.chrome_mut().zoom_out();
            }
            (Action::Next, SessionViewer::Paginated(viewer)) => {
                let request = viewer.next_page();
                settle(viewer, &document, request);
            }
            (Action::Prev, SessionViewer::Paginated(viewer)) => {
                let request = viewer.previous_page();
                settle(viewer, &document, request);
            }
            (Action::Next | Action::Prev, SessionViewer::Endless(_)) => {
                bail!("page navigation requires --layout paginated");
            }
            (Action::Debug, viewer) => {
                viewer.chrome_mut().toggle_debug();
            }
            (Action::Relations, viewer) => {
                viewer.chrome_mut().toggle_relations_mode();
            }
            (Action::Image, viewer) => {
                viewer.chrome_mut().toggle_image_mode();
            }
            (Action::FitWidth, viewer) => match document.first_page_size() {
                Some(size) => {
                    viewer.chrome_mut().fit_to_width(options.container_width, size.width_pt);
                }
                None => log::warn!("fit-width skipped, document has no pages"),
            },
            (Action::Fullscreen, viewer) => viewer.toggle_fullscreen(&mut host),
            (Action::CtrlPlus, _) => host.press_key(KeyEvent::ctrl('+')),
            (Action::CtrlMinus, _) => host.press_key(KeyEvent::ctrl('-')),
            (Action::Escape, _) => host.press_key(KeyEvent::plain(Key::Escape)),
        }
        viewer.pump(&mut host);
    }

    let view = viewer.view(&journal);
    viewer.unmount(&mut host);

    print_json(&SessionOutput {
        layout: options.layout,
        document_url,
        num_pages: document.page_count(),
        view,
    })
}

/// Fetch and apply `request`, if any. Failures surface in the viewer state.
fn settle(viewer: &mut PaginatedViewer, document: &LopdfDocument, request: Option<PageRequest>) {
    let Some(request) = request else {
        return;
    };

    match pollster::block_on(viewer.load(document, request)) {
        FetchOutcome::Failed(err) => {
            log::warn!("page {} failed to load: {err}", request.page_number);
        }
        outcome => log::debug!("page {} settled: {outcome:?}", request.page_number),
    }
}

fn run_annotate(
    file: &Path,
    page: u32,
    raw: RawTarget,
    url: Option<String>,
    journal: Option<&Path>,
) -> Result<()> {
    let document = open_document(file)?;
    if page == 0 || page > document.page_count() {
        bail!("page {page} out of range (page_count={})", document.page_count());
    }

    let created = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&created);
    let callbacks =
        AnnotationCallbacks::new().on_create(move |target| sink.borrow_mut().push(target));

    let document_url = url.unwrap_or_else(|| file.display().to_string());
    let mut viewer = PaginatedViewer::new(&document, document_url, &ViewerConfig::default())?
        .with_callbacks(callbacks);
    let mut host = HeadlessHost::new();

    let request = viewer.mount(&mut host);
    settle(&mut viewer, &document, request);
    let request = viewer.go_to_page(page);
    settle(&mut viewer, &document, request);

    let page_size = match viewer.current_page() {
        Some(handle) if handle.page_number == page => handle.size,
        _ => bail!("failed to display page {page}"),
    };

    viewer.handle_page_event(&PageEvent::Create(raw));
    viewer.unmount(&mut host);

    let mut journal = open_journal(file, journal)?;
    let mut stored: Vec<PageAnnotation> = Vec::new();
    for target in created.take() {
        let annotation = target.normalize(page_size).context("failed to normalize annotation")?;
        journal.upsert(annotation.clone());
        stored.push(annotation);
    }
    journal
        .save()
        .with_context(|| format!("failed to write journal {}", journal.path().display()))?;

    let annotation = stored.pop().context("annotation was not created")?;
    print_json(&annotation)
}

fn run_annotations(file: &Path, page: u32, zoom: f64, journal: Option<&Path>) -> Result<()> {
    let document = open_document(file)?;
    let page_size = document.page_size(page).context("failed to read page size")?;
    let journal = open_journal(file, journal)?;

    let annotations = journal
        .get_annotations(page)
        .into_iter()
        .map(|annotation| {
            Ok(ProjectedAnnotation {
                id: annotation.id,
                selector: annotation.project(page_size, zoom)?,
                body: annotation.body,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    print_json(&AnnotationsOutput { page_number: page, zoom, annotations })
}

fn open_document(file: &Path) -> Result<LopdfDocument> {
    ensure_pdf_exists(file)?;
    LopdfDocument::open(OpenSource::from(file)).context("failed to open PDF")
}

fn load_config(path: Option<&Path>) -> Result<ViewerConfig> {
    let Some(path) = path else {
        return Ok(ViewerConfig::default());
    };

    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let config: ViewerConfig = serde_json::from_str(&text)
        .with_context(|| format!("invalid viewer config {}", path.display()))?;
    config.validate().with_context(|| format!("invalid viewer config {}", path.display()))?;
    Ok(config)
}

fn open_journal(file: &Path, journal: Option<&Path>) -> Result<AnnotationJournal> {
    let journal = match journal {
        Some(path) => AnnotationJournal::load(path),
        None => {
            let stem = file.file_stem().and_then(|name| name.to_str()).unwrap_or("document");
            Storage::from_default_project()?.open_journal(stem)
        }
    };

    journal.context("failed to read annotation journal")
}

fn ensure_pdf_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        bail!("file does not exist: {}", path.display());
    }

    if !path.is_file() {
        bail!("path is not a file: {}", path.display());
    }

    Ok(())
}

fn print_json(payload: &impl Serialize) -> Result<()> {
    let json = serde_json::to_string_pretty(payload)?;
    println!("{json}");
    Ok(())
}

fn parse_rect(value: &str) -> Result<Rect, String> {
    let parts = value
        .split(',')
        .map(|part| part.trim().parse::<f64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|err| format!("invalid number in rect: {err}"))?;

    match parts.as_slice() {
        [x, y, width, height] => Ok(Rect::new(*x, *y, *width, *height)),
        _ => Err(format!("expected x,y,width,height, got {} value(s)", parts.len())),
    }
}

fn parse_json(value: &str) -> Result<serde_json::Value, String> {
    serde_json::from_str(value).map_err(|err| format!("invalid JSON: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rect_argument() {
        assert_eq!(parse_rect("1, 2.5,3,4"), Ok(Rect::new(1.0, 2.5, 3.0, 4.0)));
        assert!(parse_rect("1,2,3").is_err());
        assert!(parse_rect("1,2,x,4").is_err());
    }

    #[test]
    fn actions_accept_shortcut_names() {
        let cli = Cli::try_parse_from([
            "folio-cli",
            "session",
            "doc.pdf",
            "--actions",
            "zoom-in,ctrl+plus,fit-width,escape",
        ])
        .expect("arguments should parse");

        let Commands::Session { actions, layout, .. } = cli.command else {
            panic!("expected session command");
        };
        assert_eq!(layout, Layout::Endless);
        assert_eq!(
            actions,
            vec![Action::ZoomIn, Action::CtrlPlus, Action::FitWidth, Action::Escape]
        );
    }

    #[test]
    fn missing_config_path_means_defaults() {
        let config = load_config(None).expect("defaults should load");
        assert_eq!(config, ViewerConfig::default());
    }
}
