//! Headless viewer state for annotatable PDF documents
//!
//! Two layouts share one chrome (zoom, annotation mode, debug overlay,
//! fullscreen): [`EndlessViewer`] stacks every page, [`PaginatedViewer`]
//! shows one page at a time and sequences its page fetches. Both render to a
//! serializable [`ViewerView`] and talk to their surroundings through the
//! [`host`] capability traits.

pub mod chrome;
pub mod config;
pub mod endless;
pub mod fetch;
pub mod host;
pub mod mode;
pub mod page;
pub mod paginated;
pub mod view;
pub mod zoom;

pub use chrome::ViewerChrome;
pub use config::{ConfigError, FitWidthClamp, Style, ViewerConfig};
pub use endless::EndlessViewer;
pub use fetch::{FetchOutcome, PageRequest, RequestKind, RequestToken, RequestTokens};
pub use host::{
    EventOutcome, EventTarget, Fullscreen, HeadlessHost, Host, HostError, HostEvent,
    HostEventKind, Key, KeyEvent, ListenerId, ListenerKind, Modifiers, ShortcutAction,
};
pub use mode::AnnotationMode;
pub use page::{AnnotationCallbacks, PageEvent, PageView};
pub use paginated::PaginatedViewer;
pub use view::{Body, HeaderView, MainView, ToolbarView, ViewerView, PAGE_LOAD_ERROR};
pub use zoom::{fit_width_zoom, Zoom, ZoomLimits, ZOOM_STEP};
