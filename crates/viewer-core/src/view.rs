use crate::config::Style;
use crate::page::PageView;
use serde::Serialize;

/// Message shown when the initial page fetch fails
pub const PAGE_LOAD_ERROR: &str = "Failed to load PDF page";

/// Headless rendering of a viewer: what the host should draw.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewerView {
    pub class_name: &'static str,
    pub container_style: Style,
    pub header: HeaderView,
    pub main: MainView,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeaderView {
    pub style: Style,
    pub toolbar: ToolbarView,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolbarView {
    pub debug: bool,
    pub relations_active: bool,
    pub image_active: bool,
    pub fullscreen: bool,
    pub zoom_label: String,
    /// `"current / total"`; paginated layout only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MainView {
    pub style: Style,
    /// CSS transform applied to the page container
    pub transform: String,
    pub transform_origin: &'static str,
    pub body: Body,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Body {
    Loading,
    Error { message: String },
    Pages { pages: Vec<PageView> },
}

impl Body {
    pub fn pages(&self) -> &[PageView] {
        match self {
            Body::Pages { pages } => pages,
            Body::Loading | Body::Error { .. } => &[],
        }
    }
}

pub(crate) fn scale_transform(zoom: f64) -> String {
    format!("scale({zoom})")
}
