use serde::{Deserialize, Serialize};

/// What the page annotation layer creates on user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnnotationMode {
    /// Regular region annotations
    #[default]
    Annotation,
    /// Linking existing annotations
    Relations,
    /// Image-region editing
    Image,
}

impl AnnotationMode {
    /// Mode after pressing the toolbar button for `requested`.
    ///
    /// Pressing the button of the active mode falls back to `Annotation`.
    pub fn toggle(self, requested: AnnotationMode) -> AnnotationMode {
        if self == requested {
            AnnotationMode::Annotation
        } else {
            requested
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AnnotationMode::Annotation => "ANNOTATION",
            AnnotationMode::Relations => "RELATIONS",
            AnnotationMode::Image => "IMAGE",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggling_active_mode_returns_to_annotation() {
        let mode = AnnotationMode::Annotation.toggle(AnnotationMode::Relations);
        assert_eq!(mode, AnnotationMode::Relations);
        assert_eq!(mode.toggle(AnnotationMode::Relations), AnnotationMode::Annotation);
    }

    #[test]
    fn switching_between_modes_is_direct() {
        let mode = AnnotationMode::Relations.toggle(AnnotationMode::Image);
        assert_eq!(mode, AnnotationMode::Image);
        assert_eq!(mode.toggle(AnnotationMode::Relations), AnnotationMode::Relations);
    }

    #[test]
    fn double_press_passes_through_annotation() {
        for requested in [AnnotationMode::Relations, AnnotationMode::Image] {
            let first = AnnotationMode::Annotation.toggle(requested);
            let second = first.toggle(requested);
            let third = second.toggle(requested);

            assert_eq!(first, requested);
            assert_eq!(second, AnnotationMode::Annotation);
            assert_eq!(third, requested);
        }
    }

    #[test]
    fn serializes_as_upper_case_names() {
        let json = serde_json::to_string(&AnnotationMode::Relations).expect("serializes");
        assert_eq!(json, "\"RELATIONS\"");
        assert_eq!(AnnotationMode::Image.as_str(), "IMAGE");
    }
}
