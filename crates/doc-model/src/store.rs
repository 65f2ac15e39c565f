use crate::target::PageAnnotation;

/// Read side of the annotation persistence store.
///
/// Returns the annotations of one page, in store order. Synchronous.
pub trait AnnotationStore {
    fn get_annotations(&self, page_number: u32) -> Vec<PageAnnotation>;
}

impl AnnotationStore for [PageAnnotation] {
    fn get_annotations(&self, page_number: u32) -> Vec<PageAnnotation> {
        self.iter().filter(|annotation| annotation.page_number == page_number).cloned().collect()
    }
}

impl AnnotationStore for Vec<PageAnnotation> {
    fn get_annotations(&self, page_number: u32) -> Vec<PageAnnotation> {
        self.as_slice().get_annotations(page_number)
    }
}

impl<T: AnnotationStore + ?Sized> AnnotationStore for &T {
    fn get_annotations(&self, page_number: u32) -> Vec<PageAnnotation> {
        (**self).get_annotations(page_number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target::{Rect, Selector};
    use uuid::Uuid;

    fn annotation(id: u128, page_number: u32) -> PageAnnotation {
        PageAnnotation {
            id: Uuid::from_u128(id),
            document_url: "doc.pdf".to_owned(),
            page_number,
            selector: Selector::Rect(Rect::new(0.1, 0.1, 0.2, 0.2)),
            body: serde_json::Value::Null,
        }
    }

    #[test]
    fn slice_store_filters_by_page_and_keeps_order() {
        let store = vec![annotation(1, 2), annotation(2, 1), annotation(3, 2)];

        let ids: Vec<_> = store.get_annotations(2).into_iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![Uuid::from_u128(1), Uuid::from_u128(3)]);
        assert!(store.get_annotations(5).is_empty());
    }
}
