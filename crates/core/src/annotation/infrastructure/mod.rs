pub mod fail_safe_annotator;
pub mod wrapper_annotator;
