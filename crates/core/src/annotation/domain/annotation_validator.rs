use crate::shared::annotation::Annotation;
use crate::shared::bounding_box::BoundingBox;
use crate::shared::constants::DEFAULT_MIN_FACE_SIZE;

/// Decides whether an annotation is good enough to be used.
pub trait AnnotationValidator {
    fn is_valid(&self, annotation: &Annotation) -> bool;
}

impl<F> AnnotationValidator for F
where
    F: Fn(&Annotation) -> bool,
{
    fn is_valid(&self, annotation: &Annotation) -> bool {
        self(annotation)
    }
}

/// Accepts annotations whose face box is at least `min_face_size` wide
/// and tall. Annotations without a derivable box are rejected.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MinFaceSizeValidator {
    min_face_size: f64,
}

impl MinFaceSizeValidator {
    pub fn new(min_face_size: f64) -> Self {
        Self { min_face_size }
    }

    pub fn min_face_size(&self) -> f64 {
        self.min_face_size
    }
}

impl Default for MinFaceSizeValidator {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_FACE_SIZE)
    }
}

impl AnnotationValidator for MinFaceSizeValidator {
    fn is_valid(&self, annotation: &Annotation) -> bool {
        BoundingBox::from_annotation(annotation)
            .is_some_and(|bbox| bbox.size() >= self.min_face_size)
    }
}
