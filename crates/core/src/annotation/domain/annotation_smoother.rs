use serde::{Deserialize, Serialize};

use crate::annotation::domain::annotation_validator::AnnotationValidator;
use crate::shared::annotation::{Annotation, AnnotationSequence};

/// How many frames a detection may be carried forward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<usize>", into = "Option<usize>")]
pub enum MaxAge {
    Infinite,
    Frames(usize),
}

impl MaxAge {
    /// Whether an annotation of this age may still be reused.
    pub fn allows(&self, age: usize) -> bool {
        match *self {
            MaxAge::Infinite => true,
            MaxAge::Frames(max) => age < max,
        }
    }
}

impl From<Option<usize>> for MaxAge {
    fn from(value: Option<usize>) -> Self {
        value.map_or(MaxAge::Infinite, MaxAge::Frames)
    }
}

impl From<MaxAge> for Option<usize> {
    fn from(value: MaxAge) -> Self {
        match value {
            MaxAge::Infinite => None,
            MaxAge::Frames(n) => Some(n),
        }
    }
}

/// Fills frames without a valid detection with the last valid one.
///
/// A carried annotation expires after `max_age` frames; from then on the
/// frame is empty until a new valid detection arrives. Frames are visited
/// in increasing index order.
pub fn smooth<V>(raw: &AnnotationSequence, validator: &V, max_age: MaxAge) -> AnnotationSequence
where
    V: AnnotationValidator + ?Sized,
{
    let mut current = Annotation::new();
    let mut age = 0usize;
    let mut smoothed = AnnotationSequence::new();

    for (index, annotation) in raw.iter() {
        if !annotation.is_empty() && validator.is_valid(annotation) {
            current = annotation.clone();
            age = 0;
        } else if max_age.allows(age) {
            age += 1;
        } else {
            current = Annotation::new();
        }
        smoothed.insert(index, current.clone());
    }
    smoothed
}
