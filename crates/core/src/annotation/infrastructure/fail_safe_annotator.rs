use crate::annotation::domain::annotation_validator::{AnnotationValidator, MinFaceSizeValidator};
use crate::annotation::domain::annotator::{Annotator, VideoAnnotator};
use crate::component::infrastructure::registry::ComponentRegistry;
use crate::config::VideoConfig;
use crate::shared::annotation::{Annotation, AnnotationSequence};
use crate::shared::constants::DEFAULT_FAIL_SAFE_MAX_AGE;
use crate::shared::error::VideoError;
use crate::shared::frame_container::FrameContainer;

/// Tries a chain of annotators per frame, falling back to a recent
/// annotation before consulting the next annotator.
///
/// For every frame the annotators run in priority order. The first
/// valid result is taken. When an annotator fails and the last accepted
/// annotation is younger than `max_age` frames, that annotation is reused
/// and the rest of the chain is skipped for this frame.
pub struct FailSafeAnnotator<T> {
    annotators: Vec<Box<dyn Annotator<Frame = T>>>,
    required_keys: Vec<String>,
    max_age: usize,
    validator: Box<dyn AnnotationValidator>,
}

impl<T> FailSafeAnnotator<T> {
    pub fn new(annotators: Vec<Box<dyn Annotator<Frame = T>>>, max_age: usize) -> Result<Self, VideoError> {
        if max_age == 0 {
            return Err(VideoError::InvalidMaxAge(
                "fail-safe max age must be at least 1".to_string(),
            ));
        }
        if annotators.is_empty() {
            return Err(VideoError::Precondition(
                "fail-safe annotation needs at least one annotator".to_string(),
            ));
        }
        Ok(Self {
            annotators,
            required_keys: Vec::new(),
            max_age,
            validator: Box::new(MinFaceSizeValidator::default()),
        })
    }

    pub fn with_default_age(annotators: Vec<Box<dyn Annotator<Frame = T>>>) -> Result<Self, VideoError> {
        Self::new(annotators, DEFAULT_FAIL_SAFE_MAX_AGE)
    }

    /// Chain aged by `annotation.fail_safe_max_age`, validated by the
    /// configured minimum face size.
    pub fn from_config(
        annotators: Vec<Box<dyn Annotator<Frame = T>>>,
        config: &VideoConfig,
    ) -> Result<Self, VideoError> {
        Ok(Self::new(annotators, config.annotation.fail_safe_max_age)?.with_validator(config.validator()))
    }

    /// Builds the chain from registered annotator names, in the given order.
    pub fn from_registry(
        registry: &ComponentRegistry,
        names: &[&str],
        max_age: usize,
    ) -> Result<Self, VideoError>
    where
        T: 'static,
    {
        let annotators = names
            .iter()
            .map(|name| registry.resolve::<Box<dyn Annotator<Frame = T>>>(name))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(annotators, max_age)
    }

    /// Keys an annotation must contain to count as a detection.
    pub fn with_required_keys<I, K>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        self.required_keys = keys.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_validator(mut self, validator: impl AnnotationValidator + 'static) -> Self {
        self.validator = Box::new(validator);
        self
    }

    pub fn max_age(&self) -> usize {
        self.max_age
    }
}

fn is_detection(annotation: &Annotation, required_keys: &[String], validator: &dyn AnnotationValidator) -> bool {
    !annotation.is_empty()
        && required_keys.iter().all(|key| annotation.contains_key(key))
        && validator.is_valid(annotation)
}

impl<T> VideoAnnotator for FailSafeAnnotator<T> {
    type Frame = T;

    fn annotate_video(&mut self, frames: &FrameContainer<T>) -> Result<AnnotationSequence, VideoError> {
        let Self {
            annotators,
            required_keys,
            max_age,
            validator,
        } = self;

        let mut current = Annotation::new();
        let mut age = 0usize;
        let mut annotations = AnnotationSequence::new();

        for entry in frames {
            for (position, annotator) in annotators.iter_mut().enumerate() {
                let candidate = annotator.annotate(entry.payload()).map_err(VideoError::Component)?;
                if is_detection(&candidate, required_keys, &**validator) {
                    current = candidate;
                    age = 0;
                    break;
                }
                if !current.is_empty() && age < *max_age {
                    age += 1;
                    break;
                }
                log::debug!(
                    "Annotator {} found no usable face in frame {}",
                    position,
                    entry.index()
                );
                current = Annotation::new();
            }
            annotations.insert(entry.index(), current.clone());
        }
        Ok(annotations)
    }
}
