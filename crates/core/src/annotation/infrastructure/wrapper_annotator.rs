use crate::annotation::domain::annotation_smoother::{smooth, MaxAge};
use crate::annotation::domain::annotation_validator::{AnnotationValidator, MinFaceSizeValidator};
use crate::annotation::domain::annotator::{Annotator, VideoAnnotator};
use crate::component::infrastructure::registry::ComponentRegistry;
use crate::config::VideoConfig;
use crate::shared::annotation::AnnotationSequence;
use crate::shared::error::VideoError;
use crate::shared::frame_container::FrameContainer;

/// Runs a single-image annotator over every frame of a video.
///
/// With normalization enabled (the default), raw results are smoothed so
/// frames without a valid detection reuse the last valid one.
pub struct WrapperAnnotator<A> {
    annotator: A,
    normalize: bool,
    max_age: MaxAge,
    validator: Box<dyn AnnotationValidator>,
}

impl<A: Annotator> WrapperAnnotator<A> {
    pub fn new(annotator: A) -> Self {
        Self {
            annotator,
            normalize: true,
            max_age: MaxAge::Infinite,
            validator: Box::new(MinFaceSizeValidator::default()),
        }
    }

    /// Normalizing wrapper using the configured max age and face size.
    pub fn from_config(annotator: A, config: &VideoConfig) -> Self {
        Self::new(annotator)
            .with_max_age(config.annotation.max_age)
            .with_validator(config.validator())
    }

    pub fn from_registry(registry: &ComponentRegistry, name: &str) -> Result<Self, VideoError>
    where
        A: 'static,
    {
        Ok(Self::new(registry.resolve::<A>(name)?))
    }

    pub fn with_normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }

    pub fn with_max_age(mut self, max_age: MaxAge) -> Self {
        self.max_age = max_age;
        self
    }

    pub fn with_validator(mut self, validator: impl AnnotationValidator + 'static) -> Self {
        self.validator = Box::new(validator);
        self
    }
}

impl<A: Annotator> VideoAnnotator for WrapperAnnotator<A> {
    type Frame = A::Frame;

    fn annotate_video(&mut self, frames: &FrameContainer<A::Frame>) -> Result<AnnotationSequence, VideoError> {
        let mut raw = AnnotationSequence::new();
        for entry in frames {
            let annotation = self
                .annotator
                .annotate(entry.payload())
                .map_err(VideoError::Component)?;
            raw.insert(entry.index(), annotation);
        }

        if !self.normalize {
            return Ok(raw);
        }
        Ok(smooth(&raw, self.validator.as_ref(), self.max_age))
    }
}
