use crate::shared::annotation::{Annotation, AnnotationSequence};
use crate::shared::error::{ComponentError, VideoError};
use crate::shared::frame_container::FrameContainer;

/// Single-image face annotator.
///
/// Returns an empty annotation when nothing was found. Implementations
/// may keep state between frames, hence `&mut self`.
pub trait Annotator {
    type Frame;

    fn annotate(&mut self, frame: &Self::Frame) -> Result<Annotation, ComponentError>;
}

impl<A: Annotator + ?Sized> Annotator for Box<A> {
    type Frame = A::Frame;

    fn annotate(&mut self, frame: &Self::Frame) -> Result<Annotation, ComponentError> {
        (**self).annotate(frame)
    }
}

/// Annotates every frame of a video, keyed by frame index.
pub trait VideoAnnotator {
    type Frame;

    fn annotate_video(
        &mut self,
        frames: &FrameContainer<Self::Frame>,
    ) -> Result<AnnotationSequence, VideoError>;
}
