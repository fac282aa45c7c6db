use std::io::{Read, Write};

use crate::component::domain::preprocessor::Preprocessor;
use crate::component::infrastructure::registry::ComponentRegistry;
use crate::selection::domain::frame_selector::FrameSelector;
use crate::shared::annotation::{Annotation, AnnotationSequence};
use crate::shared::error::{ComponentError, VideoError};
use crate::shared::frame_container::FrameContainer;
use crate::storage::domain::container_encoding::ContainerEncoding;

/// Computes the quality of a preprocessed frame.
pub type QualityFunction<O> = Box<dyn Fn(&O) -> Option<f64>>;

/// Runs a single-image preprocessor over every frame of a video.
///
/// Frames the wrapped preprocessor rejects are dropped. The frame
/// selector only applies to [`VideoPreprocessor::select_original`].
pub struct VideoPreprocessor<P: Preprocessor> {
    preprocessor: P,
    selector: FrameSelector,
    encoding: ContainerEncoding,
    quality_function: Option<QualityFunction<P::Output>>,
}

impl<P> VideoPreprocessor<P>
where
    P: Preprocessor<Annotations = Annotation>,
{
    pub fn new(preprocessor: P, selector: FrameSelector, encoding: ContainerEncoding) -> Result<Self, VideoError> {
        selector.validate()?;
        Ok(Self {
            preprocessor,
            selector,
            encoding,
            quality_function: None,
        })
    }

    pub fn from_registry(
        registry: &ComponentRegistry,
        name: &str,
        selector: FrameSelector,
        encoding: ContainerEncoding,
    ) -> Result<Self, VideoError>
    where
        P: 'static,
    {
        Self::new(registry.resolve::<P>(name)?, selector, encoding)
    }

    /// Overrides the quality reported by the wrapped preprocessor.
    pub fn with_quality_function(mut self, quality: impl Fn(&P::Output) -> Option<f64> + 'static) -> Self {
        self.quality_function = Some(Box::new(quality));
        self
    }

    pub fn selector(&self) -> &FrameSelector {
        &self.selector
    }

    pub fn encoding(&self) -> ContainerEncoding {
        self.encoding
    }

    /// Applies the frame selector to a raw video before preprocessing.
    pub fn select_original(&self, video: &FrameContainer<P::Data>) -> Result<FrameContainer<P::Data>, VideoError>
    where
        P::Data: Clone,
    {
        let mut selected = FrameContainer::new();
        for entry in self.selector.select(video) {
            selected.add(entry.index(), entry.payload().clone(), entry.quality())?;
        }
        Ok(selected)
    }

    fn preprocess_video(
        &mut self,
        video: &FrameContainer<P::Data>,
        annotations: Option<&AnnotationSequence>,
    ) -> Result<FrameContainer<P::Output>, VideoError> {
        let mut output = FrameContainer::new();
        for entry in video {
            let frame_annotations = annotations.and_then(|a| a.get(entry.index()));
            let preprocessed = self
                .preprocessor
                .preprocess(entry.payload(), frame_annotations)
                .map_err(VideoError::Component)?;
            let Some(preprocessed) = preprocessed else {
                log::debug!("Preprocessor rejected frame {}", entry.index());
                continue;
            };
            let quality = match &self.quality_function {
                Some(quality_function) => quality_function(&preprocessed),
                None => self.preprocessor.quality(),
            };
            output.add(entry.index(), preprocessed, quality)?;
        }
        log::debug!("Preprocessed {} of {} frames", output.len(), video.len());
        Ok(output)
    }
}

impl<P> Preprocessor for VideoPreprocessor<P>
where
    P: Preprocessor<Annotations = Annotation>,
{
    type Data = FrameContainer<P::Data>;
    type Output = FrameContainer<P::Output>;
    type Annotations = AnnotationSequence;

    fn preprocess(
        &mut self,
        data: &Self::Data,
        annotations: Option<&Self::Annotations>,
    ) -> Result<Option<Self::Output>, ComponentError> {
        self.preprocess_video(data, annotations)
            .map(Some)
            .map_err(VideoError::into_component_error)
    }

    fn write_data(&self, data: &Self::Output, sink: &mut dyn Write) -> Result<(), ComponentError> {
        data.write_to(sink, self.encoding, |item, w| self.preprocessor.write_data(item, w))
            .map_err(VideoError::into_component_error)
    }

    fn read_data(&self, source: &mut dyn Read) -> Result<Self::Output, ComponentError> {
        FrameContainer::read_from(source, self.encoding, |r| self.preprocessor.read_data(r))
            .map_err(VideoError::into_component_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    /// Crops by scaling the frame value; rejects negative frames and
    /// reports the last frame's value as its quality.
    #[derive(Default)]
    struct FakePreprocessor {
        calls: usize,
        last_quality: Option<f64>,
        seen_annotations: Vec<Option<Annotation>>,
    }

    impl Preprocessor for FakePreprocessor {
        type Data = f64;
        type Output = f64;
        type Annotations = Annotation;

        fn preprocess(
            &mut self,
            data: &f64,
            annotations: Option<&Annotation>,
        ) -> Result<Option<f64>, ComponentError> {
            self.calls += 1;
            self.seen_annotations.push(annotations.cloned());
            if *data < 0.0 {
                return Ok(None);
            }
            self.last_quality = Some(*data / 10.0);
            Ok(Some(*data * 2.0))
        }

        fn quality(&self) -> Option<f64> {
            self.last_quality
        }

        fn write_data(&self, data: &f64, sink: &mut dyn Write) -> Result<(), ComponentError> {
            sink.write_all(&data.to_le_bytes())?;
            Ok(())
        }

        fn read_data(&self, source: &mut dyn Read) -> Result<f64, ComponentError> {
            let mut bytes = [0u8; 8];
            source.read_exact(&mut bytes)?;
            Ok(f64::from_le_bytes(bytes))
        }
    }

    fn video(values: &[f64]) -> FrameContainer<f64> {
        let mut fc = FrameContainer::new();
        for (i, v) in values.iter().enumerate() {
            fc.add(i, *v, None).unwrap();
        }
        fc
    }

    fn adapter() -> VideoPreprocessor<FakePreprocessor> {
        VideoPreprocessor::new(
            FakePreprocessor::default(),
            FrameSelector::First { max_frames: 1 },
            ContainerEncoding::Record,
        )
        .unwrap()
    }

    #[test]
    fn test_every_frame_is_preprocessed_regardless_of_selector() {
        let mut preprocessor = adapter();
        let output = preprocessor.preprocess(&video(&[1.0, 2.0, 3.0]), None).unwrap().unwrap();

        assert_eq!(output.len(), 3);
        assert_eq!(preprocessor.preprocessor.calls, 3);
        assert_relative_eq!(*output.get(2).unwrap().payload(), 6.0);
    }

    #[test]
    fn test_rejected_frames_are_dropped() {
        let mut preprocessor = adapter();
        let output = preprocessor
            .preprocess(&video(&[1.0, -1.0, 3.0]), None)
            .unwrap()
            .unwrap();

        assert_eq!(output.indices().collect::<Vec<_>>(), vec![0, 2]);
    }

    #[test]
    fn test_quality_comes_from_wrapped_preprocessor() {
        let mut preprocessor = adapter();
        let output = preprocessor.preprocess(&video(&[5.0]), None).unwrap().unwrap();
        assert_relative_eq!(output.get(0).unwrap().quality().unwrap(), 0.5);
    }

    #[test]
    fn test_quality_function_takes_precedence() {
        let mut preprocessor = adapter().with_quality_function(|cropped: &f64| Some(*cropped + 100.0));
        let output = preprocessor.preprocess(&video(&[5.0]), None).unwrap().unwrap();
        assert_relative_eq!(output.get(0).unwrap().quality().unwrap(), 110.0);
    }

    #[test]
    fn test_annotations_are_looked_up_per_frame_index() {
        let face = Annotation::from_box((0.0, 0.0), (40.0, 40.0));
        let annotations: AnnotationSequence = [(1, face.clone())].into_iter().collect();
        let mut preprocessor = adapter();

        preprocessor
            .preprocess(&video(&[1.0, 2.0]), Some(&annotations))
            .unwrap();

        assert_eq!(preprocessor.preprocessor.seen_annotations, vec![None, Some(face)]);
    }

    #[test]
    fn test_select_original_applies_selector() {
        let preprocessor = adapter();
        let selected = preprocessor.select_original(&video(&[1.0, 2.0, 3.0])).unwrap();
        assert_eq!(selected.indices().collect::<Vec<_>>(), vec![0]);
    }

    #[rstest]
    #[case::record(ContainerEncoding::Record)]
    #[case::compressed(ContainerEncoding::Compressed)]
    fn test_data_round_trip(#[case] encoding: ContainerEncoding) {
        let mut preprocessor =
            VideoPreprocessor::new(FakePreprocessor::default(), FrameSelector::default(), encoding).unwrap();
        let output = preprocessor.preprocess(&video(&[1.0, 4.0]), None).unwrap().unwrap();

        let mut bytes = Vec::new();
        preprocessor.write_data(&output, &mut bytes).unwrap();
        let restored = preprocessor.read_data(&mut bytes.as_slice()).unwrap();

        assert_eq!(restored, output);
    }

    #[test]
    fn test_invalid_selector_is_rejected() {
        let err = VideoPreprocessor::new(
            FakePreprocessor::default(),
            FrameSelector::Step {
                step: 0,
                max_frames: None,
            },
            ContainerEncoding::Record,
        )
        .err()
        .unwrap();
        assert!(matches!(err, VideoError::InvalidSelector(_)));
    }

    #[test]
    fn test_registry_construction() {
        let mut registry = ComponentRegistry::new();
        registry.register("fake", || Ok(FakePreprocessor::default()));

        let preprocessor: VideoPreprocessor<FakePreprocessor> =
            VideoPreprocessor::from_registry(&registry, "fake", FrameSelector::All, ContainerEncoding::Record)
                .unwrap();
        assert_eq!(preprocessor.selector(), &FrameSelector::All);
        assert_eq!(preprocessor.encoding(), ContainerEncoding::Record);
    }
}
