use std::io::{Read, Write};
use std::path::Path;

use crate::component::domain::capabilities::ExtractorCapabilities;
use crate::component::domain::extractor::Extractor;
use crate::component::domain::training_set::TrainingSet;
use crate::component::infrastructure::registry::ComponentRegistry;
use crate::selection::domain::frame_selector::FrameSelector;
use crate::shared::error::{ComponentError, VideoError};
use crate::shared::frame_container::{FrameContainer, FrameEntry};
use crate::storage::domain::container_encoding::ContainerEncoding;

/// Extracts features from the selected frames of a video.
pub struct VideoExtractor<E> {
    extractor: E,
    capabilities: ExtractorCapabilities,
    selector: FrameSelector,
    encoding: ContainerEncoding,
}

impl<E: Extractor> VideoExtractor<E> {
    pub fn new(extractor: E, selector: FrameSelector, encoding: ContainerEncoding) -> Result<Self, VideoError> {
        selector.validate()?;
        let capabilities = extractor.capabilities();
        Ok(Self {
            extractor,
            capabilities,
            selector,
            encoding,
        })
    }

    pub fn from_registry(
        registry: &ComponentRegistry,
        name: &str,
        selector: FrameSelector,
        encoding: ContainerEncoding,
    ) -> Result<Self, VideoError>
    where
        E: 'static,
    {
        Self::new(registry.resolve::<E>(name)?, selector, encoding)
    }

    pub fn selector(&self) -> &FrameSelector {
        &self.selector
    }

    fn extract_video(&mut self, video: &FrameContainer<E::Data>) -> Result<FrameContainer<E::Feature>, VideoError> {
        let mut features = FrameContainer::new();
        for entry in self.selector.select(video) {
            let feature = self
                .extractor
                .extract(entry.payload())
                .map_err(VideoError::Component)?;
            features.add(entry.index(), feature, entry.quality())?;
        }
        Ok(features)
    }

    fn train_on_videos(
        &mut self,
        videos: &TrainingSet<&FrameContainer<E::Data>>,
        path: &Path,
    ) -> Result<(), VideoError> {
        videos.require_grouping(self.capabilities.split_training_data_by_client)?;
        let selector = &self.selector;
        let frames = videos.flat_map(|video| selector.select(*video).into_iter().map(FrameEntry::payload));
        log::info!(
            "Training extractor on {} frames from {} videos",
            frames.item_count(),
            videos.item_count()
        );
        self.extractor.train(&frames, path).map_err(VideoError::Component)
    }
}

impl<E: Extractor> Extractor for VideoExtractor<E> {
    type Data = FrameContainer<E::Data>;
    type Feature = FrameContainer<E::Feature>;

    fn capabilities(&self) -> ExtractorCapabilities {
        self.capabilities
    }

    fn extract(&mut self, data: &Self::Data) -> Result<Self::Feature, ComponentError> {
        self.extract_video(data).map_err(VideoError::into_component_error)
    }

    fn train(&mut self, data: &TrainingSet<&Self::Data>, path: &Path) -> Result<(), ComponentError> {
        self.train_on_videos(data, path)
            .map_err(VideoError::into_component_error)
    }

    fn load(&mut self, path: &Path) -> Result<(), ComponentError> {
        self.extractor.load(path)
    }

    fn write_feature(&self, feature: &Self::Feature, sink: &mut dyn Write) -> Result<(), ComponentError> {
        feature
            .write_to(sink, self.encoding, |item, w| self.extractor.write_feature(item, w))
            .map_err(VideoError::into_component_error)
    }

    fn read_feature(&self, source: &mut dyn Read) -> Result<Self::Feature, ComponentError> {
        FrameContainer::read_from(source, self.encoding, |r| self.extractor.read_feature(r))
            .map_err(VideoError::into_component_error)
    }
}
