use std::io::{Read, Write};
use std::path::Path;

use crate::component::domain::algorithm::Algorithm;
use crate::component::domain::capabilities::AlgorithmCapabilities;
use crate::component::domain::training_set::TrainingSet;
use crate::component::infrastructure::registry::ComponentRegistry;
use crate::selection::domain::frame_selector::{EnrollmentSelection, FrameSelector};
use crate::shared::error::{ComponentError, VideoError};
use crate::shared::frame_container::{FrameContainer, FrameEntry};
use crate::storage::domain::container_encoding::ContainerEncoding;

/// Runs a single-image recognition algorithm on videos.
///
/// Projection and projector training use the configured selector.
/// Enrollment uses every frame when the wrapped algorithm enrolls from
/// projected features (those were already selected during projection),
/// and the configured selector otherwise. Scoring always uses every
/// probe frame.
pub struct VideoAlgorithm<A> {
    algorithm: A,
    capabilities: AlgorithmCapabilities,
    selector: FrameSelector,
    enroll_selector: FrameSelector,
    encoding: ContainerEncoding,
}

fn selected_payloads<'a, T>(selector: &FrameSelector, videos: &[&'a FrameContainer<T>]) -> Vec<&'a T> {
    videos
        .iter()
        .flat_map(|video| selector.select(*video).into_iter().map(FrameEntry::payload))
        .collect()
}

impl<A: Algorithm> VideoAlgorithm<A> {
    pub fn new(algorithm: A, selector: FrameSelector, encoding: ContainerEncoding) -> Result<Self, VideoError> {
        selector.validate()?;
        let capabilities = algorithm.capabilities();
        let enroll_selector =
            EnrollmentSelection::for_projected_enrollment(capabilities.use_projected_features_for_enrollment)
                .resolve(&selector);
        Ok(Self {
            algorithm,
            capabilities,
            selector,
            enroll_selector,
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
        A: 'static,
    {
        Self::new(registry.resolve::<A>(name)?, selector, encoding)
    }

    pub fn selector(&self) -> &FrameSelector {
        &self.selector
    }

    pub fn enroll_selector(&self) -> &FrameSelector {
        &self.enroll_selector
    }

    /// Scores a single frame feature against a model.
    pub fn score_feature(&self, model: &A::Model, probe: &A::Feature) -> Result<f64, ComponentError> {
        self.algorithm.score(model, probe)
    }

    /// Scores a flat list of frame features as one probe.
    pub fn score_features(&self, model: &A::Model, probes: &[&A::Feature]) -> Result<f64, ComponentError> {
        self.algorithm.score_for_multiple_probes(model, probes)
    }

    fn train_projector_on_videos(
        &mut self,
        videos: &TrainingSet<&FrameContainer<A::Feature>>,
        path: &Path,
    ) -> Result<(), VideoError> {
        videos.require_grouping(self.capabilities.split_training_features_by_client)?;
        let selector = &self.selector;
        let features = videos.flat_map(|video| selector.select(*video).into_iter().map(FrameEntry::payload));
        log::info!(
            "Training projector on {} frames from {} videos",
            features.item_count(),
            videos.item_count()
        );
        self.algorithm
            .train_projector(&features, path)
            .map_err(VideoError::Component)
    }

    fn project_video(&mut self, video: &FrameContainer<A::Feature>) -> Result<FrameContainer<A::Feature>, VideoError> {
        let mut projected = FrameContainer::new();
        for entry in self.selector.select(video) {
            let feature = self
                .algorithm
                .project(entry.payload())
                .map_err(VideoError::Component)?;
            projected.add(entry.index(), feature, entry.quality())?;
        }
        Ok(projected)
    }
}

impl<A: Algorithm> Algorithm for VideoAlgorithm<A> {
    type Feature = FrameContainer<A::Feature>;
    type Model = A::Model;

    fn capabilities(&self) -> AlgorithmCapabilities {
        self.capabilities
    }

    fn train_projector(&mut self, data: &TrainingSet<&Self::Feature>, path: &Path) -> Result<(), ComponentError> {
        self.train_projector_on_videos(data, path)
            .map_err(VideoError::into_component_error)
    }

    fn load_projector(&mut self, path: &Path) -> Result<(), ComponentError> {
        self.algorithm.load_projector(path)
    }

    fn project(&mut self, feature: &Self::Feature) -> Result<Self::Feature, ComponentError> {
        self.project_video(feature).map_err(VideoError::into_component_error)
    }

    fn write_feature(&self, feature: &Self::Feature, sink: &mut dyn Write) -> Result<(), ComponentError> {
        feature
            .write_to(sink, self.encoding, |item, w| self.algorithm.write_feature(item, w))
            .map_err(VideoError::into_component_error)
    }

    fn read_feature(&self, source: &mut dyn Read) -> Result<Self::Feature, ComponentError> {
        FrameContainer::read_from(source, self.encoding, |r| self.algorithm.read_feature(r))
            .map_err(VideoError::into_component_error)
    }

    fn train_enroller(&mut self, data: &[Vec<&Self::Feature>], path: &Path) -> Result<(), ComponentError> {
        let features: Vec<Vec<&A::Feature>> = data
            .iter()
            .map(|client| selected_payloads(&self.enroll_selector, client))
            .collect();
        log::info!("Training enroller on {} clients", features.len());
        self.algorithm.train_enroller(&features, path)
    }

    fn load_enroller(&mut self, path: &Path) -> Result<(), ComponentError> {
        self.algorithm.load_enroller(path)
    }

    fn enroll(&mut self, features: &[&Self::Feature]) -> Result<Self::Model, ComponentError> {
        let frames = selected_payloads(&self.enroll_selector, features);
        log::debug!("Enrolling model from {} frames of {} videos", frames.len(), features.len());
        self.algorithm.enroll(&frames)
    }

    fn write_model(&self, model: &Self::Model, sink: &mut dyn Write) -> Result<(), ComponentError> {
        self.algorithm.write_model(model, sink)
    }

    fn read_model(&self, source: &mut dyn Read) -> Result<Self::Model, ComponentError> {
        self.algorithm.read_model(source)
    }

    /// Reads a probe container; input that is not a container at all is
    /// read as a single probe frame.
    fn read_probe(&self, source: &mut dyn Read) -> Result<Self::Feature, ComponentError> {
        FrameContainer::read_from_with_legacy_fallback(source, self.encoding, |r| self.algorithm.read_probe(r))
            .map_err(VideoError::into_component_error)
    }

    fn score(&self, model: &Self::Model, probe: &Self::Feature) -> Result<f64, ComponentError> {
        let frames: Vec<&A::Feature> = probe.payloads().collect();
        self.algorithm.score_for_multiple_probes(model, &frames)
    }

    fn score_for_multiple_probes(
        &self,
        model: &Self::Model,
        probes: &[&Self::Feature],
    ) -> Result<f64, ComponentError> {
        let frames: Vec<&A::Feature> = probes.iter().flat_map(|probe| probe.payloads()).collect();
        self.algorithm.score_for_multiple_probes(model, &frames)
    }
}
