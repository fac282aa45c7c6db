/// Training requirements an extractor advertises to the pipeline.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExtractorCapabilities {
    pub requires_training: bool,
    pub split_training_data_by_client: bool,
}

/// Projection, enrollment and training flags of a recognition algorithm.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AlgorithmCapabilities {
    pub performs_projection: bool,
    pub requires_projector_training: bool,
    pub split_training_features_by_client: bool,
    pub use_projected_features_for_enrollment: bool,
    pub requires_enroller_training: bool,
}

impl Default for AlgorithmCapabilities {
    fn default() -> Self {
        Self {
            performs_projection: false,
            requires_projector_training: true,
            split_training_features_by_client: false,
            use_projected_features_for_enrollment: true,
            requires_enroller_training: false,
        }
    }
}
