use std::io::{Read, Write};
use std::path::Path;

use crate::component::domain::capabilities::ExtractorCapabilities;
use crate::component::domain::training_set::TrainingSet;
use crate::shared::error::ComponentError;

/// Domain interface for feature extraction.
pub trait Extractor {
    type Data;
    type Feature;

    fn capabilities(&self) -> ExtractorCapabilities {
        ExtractorCapabilities::default()
    }

    fn extract(&mut self, data: &Self::Data) -> Result<Self::Feature, ComponentError>;

    /// Trains the extractor and stores the result at `path`.
    fn train(&mut self, _data: &TrainingSet<&Self::Data>, _path: &Path) -> Result<(), ComponentError> {
        Err("this extractor cannot be trained".into())
    }

    fn load(&mut self, _path: &Path) -> Result<(), ComponentError> {
        Ok(())
    }

    fn write_feature(&self, feature: &Self::Feature, sink: &mut dyn Write) -> Result<(), ComponentError>;

    fn read_feature(&self, source: &mut dyn Read) -> Result<Self::Feature, ComponentError>;
}

impl<E: Extractor + ?Sized> Extractor for Box<E> {
    type Data = E::Data;
    type Feature = E::Feature;

    fn capabilities(&self) -> ExtractorCapabilities {
        (**self).capabilities()
    }

    fn extract(&mut self, data: &Self::Data) -> Result<Self::Feature, ComponentError> {
        (**self).extract(data)
    }

    fn train(&mut self, data: &TrainingSet<&Self::Data>, path: &Path) -> Result<(), ComponentError> {
        (**self).train(data, path)
    }

    fn load(&mut self, path: &Path) -> Result<(), ComponentError> {
        (**self).load(path)
    }

    fn write_feature(&self, feature: &Self::Feature, sink: &mut dyn Write) -> Result<(), ComponentError> {
        (**self).write_feature(feature, sink)
    }

    fn read_feature(&self, source: &mut dyn Read) -> Result<Self::Feature, ComponentError> {
        (**self).read_feature(source)
    }
}
