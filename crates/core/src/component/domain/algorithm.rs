use std::io::{Read, Write};
use std::path::Path;

use crate::component::domain::capabilities::AlgorithmCapabilities;
use crate::component::domain::training_set::TrainingSet;
use crate::shared::error::ComponentError;

/// Domain interface for a recognition algorithm: optional projection,
/// enrollment of client models and scoring of probes against them.
pub trait Algorithm {
    type Feature;
    type Model;

    fn capabilities(&self) -> AlgorithmCapabilities;

    fn train_projector(
        &mut self,
        _data: &TrainingSet<&Self::Feature>,
        _path: &Path,
    ) -> Result<(), ComponentError> {
        Err("this algorithm has no trainable projector".into())
    }

    fn load_projector(&mut self, _path: &Path) -> Result<(), ComponentError> {
        Ok(())
    }

    fn project(&mut self, _feature: &Self::Feature) -> Result<Self::Feature, ComponentError> {
        Err("this algorithm does not project features".into())
    }

    fn write_feature(&self, feature: &Self::Feature, sink: &mut dyn Write) -> Result<(), ComponentError>;

    fn read_feature(&self, source: &mut dyn Read) -> Result<Self::Feature, ComponentError>;

    /// Trains the enroller from features grouped per client.
    fn train_enroller(
        &mut self,
        _data: &[Vec<&Self::Feature>],
        _path: &Path,
    ) -> Result<(), ComponentError> {
        Err("this algorithm has no trainable enroller".into())
    }

    fn load_enroller(&mut self, _path: &Path) -> Result<(), ComponentError> {
        Ok(())
    }

    fn enroll(&mut self, features: &[&Self::Feature]) -> Result<Self::Model, ComponentError>;

    fn write_model(&self, model: &Self::Model, sink: &mut dyn Write) -> Result<(), ComponentError>;

    fn read_model(&self, source: &mut dyn Read) -> Result<Self::Model, ComponentError>;

    fn read_probe(&self, source: &mut dyn Read) -> Result<Self::Feature, ComponentError> {
        self.read_feature(source)
    }

    fn score(&self, model: &Self::Model, probe: &Self::Feature) -> Result<f64, ComponentError>;

    /// Fuses the scores of several probes of the same identity.
    ///
    /// Default: the mean of the individual scores.
    fn score_for_multiple_probes(
        &self,
        model: &Self::Model,
        probes: &[&Self::Feature],
    ) -> Result<f64, ComponentError> {
        if probes.is_empty() {
            return Err("cannot score an empty list of probes".into());
        }
        let mut total = 0.0;
        for probe in probes {
            total += self.score(model, probe)?;
        }
        Ok(total / probes.len() as f64)
    }
}

impl<A: Algorithm + ?Sized> Algorithm for Box<A> {
    type Feature = A::Feature;
    type Model = A::Model;

    fn capabilities(&self) -> AlgorithmCapabilities {
        (**self).capabilities()
    }

    fn train_projector(&mut self, data: &TrainingSet<&Self::Feature>, path: &Path) -> Result<(), ComponentError> {
        (**self).train_projector(data, path)
    }

    fn load_projector(&mut self, path: &Path) -> Result<(), ComponentError> {
        (**self).load_projector(path)
    }

    fn project(&mut self, feature: &Self::Feature) -> Result<Self::Feature, ComponentError> {
        (**self).project(feature)
    }

    fn write_feature(&self, feature: &Self::Feature, sink: &mut dyn Write) -> Result<(), ComponentError> {
        (**self).write_feature(feature, sink)
    }

    fn read_feature(&self, source: &mut dyn Read) -> Result<Self::Feature, ComponentError> {
        (**self).read_feature(source)
    }

    fn train_enroller(&mut self, data: &[Vec<&Self::Feature>], path: &Path) -> Result<(), ComponentError> {
        (**self).train_enroller(data, path)
    }

    fn load_enroller(&mut self, path: &Path) -> Result<(), ComponentError> {
        (**self).load_enroller(path)
    }

    fn enroll(&mut self, features: &[&Self::Feature]) -> Result<Self::Model, ComponentError> {
        (**self).enroll(features)
    }

    fn write_model(&self, model: &Self::Model, sink: &mut dyn Write) -> Result<(), ComponentError> {
        (**self).write_model(model, sink)
    }

    fn read_model(&self, source: &mut dyn Read) -> Result<Self::Model, ComponentError> {
        (**self).read_model(source)
    }

    fn read_probe(&self, source: &mut dyn Read) -> Result<Self::Feature, ComponentError> {
        (**self).read_probe(source)
    }

    fn score(&self, model: &Self::Model, probe: &Self::Feature) -> Result<f64, ComponentError> {
        (**self).score(model, probe)
    }

    fn score_for_multiple_probes(
        &self,
        model: &Self::Model,
        probes: &[&Self::Feature],
    ) -> Result<f64, ComponentError> {
        (**self).score_for_multiple_probes(model, probes)
    }
}
