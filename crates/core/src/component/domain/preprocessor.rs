use std::io::{Read, Write};

use crate::shared::error::ComponentError;

/// Domain interface for data preprocessing (e.g. face cropping).
///
/// `preprocess` returns `None` when the input cannot be used, for example
/// when no face is found.
pub trait Preprocessor {
    type Data;
    type Output;
    type Annotations;

    fn preprocess(
        &mut self,
        data: &Self::Data,
        annotations: Option<&Self::Annotations>,
    ) -> Result<Option<Self::Output>, ComponentError>;

    /// Quality of the most recent `preprocess` result, if the
    /// implementation measures one.
    fn quality(&self) -> Option<f64> {
        None
    }

    fn write_data(&self, data: &Self::Output, sink: &mut dyn Write) -> Result<(), ComponentError>;

    fn read_data(&self, source: &mut dyn Read) -> Result<Self::Output, ComponentError>;
}

impl<P: Preprocessor + ?Sized> Preprocessor for Box<P> {
    type Data = P::Data;
    type Output = P::Output;
    type Annotations = P::Annotations;

    fn preprocess(
        &mut self,
        data: &Self::Data,
        annotations: Option<&Self::Annotations>,
    ) -> Result<Option<Self::Output>, ComponentError> {
        (**self).preprocess(data, annotations)
    }

    fn quality(&self) -> Option<f64> {
        (**self).quality()
    }

    fn write_data(&self, data: &Self::Output, sink: &mut dyn Write) -> Result<(), ComponentError> {
        (**self).write_data(data, sink)
    }

    fn read_data(&self, source: &mut dyn Read) -> Result<Self::Output, ComponentError> {
        (**self).read_data(source)
    }
}
