use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A `(y, x)` image coordinate.
pub type Point = (f64, f64);

/// One named entry of an annotation: a landmark or box corner, or a
/// scalar such as a detector confidence.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnnotationValue {
    Point(Point),
    Scalar(f64),
}

/// Named landmarks and box corners for one frame.
///
/// An empty annotation means "no detection at this frame".
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Annotation(BTreeMap<String, AnnotationValue>);

impl Annotation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Annotation holding a `topleft`/`bottomright` box.
    pub fn from_box(topleft: Point, bottomright: Point) -> Self {
        let mut annotation = Self::new();
        annotation.insert("topleft", topleft);
        annotation.insert("bottomright", bottomright);
        annotation
    }

    pub fn insert(&mut self, key: impl Into<String>, point: Point) {
        self.0.insert(key.into(), AnnotationValue::Point(point));
    }

    pub fn insert_scalar(&mut self, key: impl Into<String>, value: f64) {
        self.0.insert(key.into(), AnnotationValue::Scalar(value));
    }

    /// The point stored under `key`; `None` for missing keys and scalars.
    pub fn get(&self, key: &str) -> Option<Point> {
        match self.0.get(key) {
            Some(AnnotationValue::Point(point)) => Some(*point),
            _ => None,
        }
    }

    pub fn scalar(&self, key: &str) -> Option<f64> {
        match self.0.get(key) {
            Some(AnnotationValue::Scalar(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, AnnotationValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl<K: Into<String>> FromIterator<(K, Point)> for Annotation {
    fn from_iter<I: IntoIterator<Item = (K, Point)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), AnnotationValue::Point(v)))
                .collect(),
        )
    }
}

/// Per-frame annotations of one video, ordered by frame index.
///
/// Serializes as a JSON object keyed by the frame index as a string,
/// the exchange format produced by video annotators.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnnotationSequence(BTreeMap<usize, Annotation>);

impl AnnotationSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, index: usize, annotation: Annotation) {
        self.0.insert(index, annotation);
    }

    pub fn get(&self, index: usize) -> Option<&Annotation> {
        self.0.get(&index)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Frames in increasing index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Annotation)> {
        self.0.iter().map(|(k, v)| (*k, v))
    }

    /// Parses `{"<frame>": {"<key>": [y, x] | number, ...}, ...}`.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl FromIterator<(usize, Annotation)> for AnnotationSequence {
    fn from_iter<I: IntoIterator<Item = (usize, Annotation)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
