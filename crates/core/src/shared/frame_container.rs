use indexmap::map::Entry;
use indexmap::IndexMap;

use crate::shared::error::VideoError;

/// One frame of a video: its ordinal index, payload and optional quality.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameEntry<T> {
    index: usize,
    payload: T,
    quality: Option<f64>,
}

impl<T> FrameEntry<T> {
    pub fn new(index: usize, payload: T, quality: Option<f64>) -> Self {
        Self {
            index,
            payload,
            quality,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn payload(&self) -> &T {
        &self.payload
    }

    pub fn quality(&self) -> Option<f64> {
        self.quality
    }

    pub fn into_payload(self) -> T {
        self.payload
    }
}

/// Ordered, index-keyed frames of a single video.
///
/// Iteration follows insertion order. Indices are unique: adding a frame
/// whose index is already present fails instead of overwriting.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameContainer<T> {
    frames: IndexMap<usize, FrameEntry<T>>,
}

impl<T> Default for FrameContainer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FrameContainer<T> {
    pub fn new() -> Self {
        Self {
            frames: IndexMap::new(),
        }
    }

    pub fn add(&mut self, index: usize, payload: T, quality: Option<f64>) -> Result<(), VideoError> {
        match self.frames.entry(index) {
            Entry::Occupied(_) => Err(VideoError::DuplicateIndex(index)),
            Entry::Vacant(slot) => {
                slot.insert(FrameEntry::new(index, payload, quality));
                Ok(())
            }
        }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&FrameEntry<T>> {
        self.frames.get(&index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FrameEntry<T>> {
        self.frames.values()
    }

    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.frames.keys().copied()
    }

    pub fn payloads(&self) -> impl Iterator<Item = &T> {
        self.frames.values().map(FrameEntry::payload)
    }

    pub fn into_entries(self) -> impl Iterator<Item = FrameEntry<T>> {
        self.frames.into_values()
    }
}

impl<'a, T> IntoIterator for &'a FrameContainer<T> {
    type Item = &'a FrameEntry<T>;
    type IntoIter = indexmap::map::Values<'a, usize, FrameEntry<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.frames.values()
    }
}
