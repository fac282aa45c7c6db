use crate::shared::error::VideoError;

/// Training data, either one flat list or grouped per client identity.
#[derive(Clone, Debug, PartialEq)]
pub enum TrainingSet<T> {
    Flat(Vec<T>),
    ByClient(Vec<Vec<T>>),
}

impl<T> TrainingSet<T> {
    pub fn is_by_client(&self) -> bool {
        matches!(self, TrainingSet::ByClient(_))
    }

    /// Total number of items over all clients.
    pub fn item_count(&self) -> usize {
        match self {
            TrainingSet::Flat(items) => items.len(),
            TrainingSet::ByClient(clients) => clients.iter().map(Vec::len).sum(),
        }
    }

    /// Fails unless the grouping matches what the consumer expects.
    pub fn require_grouping(&self, by_client: bool) -> Result<(), VideoError> {
        if self.is_by_client() == by_client {
            return Ok(());
        }
        let (expected, got) = if by_client {
            ("grouped by client", "a flat list")
        } else {
            ("a flat list", "grouped by client")
        };
        Err(VideoError::Precondition(format!(
            "training data must be {expected}, got {got}"
        )))
    }

    /// Expands every item into zero or more items, keeping the grouping.
    pub fn flat_map<'a, U, I, F>(&'a self, mut expand: F) -> TrainingSet<U>
    where
        F: FnMut(&'a T) -> I,
        I: IntoIterator<Item = U>,
    {
        match self {
            TrainingSet::Flat(items) => TrainingSet::Flat(items.iter().flat_map(&mut expand).collect()),
            TrainingSet::ByClient(clients) => TrainingSet::ByClient(
                clients
                    .iter()
                    .map(|client| client.iter().flat_map(&mut expand).collect::<Vec<U>>())
                    .collect(),
            ),
        }
    }
}
