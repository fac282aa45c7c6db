use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::shared::constants::DEFAULT_MAX_FRAMES;
use crate::shared::error::VideoError;
use crate::shared::frame_container::{FrameContainer, FrameEntry};

/// Policy choosing which frames of a video get processed.
///
/// Selection is a pure function of the container; positions refer to
/// insertion order, not to frame indices.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "style", rename_all = "snake_case")]
pub enum FrameSelector {
    /// Every frame, in container order.
    All,
    /// The first `max_frames` frames.
    First { max_frames: usize },
    /// `max_frames` frames spread evenly over the whole video.
    Spread { max_frames: usize },
    /// Every `step`-th frame starting with the first, optionally capped.
    Step {
        step: usize,
        #[serde(default)]
        max_frames: Option<usize>,
    },
    /// The `count` highest-quality frames, best first.
    ///
    /// Ties keep container order; frames without a quality come last.
    TopQuality { count: usize },
}

impl Default for FrameSelector {
    fn default() -> Self {
        FrameSelector::Spread {
            max_frames: DEFAULT_MAX_FRAMES,
        }
    }
}

impl FrameSelector {
    pub fn every(step: usize) -> Result<Self, VideoError> {
        let selector = FrameSelector::Step {
            step,
            max_frames: None,
        };
        selector.validate()?;
        Ok(selector)
    }

    pub fn validate(&self) -> Result<(), VideoError> {
        match self {
            FrameSelector::Step { step: 0, .. } => Err(VideoError::InvalidSelector(
                "step must be >= 1".to_string(),
            )),
            _ => Ok(()),
        }
    }

    pub fn select<'a, T>(&self, container: &'a FrameContainer<T>) -> Vec<&'a FrameEntry<T>> {
        let frames: Vec<&FrameEntry<T>> = container.iter().collect();
        let count = frames.len();

        match *self {
            FrameSelector::All => frames,
            FrameSelector::First { max_frames } => frames.into_iter().take(max_frames).collect(),
            FrameSelector::Spread { max_frames } => {
                if count <= max_frames {
                    return frames;
                }
                (0..max_frames)
                    .map(|i| frames[(2 * i + 1) * count / (2 * max_frames)])
                    .collect()
            }
            FrameSelector::Step { step, max_frames } => frames
                .into_iter()
                .step_by(step.max(1))
                .take(max_frames.unwrap_or(usize::MAX))
                .collect(),
            FrameSelector::TopQuality { count: keep } => {
                let mut ranked = frames;
                ranked.sort_by(|a, b| compare_quality_desc(a.quality(), b.quality()));
                ranked.truncate(keep);
                ranked
            }
        }
    }
}

fn compare_quality_desc(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.total_cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Which frames an enrollment step sees.
///
/// When features were already reduced to selected frames during
/// projection, enrollment uses every frame it receives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnrollmentSelection {
    UseConfiguredSelector,
    UseAllFrames,
}

impl EnrollmentSelection {
    pub fn for_projected_enrollment(uses_projected_features: bool) -> Self {
        if uses_projected_features {
            EnrollmentSelection::UseAllFrames
        } else {
            EnrollmentSelection::UseConfiguredSelector
        }
    }

    pub fn resolve(self, configured: &FrameSelector) -> FrameSelector {
        match self {
            EnrollmentSelection::UseConfiguredSelector => configured.clone(),
            EnrollmentSelection::UseAllFrames => FrameSelector::All,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn video(len: usize) -> FrameContainer<usize> {
        let mut fc = FrameContainer::new();
        for i in 0..len {
            fc.add(i, i * 100, None).unwrap();
        }
        fc
    }

    fn with_qualities(qualities: &[Option<f64>]) -> FrameContainer<usize> {
        let mut fc = FrameContainer::new();
        for (i, q) in qualities.iter().enumerate() {
            fc.add(i, i, *q).unwrap();
        }
        fc
    }

    fn selected(selector: &FrameSelector, fc: &FrameContainer<usize>) -> Vec<usize> {
        selector.select(fc).iter().map(|e| e.index()).collect()
    }

    #[test]
    fn test_all_keeps_every_frame_in_order() {
        let fc = video(10);
        let entries = FrameSelector::All.select(&fc);
        assert_eq!(entries.len(), 10);
        assert_eq!(
            entries.iter().map(|e| e.index()).collect::<Vec<_>>(),
            (0..10).collect::<Vec<_>>()
        );
        assert_eq!(*entries[3].payload(), 300);
    }

    #[test]
    fn test_every_third_frame() {
        let selector = FrameSelector::every(3).unwrap();
        assert_eq!(selected(&selector, &video(10)), vec![0, 3, 6, 9]);
    }

    #[test]
    fn test_step_zero_is_rejected() {
        assert!(matches!(
            FrameSelector::every(0),
            Err(VideoError::InvalidSelector(_))
        ));
    }

    #[test]
    fn test_step_with_cap() {
        let selector = FrameSelector::Step {
            step: 2,
            max_frames: Some(3),
        };
        assert_eq!(selected(&selector, &video(20)), vec![0, 2, 4]);
    }

    #[rstest]
    #[case::all(FrameSelector::All)]
    #[case::first(FrameSelector::First { max_frames: 3 })]
    #[case::spread(FrameSelector::Spread { max_frames: 3 })]
    #[case::step(FrameSelector::Step { step: 2, max_frames: None })]
    #[case::top(FrameSelector::TopQuality { count: 2 })]
    fn test_empty_container_selects_nothing(#[case] selector: FrameSelector) {
        assert!(selector.select(&video(0)).is_empty());
    }

    #[test]
    fn test_first_takes_prefix() {
        let selector = FrameSelector::First { max_frames: 4 };
        assert_eq!(selected(&selector, &video(10)), vec![0, 1, 2, 3]);
        assert_eq!(selected(&selector, &video(2)), vec![0, 1]);
    }

    #[test]
    fn test_spread_covers_whole_video() {
        let selector = FrameSelector::Spread { max_frames: 4 };
        // centres of four 5-frame buckets
        assert_eq!(selected(&selector, &video(20)), vec![2, 7, 12, 17]);
    }

    #[test]
    fn test_spread_short_video_keeps_all() {
        let selector = FrameSelector::Spread { max_frames: 20 };
        assert_eq!(selected(&selector, &video(5)), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_top_quality_orders_best_first() {
        let fc = with_qualities(&[Some(0.2), Some(0.9), None, Some(0.5), Some(0.9)]);
        let selector = FrameSelector::TopQuality { count: 3 };
        assert_eq!(selected(&selector, &fc), vec![1, 4, 3]);
    }

    #[test]
    fn test_top_quality_ranks_missing_quality_last() {
        let fc = with_qualities(&[None, Some(0.1), None]);
        let selector = FrameSelector::TopQuality { count: 10 };
        assert_eq!(selected(&selector, &fc), vec![1, 0, 2]);
    }

    #[test]
    fn test_selection_follows_insertion_order_not_index() {
        let mut fc = FrameContainer::new();
        for i in [9, 4, 7, 1] {
            fc.add(i, i, None).unwrap();
        }
        let selector = FrameSelector::every(2).unwrap();
        assert_eq!(selected(&selector, &fc), vec![9, 7]);
    }

    #[test]
    fn test_selection_is_repeatable() {
        let fc = video(13);
        let selector = FrameSelector::Spread { max_frames: 5 };
        assert_eq!(selected(&selector, &fc), selected(&selector, &fc));
    }

    #[test]
    fn test_default_is_spread_twenty() {
        assert_eq!(
            FrameSelector::default(),
            FrameSelector::Spread { max_frames: 20 }
        );
    }

    #[test]
    fn test_selector_from_json() {
        let selector: FrameSelector =
            serde_json::from_str(r#"{"style": "step", "step": 3}"#).unwrap();
        assert_eq!(
            selector,
            FrameSelector::Step {
                step: 3,
                max_frames: None
            }
        );
        let selector: FrameSelector = serde_json::from_str(r#"{"style": "all"}"#).unwrap();
        assert_eq!(selector, FrameSelector::All);
    }

    #[test]
    fn test_enrollment_selection_resolution() {
        let configured = FrameSelector::every(5).unwrap();
        assert_eq!(
            EnrollmentSelection::for_projected_enrollment(true).resolve(&configured),
            FrameSelector::All
        );
        assert_eq!(
            EnrollmentSelection::for_projected_enrollment(false).resolve(&configured),
            configured
        );
    }
}
