use serde::{Deserialize, Serialize};

use crate::shared::constants::RECORD_FORMAT_VERSION;
use crate::shared::error::VideoError;
use crate::shared::frame_container::FrameContainer;

/// Index and quality of one persisted frame.
///
/// `length` is the payload size in bytes; only the record format uses it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FrameRecord {
    pub index: usize,
    pub quality: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<u64>,
}

/// Structural part of a persisted container, stored ahead of the payloads.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContainerHeader {
    pub version: u32,
    pub frames: Vec<FrameRecord>,
}

impl ContainerHeader {
    pub fn new(frames: Vec<FrameRecord>) -> Self {
        Self {
            version: RECORD_FORMAT_VERSION,
            frames,
        }
    }

    pub fn check_version(&self) -> Result<(), VideoError> {
        if self.version != RECORD_FORMAT_VERSION {
            return Err(VideoError::CorruptContainer(format!(
                "unsupported container version {}",
                self.version
            )));
        }
        Ok(())
    }

    /// Frames of the header without payloads.
    pub fn into_skeleton(self) -> Result<FrameContainer<()>, VideoError> {
        let mut skeleton = FrameContainer::new();
        for frame in self.frames {
            skeleton
                .add(frame.index, (), frame.quality)
                .map_err(|_| duplicate_in_header(frame.index))?;
        }
        Ok(skeleton)
    }
}

pub(crate) fn duplicate_in_header(index: usize) -> VideoError {
    VideoError::CorruptContainer(format!("frame index {index} appears twice in the header"))
}
