/// Faces whose bounding box is smaller than this (in pixels) are not valid.
pub const DEFAULT_MIN_FACE_SIZE: f64 = 32.0;

/// Frames the fail-safe annotator may reuse an old detection for.
pub const DEFAULT_FAIL_SAFE_MAX_AGE: usize = 20;

/// Frames kept by the default preprocessing selector.
pub const DEFAULT_MAX_FRAMES: usize = 20;

pub const RECORD_MAGIC: &[u8; 16] = b"VIDBIO-FRAMES-1\n";
pub const RECORD_FORMAT_VERSION: u32 = 1;

pub const ARCHIVE_HEADER_NAME: &str = "header.json";
pub const ARCHIVE_FRAME_DIR: &str = "frames";
