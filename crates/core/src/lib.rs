//! Video adapters for single-image biometric components.
//!
//! Frames of a video live in a [`shared::frame_container::FrameContainer`].
//! A [`selection::domain::frame_selector::FrameSelector`] picks the frames
//! to process, the annotators in [`annotation`] produce per-frame face
//! annotations, and the adapters in [`video`] run single-image
//! preprocessors, extractors and algorithms over whole videos.

pub mod config;

pub mod shared {
    pub mod annotation;
    pub mod bounding_box;
    pub mod constants;
    pub mod error;
    pub mod frame_container;
}

pub mod selection {
    pub mod domain {
        pub mod frame_selector;
    }
}

pub mod storage {
    pub mod domain {
        pub mod container_encoding;
        pub mod container_header;
    }
    pub mod infrastructure;
}

pub mod annotation {
    pub mod domain {
        pub mod annotation_smoother;
        pub mod annotation_validator;
        pub mod annotator;
    }
    pub mod infrastructure;
}

pub mod component {
    pub mod domain {
        pub mod algorithm;
        pub mod capabilities;
        pub mod extractor;
        pub mod preprocessor;
        pub mod training_set;
    }
    pub mod infrastructure;
}

pub mod video {
    pub mod video_algorithm;
    pub mod video_extractor;
    pub mod video_preprocessor;
}
