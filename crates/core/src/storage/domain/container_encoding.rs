use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Cursor, Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::shared::error::{ComponentError, VideoError};
use crate::shared::frame_container::FrameContainer;
use crate::storage::infrastructure::compressed_format::{
    read_compressed, read_compressed_header, write_compressed,
};
use crate::storage::infrastructure::record_format::{read_record, read_record_header, write_record};

/// Physical layout of a persisted frame container.
///
/// Readers must be told the encoding used at write time; files are never
/// sniffed, and the two encodings cannot read each other.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerEncoding {
    #[default]
    Record,
    Compressed,
}

impl ContainerEncoding {
    /// Parses the lowercase name used in configuration files.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "record" => Some(ContainerEncoding::Record),
            "compressed" => Some(ContainerEncoding::Compressed),
            _ => None,
        }
    }
}

impl std::fmt::Display for ContainerEncoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContainerEncoding::Record => write!(f, "record"),
            ContainerEncoding::Compressed => write!(f, "compressed"),
        }
    }
}

impl<T> FrameContainer<T> {
    pub fn save<F>(&self, path: &Path, encoding: ContainerEncoding, write_item: F) -> Result<(), VideoError>
    where
        F: FnMut(&T, &mut dyn Write) -> Result<(), ComponentError>,
    {
        let file = File::create(path)?;
        match encoding {
            ContainerEncoding::Record => write_record(self, &mut BufWriter::new(file), write_item),
            ContainerEncoding::Compressed => {
                write_compressed(self, BufWriter::new(file), write_item)?
                    .flush()
                    .map_err(VideoError::Io)
            }
        }
    }

    pub fn load<F>(path: &Path, encoding: ContainerEncoding, read_item: F) -> Result<Self, VideoError>
    where
        F: FnMut(&mut dyn Read) -> Result<T, ComponentError>,
    {
        let mut reader = BufReader::new(File::open(path)?);
        match encoding {
            ContainerEncoding::Record => read_record(&mut reader, read_item),
            ContainerEncoding::Compressed => read_compressed(reader, read_item),
        }
    }

    /// Writes the container to a non-seekable stream.
    ///
    /// The compressed encoding is assembled in memory first.
    pub fn write_to<F>(
        &self,
        mut sink: &mut dyn Write,
        encoding: ContainerEncoding,
        write_item: F,
    ) -> Result<(), VideoError>
    where
        F: FnMut(&T, &mut dyn Write) -> Result<(), ComponentError>,
    {
        match encoding {
            ContainerEncoding::Record => write_record(self, &mut sink, write_item),
            ContainerEncoding::Compressed => {
                let archive = write_compressed(self, Cursor::new(Vec::new()), write_item)?;
                sink.write_all(&archive.into_inner())?;
                Ok(())
            }
        }
    }

    pub fn read_from<F>(
        mut source: &mut dyn Read,
        encoding: ContainerEncoding,
        read_item: F,
    ) -> Result<Self, VideoError>
    where
        F: FnMut(&mut dyn Read) -> Result<T, ComponentError>,
    {
        match encoding {
            ContainerEncoding::Record => read_record(&mut source, read_item),
            ContainerEncoding::Compressed => {
                let mut bytes = Vec::new();
                source.read_to_end(&mut bytes)?;
                read_compressed(Cursor::new(bytes), read_item)
            }
        }
    }

    /// Loads a container, accepting files that hold one bare payload.
    ///
    /// Only a file the chosen encoding does not recognize at all is retried
    /// as a single item (index 0, no quality); corruption and item errors
    /// propagate. If the retry fails, its error is returned.
    pub fn load_with_legacy_fallback<F>(
        path: &Path,
        encoding: ContainerEncoding,
        read_item: F,
    ) -> Result<Self, VideoError>
    where
        F: FnMut(&mut dyn Read) -> Result<T, ComponentError>,
    {
        let bytes = fs::read(path)?;
        log::trace!("loading {} ({} bytes) as {encoding}", path.display(), bytes.len());
        Self::from_bytes_with_legacy_fallback(&bytes, encoding, read_item)
    }

    /// Stream form of [`FrameContainer::load_with_legacy_fallback`].
    pub fn read_from_with_legacy_fallback<F>(
        source: &mut dyn Read,
        encoding: ContainerEncoding,
        read_item: F,
    ) -> Result<Self, VideoError>
    where
        F: FnMut(&mut dyn Read) -> Result<T, ComponentError>,
    {
        let mut bytes = Vec::new();
        source.read_to_end(&mut bytes)?;
        Self::from_bytes_with_legacy_fallback(&bytes, encoding, read_item)
    }

    fn from_bytes_with_legacy_fallback<F>(
        bytes: &[u8],
        encoding: ContainerEncoding,
        mut read_item: F,
    ) -> Result<Self, VideoError>
    where
        F: FnMut(&mut dyn Read) -> Result<T, ComponentError>,
    {
        let mut source = bytes;
        match Self::read_from(&mut source, encoding, &mut read_item) {
            Err(VideoError::NotAContainer(reason)) => {
                log::warn!("input is not a {encoding} container ({reason}); reading it as a single frame");
                let mut source = bytes;
                let item = read_item(&mut source).map_err(VideoError::Component)?;
                let mut container = Self::new();
                container.add(0, item, None)?;
                Ok(container)
            }
            other => other,
        }
    }
}

impl FrameContainer<()> {
    /// Reads indices and qualities without decoding any payload.
    pub fn read_header(path: &Path, encoding: ContainerEncoding) -> Result<Self, VideoError> {
        let mut reader = BufReader::new(File::open(path)?);
        let header = match encoding {
            ContainerEncoding::Record => read_record_header(&mut reader)?,
            ContainerEncoding::Compressed => read_compressed_header(reader)?,
        };
        header.into_skeleton()
    }
}
