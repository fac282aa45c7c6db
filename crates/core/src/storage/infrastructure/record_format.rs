//! Single-file record encoding of a frame container.
//!
//! Layout: 16-byte magic line, little-endian `u32` header length, JSON
//! header, then every payload back to back in header order.

use std::io::{ErrorKind, Read, Write};

use crate::shared::constants::RECORD_MAGIC;
use crate::shared::error::{ComponentError, VideoError};
use crate::shared::frame_container::FrameContainer;
use crate::storage::domain::container_header::{duplicate_in_header, ContainerHeader, FrameRecord};

pub fn write_record<T, W, F>(
    container: &FrameContainer<T>,
    sink: &mut W,
    mut write_item: F,
) -> Result<(), VideoError>
where
    W: Write,
    F: FnMut(&T, &mut dyn Write) -> Result<(), ComponentError>,
{
    let mut frames = Vec::with_capacity(container.len());
    let mut payloads = Vec::with_capacity(container.len());
    for entry in container {
        let mut buffer = Vec::new();
        write_item(entry.payload(), &mut buffer).map_err(VideoError::Component)?;
        frames.push(FrameRecord {
            index: entry.index(),
            quality: entry.quality(),
            length: Some(buffer.len() as u64),
        });
        payloads.push(buffer);
    }

    let header = serde_json::to_vec(&ContainerHeader::new(frames))?;
    let header_len = u32::try_from(header.len())
        .map_err(|_| VideoError::Precondition("container header exceeds 4 GiB".to_string()))?;

    sink.write_all(RECORD_MAGIC)?;
    sink.write_all(&header_len.to_le_bytes())?;
    sink.write_all(&header)?;
    for payload in &payloads {
        sink.write_all(payload)?;
    }
    sink.flush()?;
    Ok(())
}

pub fn read_record<T, R, F>(source: &mut R, mut read_item: F) -> Result<FrameContainer<T>, VideoError>
where
    R: Read,
    F: FnMut(&mut dyn Read) -> Result<T, ComponentError>,
{
    let header = read_record_header(source)?;
    let mut container = FrameContainer::new();
    for frame in header.frames {
        let length = frame.length.ok_or_else(|| {
            VideoError::CorruptContainer(format!("frame {} has no payload length", frame.index))
        })?;
        let payload = read_exact_payload(source, length, frame.index)?;
        let item = read_item(&mut payload.as_slice()).map_err(VideoError::Component)?;
        container
            .add(frame.index, item, frame.quality)
            .map_err(|_| duplicate_in_header(frame.index))?;
    }
    Ok(container)
}

pub fn read_record_header<R: Read>(source: &mut R) -> Result<ContainerHeader, VideoError> {
    let mut magic = [0u8; RECORD_MAGIC.len()];
    match source.read_exact(&mut magic) {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::UnexpectedEof => {
            return Err(VideoError::NotAContainer(
                "file is shorter than the record magic".to_string(),
            ));
        }
        Err(e) => return Err(e.into()),
    }
    if &magic != RECORD_MAGIC {
        return Err(VideoError::NotAContainer("record magic not found".to_string()));
    }

    let mut len_bytes = [0u8; 4];
    source.read_exact(&mut len_bytes).map_err(truncated("header length"))?;
    let header_len = u32::from_le_bytes(len_bytes) as u64;

    let mut raw = Vec::new();
    source.by_ref().take(header_len).read_to_end(&mut raw)?;
    if raw.len() as u64 != header_len {
        return Err(VideoError::CorruptContainer("header is truncated".to_string()));
    }

    let header: ContainerHeader = serde_json::from_slice(&raw)
        .map_err(|e| VideoError::CorruptContainer(format!("invalid header: {e}")))?;
    header.check_version()?;
    Ok(header)
}

fn read_exact_payload<R: Read>(source: &mut R, length: u64, index: usize) -> Result<Vec<u8>, VideoError> {
    let mut payload = Vec::new();
    source.by_ref().take(length).read_to_end(&mut payload)?;
    if payload.len() as u64 != length {
        return Err(VideoError::CorruptContainer(format!(
            "payload of frame {index} is truncated ({} of {length} bytes)",
            payload.len()
        )));
    }
    Ok(payload)
}

fn truncated(what: &'static str) -> impl Fn(std::io::Error) -> VideoError {
    move |e| {
        if e.kind() == ErrorKind::UnexpectedEof {
            VideoError::CorruptContainer(format!("{what} is truncated"))
        } else {
            VideoError::Io(e)
        }
    }
}
