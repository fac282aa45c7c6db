//! Compressed archive encoding of a frame container.
//!
//! A deflate zip archive holding `header.json` and one
//! `frames/<position>.bin` entry per payload.

use std::io::{ErrorKind, Read, Seek, Write};

use zip::result::ZipError;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::shared::constants::{ARCHIVE_FRAME_DIR, ARCHIVE_HEADER_NAME};
use crate::shared::error::{ComponentError, VideoError};
use crate::shared::frame_container::FrameContainer;
use crate::storage::domain::container_header::{duplicate_in_header, ContainerHeader, FrameRecord};

pub fn write_compressed<T, W, F>(
    container: &FrameContainer<T>,
    sink: W,
    mut write_item: F,
) -> Result<W, VideoError>
where
    W: Write + Seek,
    F: FnMut(&T, &mut dyn Write) -> Result<(), ComponentError>,
{
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut archive = ZipWriter::new(sink);

    let frames = container
        .iter()
        .map(|entry| FrameRecord {
            index: entry.index(),
            quality: entry.quality(),
            length: None,
        })
        .collect();
    archive.start_file(ARCHIVE_HEADER_NAME, options)?;
    serde_json::to_writer(&mut archive, &ContainerHeader::new(frames))?;

    for (position, entry) in container.iter().enumerate() {
        archive.start_file(frame_entry_name(position), options)?;
        write_item(entry.payload(), &mut archive).map_err(VideoError::Component)?;
    }

    Ok(archive.finish()?)
}

pub fn read_compressed<T, R, F>(source: R, mut read_item: F) -> Result<FrameContainer<T>, VideoError>
where
    R: Read + Seek,
    F: FnMut(&mut dyn Read) -> Result<T, ComponentError>,
{
    let mut archive = open_archive(source)?;
    let header = read_archive_header(&mut archive)?;

    let mut container = FrameContainer::new();
    for (position, frame) in header.frames.into_iter().enumerate() {
        let name = frame_entry_name(position);
        let mut file = archive.by_name(&name).map_err(|e| missing_entry(e, &name))?;
        let item = read_item(&mut file).map_err(VideoError::Component)?;
        container
            .add(frame.index, item, frame.quality)
            .map_err(|_| duplicate_in_header(frame.index))?;
    }
    Ok(container)
}

pub fn read_compressed_header<R: Read + Seek>(source: R) -> Result<ContainerHeader, VideoError> {
    let mut archive = open_archive(source)?;
    read_archive_header(&mut archive)
}

fn open_archive<R: Read + Seek>(source: R) -> Result<ZipArchive<R>, VideoError> {
    ZipArchive::new(source).map_err(|e| match e {
        // Inputs shorter than the end-of-archive record fail while seeking.
        ZipError::Io(io) if !matches!(io.kind(), ErrorKind::InvalidInput | ErrorKind::UnexpectedEof) => {
            VideoError::Io(io)
        }
        other => VideoError::NotAContainer(other.to_string()),
    })
}

fn read_archive_header<R: Read + Seek>(archive: &mut ZipArchive<R>) -> Result<ContainerHeader, VideoError> {
    let file = archive
        .by_name(ARCHIVE_HEADER_NAME)
        .map_err(|e| missing_entry(e, ARCHIVE_HEADER_NAME))?;
    let header: ContainerHeader = serde_json::from_reader(file)
        .map_err(|e| VideoError::CorruptContainer(format!("invalid header: {e}")))?;
    header.check_version()?;
    Ok(header)
}

fn frame_entry_name(position: usize) -> String {
    format!("{ARCHIVE_FRAME_DIR}/{position}.bin")
}

fn missing_entry(err: ZipError, name: &str) -> VideoError {
    match err {
        ZipError::FileNotFound => {
            VideoError::CorruptContainer(format!("archive entry `{name}` is missing"))
        }
        other => other.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn write_bytes(item: &Vec<u8>, sink: &mut dyn Write) -> Result<(), ComponentError> {
        sink.write_all(item)?;
        Ok(())
    }

    fn read_bytes(source: &mut dyn Read) -> Result<Vec<u8>, ComponentError> {
        let mut bytes = Vec::new();
        source.read_to_end(&mut bytes)?;
        Ok(bytes)
    }

    fn sample() -> FrameContainer<Vec<u8>> {
        let mut fc = FrameContainer::new();
        fc.add(5, vec![0u8; 4096], Some(0.9)).unwrap();
        fc.add(2, vec![1, 2, 3], None).unwrap();
        fc
    }

    fn encode(fc: &FrameContainer<Vec<u8>>) -> Vec<u8> {
        write_compressed(fc, Cursor::new(Vec::new()), write_bytes)
            .unwrap()
            .into_inner()
    }

    #[test]
    fn test_round_trip_preserves_entries() {
        let original = sample();
        let restored = read_compressed(Cursor::new(encode(&original)), read_bytes).unwrap();
        assert_eq!(restored, original);
    }

    #[test]
    fn test_payloads_are_compressed() {
        let bytes = encode(&sample());
        assert!(bytes.len() < 4096);
    }

    #[test]
    fn test_header_only_read() {
        let header = read_compressed_header(Cursor::new(encode(&sample()))).unwrap();
        let indices: Vec<usize> = header.frames.iter().map(|f| f.index).collect();
        assert_eq!(indices, vec![5, 2]);
        assert!(header.frames.iter().all(|f| f.length.is_none()));
    }

    #[test]
    fn test_plain_bytes_are_not_a_container() {
        let err = read_compressed(Cursor::new(b"not a zip archive".to_vec()), read_bytes)
            .unwrap_err();
        assert!(matches!(err, VideoError::NotAContainer(_)));
    }

    #[test]
    fn test_tiny_input_is_not_a_container() {
        let err = read_compressed(Cursor::new(vec![1u8, 2, 3]), read_bytes).unwrap_err();
        assert!(matches!(err, VideoError::NotAContainer(_)));
    }

    #[test]
    fn test_archive_without_frame_entry_is_corruption() {
        let mut archive = ZipWriter::new(Cursor::new(Vec::new()));
        archive
            .start_file(ARCHIVE_HEADER_NAME, SimpleFileOptions::default())
            .unwrap();
        archive
            .write_all(br#"{"version":1,"frames":[{"index":0,"quality":null}]}"#)
            .unwrap();
        let bytes = archive.finish().unwrap().into_inner();

        let err = read_compressed(Cursor::new(bytes), read_bytes).unwrap_err();
        assert!(matches!(err, VideoError::CorruptContainer(_)));
    }

    #[test]
    fn test_archive_without_header_is_corruption() {
        let mut archive = ZipWriter::new(Cursor::new(Vec::new()));
        archive
            .start_file("frames/0.bin", SimpleFileOptions::default())
            .unwrap();
        archive.write_all(b"payload").unwrap();
        let bytes = archive.finish().unwrap().into_inner();

        let err = read_compressed(Cursor::new(bytes), read_bytes).unwrap_err();
        assert!(matches!(err, VideoError::CorruptContainer(_)));
    }
}
