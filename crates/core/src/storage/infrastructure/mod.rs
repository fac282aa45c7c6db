pub mod array_codec;
pub mod compressed_format;
pub mod record_format;
