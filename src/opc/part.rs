//! Archive entry representation

use zip::CompressionMethod;

/// One entry of a zip package
#[derive(Clone, Debug, PartialEq)]
pub struct Part {
    /// Entry name inside the archive (`word/document.xml`)
    name: String,
    /// Compression method the entry was stored with
    compression: CompressionMethod,
    /// Uncompressed entry data
    data: Vec<u8>,
}

impl Part {
    /// Create a new part
    pub fn new(name: impl Into<String>, compression: CompressionMethod, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            compression,
            data,
        }
    }

    /// Get the entry name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the compression method
    pub fn compression(&self) -> CompressionMethod {
        self.compression
    }

    /// Get the raw data
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Take the data out of the part
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }
}
