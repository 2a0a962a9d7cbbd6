//! Package reader/writer
//!
//! Reads entries out of a DOCX zip and writes a copy with one entry replaced.

use crate::error::{Error, Result};
use crate::opc::Part;
use log::debug;
use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek, Write};
use std::path::Path;
use zip::read::ZipArchive;
use zip::write::{SimpleFileOptions, ZipWriter};

/// Entry name of the WordprocessingML main document
pub const MAIN_DOCUMENT: &str = "word/document.xml";

/// An open zip package
#[derive(Debug)]
pub struct Package<R> {
    archive: ZipArchive<R>,
}

impl Package<BufReader<File>> {
    /// Open a package from a file path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }
}

impl<'a> Package<Cursor<&'a [u8]>> {
    /// Open a package from bytes
    pub fn from_bytes(bytes: &'a [u8]) -> Result<Self> {
        Self::from_reader(Cursor::new(bytes))
    }
}

impl<R: Read + Seek> Package<R> {
    /// Open a package from a reader
    pub fn from_reader(reader: R) -> Result<Self> {
        let archive = ZipArchive::new(reader)?;
        Ok(Self { archive })
    }

    /// Read one entry
    pub fn part(&mut self, name: &str) -> Result<Part> {
        let mut file = self
            .archive
            .by_name(name)
            .map_err(|_| Error::MissingPart(name.to_string()))?;

        let mut data = Vec::new();
        file.read_to_end(&mut data)?;
        Ok(Part::new(name, file.compression(), data))
    }

    /// Read every entry, in archive order
    pub fn parts(&mut self) -> Result<Vec<Part>> {
        let mut parts = Vec::with_capacity(self.archive.len());
        for i in 0..self.archive.len() {
            let mut file = self.archive.by_index(i)?;
            let mut data = Vec::new();
            file.read_to_end(&mut data)?;
            parts.push(Part::new(file.name(), file.compression(), data));
        }
        Ok(parts)
    }

    /// Write a copy of the package with the entry `name` replaced by `data`.
    ///
    /// Entry order is kept. The replaced entry keeps its compression method;
    /// every other entry is copied raw, compressed bytes included.
    pub fn rewrite_to<W: Write + Seek>(&mut self, writer: W, name: &str, data: &[u8]) -> Result<W> {
        let index = self
            .archive
            .index_for_name(name)
            .ok_or_else(|| Error::MissingPart(name.to_string()))?;

        let mut zip = ZipWriter::new(writer);
        for i in 0..self.archive.len() {
            if i == index {
                let compression = self.archive.by_index_raw(i)?.compression();
                let options = SimpleFileOptions::default().compression_method(compression);
                zip.start_file(name, options)?;
                zip.write_all(data)?;
                debug!("rewrote {} ({} bytes)", name, data.len());
            } else {
                let file = self.archive.by_index_raw(i)?;
                zip.raw_copy_file(file)?;
            }
        }

        Ok(zip.finish()?)
    }
}
