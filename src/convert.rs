//! External document converter
//!
//! Legacy `.DOC` templates are turned into DOCX packages and back by an
//! OS tool. The engine treats it as a black box: any failure is fatal and
//! its diagnostics are passed on unmodified.

use crate::error::{Error, Result};
use log::debug;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Output format requested from a converter
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TargetFormat {
    /// Legacy Word binary document
    Doc,
    /// Zip-based WordprocessingML package
    Docx,
}

impl TargetFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            TargetFormat::Doc => "doc",
            TargetFormat::Docx => "docx",
        }
    }
}

impl fmt::Display for TargetFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Converts documents between formats
pub trait Transcoder {
    /// Convert `input` into `target`, writing `output`; returns the output path
    fn convert(&self, input: &Path, target: TargetFormat, output: &Path) -> Result<PathBuf>;
}

/// macOS `textutil`, or any program with the same command line
#[derive(Clone, Debug)]
pub struct Textutil {
    program: PathBuf,
}

impl Textutil {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Transcoder for Textutil {
    fn convert(&self, input: &Path, target: TargetFormat, output: &Path) -> Result<PathBuf> {
        let command = format!(
            "{} -convert {} -output {} {}",
            self.program.display(),
            target,
            output.display(),
            input.display()
        );
        debug!("running {}", command);

        let result = Command::new(&self.program)
            .arg("-convert")
            .arg(target.as_str())
            .arg("-output")
            .arg(output)
            .arg(input)
            .output()
            .map_err(|e| Error::ExternalTool {
                command: command.clone(),
                diagnostics: e.to_string(),
            })?;

        if !result.status.success() {
            return Err(Error::ExternalTool {
                command,
                diagnostics: String::from_utf8_lossy(&result.stderr).trim().to_string(),
            });
        }

        Ok(output.to_path_buf())
    }
}
