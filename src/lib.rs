//! # muzekkere
//!
//! Fills a court letter (müzekkere) template with case values.
//!
//! The template is a legacy Word document. It is converted to a DOCX package
//! by an external tool, its `word/document.xml` is edited in place, and the
//! package is converted back. Every other package entry is copied through
//! unchanged.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use muzekkere::{produce, CaseValues, Profile, Textutil};
//!
//! let profile = Profile::load("muzekkere.toml")?;
//! let values = CaseValues { /* ... */ };
//! values.validate()?;
//! produce(
//!     "sablon.DOC".as_ref(),
//!     "sablon_filled.DOC".as_ref(),
//!     &profile,
//!     &values,
//!     &Textutil::new(&profile.converter),
//! )?;
//! ```
//!
//! Every field must be found exactly once. A template that drifted from its
//! profile fails with a template integrity error and nothing is written.

pub mod assemble;
pub mod config;
pub mod convert;
pub mod error;
pub mod markup;
pub mod opc;
pub mod values;

pub use assemble::{assemble_package, default_output_path, fill_markup, produce};
pub use config::{FieldRule, Profile, Relocation};
pub use convert::{TargetFormat, Textutil, Transcoder};
pub use error::{Error, Result};
pub use markup::MarkupDocument;
pub use opc::{Package, Part};
pub use values::CaseValues;
