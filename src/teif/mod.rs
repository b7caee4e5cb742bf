//! TEIF 1.8.8 XML compilation, structural validation and size governance.
//!
//! TEIF is the XML invoice format accepted by the Tunisian e-invoicing
//! platform (TTN).
//!
//! # Pipeline
//!
//! - [`compile`] normalizes a snapshot, aggregates VAT and renders the XML
//! - [`validate_structure`] checks any TEIF text for the mandatory blocks
//! - [`enforce_size`] strips optional blocks until the text fits a byte budget
//!
//! # Example
//!
//! ```
//! use teif::core::*;
//! use teif::teif::{compile, enforce_default_size};
//! use rust_decimal_macros::dec;
//!
//! let draft = InvoiceDraftBuilder::new("inv-1").number("F-2024-001").build();
//! let lines = [LineItemBuilder::new("Conseil", dec!(2), dec!(50)).build()];
//! let xml = compile(&draft, &[], &Totals::default(), &lines, Purpose::Preview).unwrap();
//!
//! let doc = enforce_default_size(&xml);
//! assert!(!doc.trimmed());
//! ```

pub mod codes;
mod compile;
mod size;
mod validate;
pub(crate) mod xml_utils;

pub use codes::*;
pub use compile::{compile, compile_normalized, format_date};
pub use size::{CompiledDocument, DEFAULT_MAX_BYTES, enforce_default_size, enforce_size};
pub use validate::validate_structure;

/// Value of the root `controlingAgency` attribute.
pub const CONTROLLING_AGENCY: &str = "TTN";

/// Value of the root `version` attribute.
pub const TEIF_VERSION: &str = "1.8.8";

/// chrono pattern for `DateText format="ddMMyy"`.
pub const DATE_FORMAT: &str = "%d%m%y";
