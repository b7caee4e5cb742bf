//! # teif
//!
//! Tax-document compilation engine for the Tunisian TEIF 1.8.8 e-invoicing
//! format: input normalization, per-rate VAT aggregation, XML compilation,
//! structural validation and size governance.
//!
//! All monetary values use [`rust_decimal::Decimal`], never floating point,
//! rounded to three decimals (millimes).
//!
//! ## Quick Start
//!
//! ```rust
//! use teif::core::*;
//! use teif::teif::{compile, enforce_default_size, validate_structure};
//! use rust_decimal_macros::dec;
//!
//! let draft = InvoiceDraftBuilder::new("inv-42")
//!     .number("F-2024-042")
//!     .issue_date("2024-06-15")
//!     .build();
//! let parties = [
//!     PartyBuilder::supplier().tax_id("1234567A/B/M/000").name("Société Alpha")
//!         .address("12 rue de Carthage").city("Tunis").postal_code("1000").build(),
//!     PartyBuilder::customer().tax_id("7654321Z/A/M/000").name("Beta SARL")
//!         .address("5 avenue Habib Bourguiba").city("Sfax").postal_code("3000").build(),
//! ];
//! let lines = [LineItemBuilder::new("Conseil", dec!(2), dec!(100))
//!     .tax_rate(dec!(19)).discount_pct(dec!(10)).build()];
//!
//! let xml = compile(&draft, &parties, &Totals::default(), &lines, Purpose::Final).unwrap();
//! assert!(validate_structure(&xml).is_empty());
//! assert!(xml.contains(r#"<Amount currencyIdentifier="TND">214.200</Amount>"#));
//!
//! let doc = enforce_default_size(&xml);
//! assert!(!doc.trimmed());
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `core` (default) | Snapshot types, normalization, VAT aggregation, readiness review |
//! | `teif` (default) | TEIF XML compilation, structural validation, size governance |
//! | `all` | Everything |

#[cfg(feature = "core")]
pub mod core;

#[cfg(feature = "teif")]
pub mod teif;

// Re-export core types at crate root for convenience
#[cfg(feature = "core")]
pub use crate::core::*;
