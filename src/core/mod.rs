//! Core invoice types, normalization, VAT aggregation and readiness review.
//!
//! Everything here is pure: inputs are borrowed, outputs are fresh values.

mod aggregate;
mod builder;
pub mod countries;
pub mod currencies;
mod error;
mod normalize;
mod review;
mod types;

pub use aggregate::*;
pub use builder::*;
pub use countries::is_known_country_code;
pub use currencies::is_known_currency_code;
pub use error::*;
pub use normalize::*;
pub use review::*;
pub use types::*;
