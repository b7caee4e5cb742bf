use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Kind of commercial document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    /// Facture.
    #[default]
    #[serde(alias = "facture")]
    Invoice,
    /// Facture d'avoir.
    #[serde(alias = "avoir")]
    CreditNote,
    /// Devis. Never submitted to the authority.
    #[serde(alias = "devis")]
    Quote,
}

impl DocumentKind {
    /// Parse a persistence-layer label (`facture`, `avoir`, `devis` or the
    /// English names). Case-insensitive.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "invoice" | "facture" => Some(Self::Invoice),
            "credit_note" | "avoir" => Some(Self::CreditNote),
            "quote" | "devis" => Some(Self::Quote),
            _ => None,
        }
    }
}

/// Why the document is being compiled. Decides the validation regime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Purpose {
    /// Lenient: missing values are defaulted, compilation never fails.
    #[default]
    Preview,
    /// Strict: business-mandatory fields must be present (non-quote kinds).
    #[serde(alias = "ttn")]
    Final,
}

/// Invoice header fields as supplied by the caller.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InvoiceDraft {
    /// Internal record id. Fallback document number in lenient mode.
    #[serde(default)]
    pub invoice_id: String,
    #[serde(default)]
    pub kind: DocumentKind,
    /// Document number (numéro de facture).
    pub number: Option<String>,
    /// Issue date as stored (`YYYY-MM-DD` or an RFC 3339 timestamp).
    pub issue_date: Option<String>,
    /// Due date as stored.
    pub due_date: Option<String>,
    /// ISO 4217 currency code. Defaults to TND.
    pub currency: Option<String>,
    /// Free-text note.
    pub note: Option<String>,
}

/// Role a party plays on the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartyRole {
    Supplier,
    Customer,
}

/// Supplier or customer as supplied by the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Party {
    pub role: PartyRole,
    /// Matricule fiscal.
    pub tax_id: Option<String>,
    pub name: Option<String>,
    /// Free-form address line.
    pub address: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    /// ISO 3166-1 alpha-2. Defaults to TN.
    pub country: Option<String>,
}

/// One invoice line.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LineItem {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub quantity: Decimal,
    #[serde(default)]
    pub unit_price: Decimal,
    /// VAT rate in percent.
    #[serde(default)]
    pub tax_rate: Decimal,
    /// Discount in percent of the line base.
    pub discount_pct: Option<Decimal>,
    /// Absolute discount. Takes precedence over `discount_pct` when positive.
    pub discount_amount: Option<Decimal>,
}

/// Invoice totals as stored by the persistence layer.
///
/// The compiled document renders totals recomputed from the lines; the stated
/// net, tax and gross figures are only cross-checked by
/// [`review_invoice`](crate::core::review_invoice).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Totals {
    /// Total HT.
    #[serde(default)]
    pub net: Decimal,
    /// Total TVA.
    #[serde(default)]
    pub tax: Decimal,
    /// Total TTC.
    #[serde(default)]
    pub gross: Decimal,
    #[serde(default)]
    pub stamp_enabled: bool,
    /// Droit de timbre.
    #[serde(default)]
    pub stamp_amount: Decimal,
    /// Gross total in words, rendered as an auxiliary amount description.
    pub amount_description: Option<String>,
}

impl Totals {
    /// Stamp duty to apply, if enabled.
    pub fn stamp(&self) -> Option<Decimal> {
        self.stamp_enabled.then_some(self.stamp_amount)
    }
}
