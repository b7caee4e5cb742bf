//! TEIF 1.8.8 code lists.
//!
//! Each family is a closed enum carrying its wire-level code, so a
//! non-compliant code cannot be emitted by accident.

use crate::core::{DocumentKind, PartyRole};

/// Document type codes (`DocumentType/@code`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentTypeCode {
    /// I-11: Facture.
    Invoice,
    /// I-12: Facture d'avoir.
    CreditNote,
}

impl DocumentTypeCode {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Invoice => "I-11",
            Self::CreditNote => "I-12",
        }
    }

    /// Human-readable label rendered as element text.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Invoice => "Facture",
            Self::CreditNote => "Facture d’avoir",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "I-11" => Some(Self::Invoice),
            "I-12" => Some(Self::CreditNote),
            _ => None,
        }
    }

    /// Quotes are never submitted and have no code.
    pub fn for_kind(kind: DocumentKind) -> Option<Self> {
        match kind {
            DocumentKind::Invoice => Some(Self::Invoice),
            DocumentKind::CreditNote => Some(Self::CreditNote),
            DocumentKind::Quote => None,
        }
    }
}

/// Date function codes (`DateText/@functionCode`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateFunction {
    /// I-31: Date of issue.
    Issue,
    /// I-32: Payment due date.
    Due,
}

impl DateFunction {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Issue => "I-31",
            Self::Due => "I-32",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "I-31" => Some(Self::Issue),
            "I-32" => Some(Self::Due),
            _ => None,
        }
    }
}

/// Monetary amount roles (`Moa/@amountTypeCode`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AmountType {
    /// I-183: Unit price excluding tax.
    UnitPrice,
    /// I-171: Line total excluding tax, after discount.
    LineNet,
    /// I-176: Invoice total excluding tax.
    InvoiceNet,
    /// I-182: Invoice taxable base.
    InvoiceTaxableBase,
    /// I-181: Invoice tax total.
    InvoiceTax,
    /// I-180: Invoice total including tax.
    InvoiceGross,
    /// I-177: Taxable base of one tax breakdown entry.
    TaxBase,
    /// I-178: Tax amount of one tax breakdown entry.
    TaxAmount,
}

impl AmountType {
    /// The four roles every invoice-level totals block must carry.
    pub const INVOICE_TOTALS: [Self; 4] = [
        Self::InvoiceNet,
        Self::InvoiceTaxableBase,
        Self::InvoiceTax,
        Self::InvoiceGross,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Self::UnitPrice => "I-183",
            Self::LineNet => "I-171",
            Self::InvoiceNet => "I-176",
            Self::InvoiceTaxableBase => "I-182",
            Self::InvoiceTax => "I-181",
            Self::InvoiceGross => "I-180",
            Self::TaxBase => "I-177",
            Self::TaxAmount => "I-178",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "I-183" => Some(Self::UnitPrice),
            "I-171" => Some(Self::LineNet),
            "I-176" => Some(Self::InvoiceNet),
            "I-182" => Some(Self::InvoiceTaxableBase),
            "I-181" => Some(Self::InvoiceTax),
            "I-180" => Some(Self::InvoiceGross),
            "I-177" => Some(Self::TaxBase),
            "I-178" => Some(Self::TaxAmount),
            _ => None,
        }
    }

    /// Short description used in validation messages.
    pub fn describe(&self) -> &'static str {
        match self {
            Self::UnitPrice => "unit price",
            Self::LineNet => "line net total",
            Self::InvoiceNet => "invoice net total",
            Self::InvoiceTaxableBase => "invoice taxable base",
            Self::InvoiceTax => "invoice tax total",
            Self::InvoiceGross => "invoice gross total",
            Self::TaxBase => "tax base",
            Self::TaxAmount => "tax amount",
        }
    }
}

/// Tax kinds (`TaxTypeName/@code`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaxType {
    /// I-1602: TVA.
    Vat,
    /// I-1601: Droit de timbre.
    StampDuty,
}

impl TaxType {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Vat => "I-1602",
            Self::StampDuty => "I-1601",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Vat => "TVA",
            Self::StampDuty => "droit de timbre",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "I-1602" => Some(Self::Vat),
            "I-1601" => Some(Self::StampDuty),
            _ => None,
        }
    }
}

/// Partner function codes (`PartnerDetails/@functionCode`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartnerFunction {
    /// I-62: Supplier (vendeur).
    Supplier,
    /// I-64: Customer (acheteur).
    Customer,
}

impl PartnerFunction {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Supplier => "I-62",
            Self::Customer => "I-64",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "I-62" => Some(Self::Supplier),
            "I-64" => Some(Self::Customer),
            _ => None,
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            Self::Supplier => "supplier",
            Self::Customer => "customer",
        }
    }
}

impl From<PartyRole> for PartnerFunction {
    fn from(role: PartyRole) -> Self {
        match role {
            PartyRole::Supplier => Self::Supplier,
            PartyRole::Customer => Self::Customer,
        }
    }
}

/// Partner identifier types (`@type` on identifiers).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdentifierType {
    /// I-01: Matricule fiscal.
    TaxId,
}

impl IdentifierType {
    pub fn code(&self) -> &'static str {
        match self {
            Self::TaxId => "I-01",
        }
    }
}

/// Free-text function codes (`FtxDetail/@functionCode`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextFunction {
    /// I-451: General note.
    Note,
}

impl TextFunction {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Note => "I-451",
        }
    }
}
