use thiserror::Error;

/// Errors that can occur while compiling a tax document.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TeifError {
    /// A business-mandatory field is empty in strict mode.
    ///
    /// The message is meant for the end user who has to complete the field.
    #[error("{0}")]
    MissingField(RequiredField),

    /// XML generation error.
    #[error("XML error: {0}")]
    Xml(String),
}

impl TeifError {
    /// The missing field, if this is a missing-field failure.
    pub fn missing_field(&self) -> Option<&RequiredField> {
        match self {
            Self::MissingField(field) => Some(field),
            _ => None,
        }
    }
}

/// Business fields that strict (final) compilation requires, listed in
/// checking order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredField {
    SupplierTaxId,
    SupplierName,
    SupplierAddress,
    /// Missing or not a valid calendar date.
    IssueDate,
    CustomerName,
    CustomerTaxId,
    CustomerAddress,
    Lines,
    /// 1-based line number.
    LineDescription(usize),
    /// 1-based line number.
    LineQuantity(usize),
    DocumentNumber,
}

impl std::fmt::Display for RequiredField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SupplierTaxId => f.write_str("the company's legal identifier is missing"),
            Self::SupplierName => f.write_str("the company's name is missing"),
            Self::SupplierAddress => f.write_str("the company's address is missing"),
            Self::IssueDate => f.write_str("the invoice date is missing or invalid"),
            Self::CustomerName => f.write_str("the customer's name is missing"),
            Self::CustomerTaxId => f.write_str("the customer's legal identifier is missing"),
            Self::CustomerAddress => f.write_str("the customer's address is missing"),
            Self::Lines => f.write_str("at least one line item is required"),
            Self::LineDescription(n) => write!(f, "line {n}: the description is missing"),
            Self::LineQuantity(n) => {
                write!(f, "line {n}: the quantity must be greater than zero")
            }
            Self::DocumentNumber => f.write_str("the invoice number is missing"),
        }
    }
}

/// A single structural problem found in a serialized document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// Element the problem refers to (e.g. "PartnerDetails[I-64]").
    pub element: String,
    /// Human-readable description.
    pub message: String,
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.element, self.message)
    }
}

impl ValidationIssue {
    pub fn new(element: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            element: element.into(),
            message: message.into(),
        }
    }
}
