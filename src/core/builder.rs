use rust_decimal::Decimal;

use super::types::*;

/// Builder for the invoice header.
///
/// ```
/// use teif::core::*;
///
/// let draft = InvoiceDraftBuilder::new("inv-7f3a")
///     .number("FAC-2024-001")
///     .issue_date("2024-06-15")
///     .note("Merci pour votre confiance")
///     .build();
/// assert_eq!(draft.kind, DocumentKind::Invoice);
/// ```
pub struct InvoiceDraftBuilder {
    invoice_id: String,
    kind: DocumentKind,
    number: Option<String>,
    issue_date: Option<String>,
    due_date: Option<String>,
    currency: Option<String>,
    note: Option<String>,
}

impl InvoiceDraftBuilder {
    pub fn new(invoice_id: impl Into<String>) -> Self {
        Self {
            invoice_id: invoice_id.into(),
            kind: DocumentKind::Invoice,
            number: None,
            issue_date: None,
            due_date: None,
            currency: None,
            note: None,
        }
    }

    pub fn kind(mut self, kind: DocumentKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn number(mut self, number: impl Into<String>) -> Self {
        self.number = Some(number.into());
        self
    }

    pub fn issue_date(mut self, date: impl Into<String>) -> Self {
        self.issue_date = Some(date.into());
        self
    }

    pub fn due_date(mut self, date: impl Into<String>) -> Self {
        self.due_date = Some(date.into());
        self
    }

    pub fn currency(mut self, code: impl Into<String>) -> Self {
        self.currency = Some(code.into());
        self
    }

    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn build(self) -> InvoiceDraft {
        InvoiceDraft {
            invoice_id: self.invoice_id,
            kind: self.kind,
            number: self.number,
            issue_date: self.issue_date,
            due_date: self.due_date,
            currency: self.currency,
            note: self.note,
        }
    }
}

/// Builder for Party (supplier/customer).
pub struct PartyBuilder {
    role: PartyRole,
    tax_id: Option<String>,
    name: Option<String>,
    address: Option<String>,
    street: Option<String>,
    city: Option<String>,
    postal_code: Option<String>,
    country: Option<String>,
}

impl PartyBuilder {
    pub fn new(role: PartyRole) -> Self {
        Self {
            role,
            tax_id: None,
            name: None,
            address: None,
            street: None,
            city: None,
            postal_code: None,
            country: None,
        }
    }

    pub fn supplier() -> Self {
        Self::new(PartyRole::Supplier)
    }

    pub fn customer() -> Self {
        Self::new(PartyRole::Customer)
    }

    pub fn tax_id(mut self, id: impl Into<String>) -> Self {
        self.tax_id = Some(id.into());
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    pub fn street(mut self, street: impl Into<String>) -> Self {
        self.street = Some(street.into());
        self
    }

    pub fn city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    pub fn postal_code(mut self, code: impl Into<String>) -> Self {
        self.postal_code = Some(code.into());
        self
    }

    pub fn country(mut self, code: impl Into<String>) -> Self {
        self.country = Some(code.into());
        self
    }

    pub fn build(self) -> Party {
        Party {
            role: self.role,
            tax_id: self.tax_id,
            name: self.name,
            address: self.address,
            street: self.street,
            city: self.city,
            postal_code: self.postal_code,
            country: self.country,
        }
    }
}

/// Builder for LineItem.
pub struct LineItemBuilder {
    description: String,
    quantity: Decimal,
    unit_price: Decimal,
    tax_rate: Decimal,
    discount_pct: Option<Decimal>,
    discount_amount: Option<Decimal>,
}

impl LineItemBuilder {
    pub fn new(description: impl Into<String>, quantity: Decimal, unit_price: Decimal) -> Self {
        Self {
            description: description.into(),
            quantity,
            unit_price,
            tax_rate: Decimal::new(19, 0),
            discount_pct: None,
            discount_amount: None,
        }
    }

    pub fn tax_rate(mut self, rate: Decimal) -> Self {
        self.tax_rate = rate;
        self
    }

    pub fn discount_pct(mut self, pct: Decimal) -> Self {
        self.discount_pct = Some(pct);
        self
    }

    pub fn discount_amount(mut self, amount: Decimal) -> Self {
        self.discount_amount = Some(amount);
        self
    }

    pub fn build(self) -> LineItem {
        LineItem {
            description: self.description,
            quantity: self.quantity,
            unit_price: self.unit_price,
            tax_rate: self.tax_rate,
            discount_pct: self.discount_pct,
            discount_amount: self.discount_amount,
        }
    }
}

/// Builder for stored Totals.
#[derive(Default)]
pub struct TotalsBuilder {
    totals: Totals,
}

impl TotalsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stated net, tax and gross totals.
    pub fn amounts(mut self, net: Decimal, tax: Decimal, gross: Decimal) -> Self {
        self.totals.net = net;
        self.totals.tax = tax;
        self.totals.gross = gross;
        self
    }

    pub fn stamp(mut self, amount: Decimal) -> Self {
        self.totals.stamp_enabled = true;
        self.totals.stamp_amount = amount;
        self
    }

    pub fn amount_description(mut self, text: impl Into<String>) -> Self {
        self.totals.amount_description = Some(text.into());
        self
    }

    pub fn build(self) -> Totals {
        self.totals
    }
}
