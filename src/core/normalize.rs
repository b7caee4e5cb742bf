//! Input normalization: raw snapshot → fully-typed internal model.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;

use super::error::{RequiredField, TeifError};
use super::types::*;

/// Identifier used for parties without a matricule fiscal (lenient mode).
pub const PLACEHOLDER_ID: &str = "NA";
/// Customer name used when none is stored (lenient mode).
pub const PLACEHOLDER_CUSTOMER_NAME: &str = "Client";
/// Supplier name used when none is stored (lenient mode).
pub const PLACEHOLDER_SUPPLIER_NAME: &str = "Société";
pub const DEFAULT_CURRENCY: &str = "TND";
pub const DEFAULT_COUNTRY: &str = "TN";

/// Party with every field resolved to a concrete value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedParty {
    pub role: PartyRole,
    pub tax_id: String,
    pub name: String,
    pub address: String,
    pub street: String,
    pub city: String,
    pub postal_code: String,
    /// Upper-cased ISO 3166-1 alpha-2.
    pub country: String,
}

/// Invoice ready for aggregation and compilation.
#[derive(Debug, Clone)]
pub struct NormalizedInvoice {
    pub kind: DocumentKind,
    pub purpose: Purpose,
    /// Whether strict (final) rules were enforced.
    pub strict: bool,
    pub number: String,
    /// `None` only in lenient mode, when the stored date is missing or unparseable.
    pub issue_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    /// Upper-cased ISO 4217.
    pub currency: String,
    /// Trimmed, never empty.
    pub note: Option<String>,
    pub supplier: NormalizedParty,
    pub customer: NormalizedParty,
    /// Lines with trimmed descriptions, in input order.
    pub lines: Vec<LineItem>,
    pub stamp: Option<Decimal>,
    pub amount_description: Option<String>,
}

/// Strict rules apply to final documents, except quotes which are never
/// submitted.
pub fn is_strict(kind: DocumentKind, purpose: Purpose) -> bool {
    purpose == Purpose::Final && kind != DocumentKind::Quote
}

/// Coerce a loosely populated snapshot into a [`NormalizedInvoice`].
///
/// In strict mode the first missing mandatory field aborts with
/// [`TeifError::MissingField`]; in lenient mode missing values are defaulted
/// and this never fails.
pub fn normalize(
    draft: &InvoiceDraft,
    parties: &[Party],
    totals: &Totals,
    lines: &[LineItem],
    purpose: Purpose,
) -> Result<NormalizedInvoice, TeifError> {
    let strict = is_strict(draft.kind, purpose);
    let supplier = find_party(parties, PartyRole::Supplier);
    let customer = find_party(parties, PartyRole::Customer);
    let issue_date = draft.issue_date.as_deref().and_then(parse_date);

    if strict {
        if let Err(err) = check_required(draft, supplier, customer, issue_date, lines) {
            tracing::debug!(invoice_id = %draft.invoice_id, error = %err, "strict normalization rejected snapshot");
            return Err(err);
        }
    }

    let number = non_empty(draft.number.as_deref())
        .unwrap_or_else(|| draft.invoice_id.trim().to_string());
    let currency = non_empty(draft.currency.as_deref())
        .map(|c| c.to_ascii_uppercase())
        .unwrap_or_else(|| DEFAULT_CURRENCY.to_string());

    let lines: Vec<LineItem> = lines
        .iter()
        .map(|line| LineItem {
            description: line.description.trim().to_string(),
            ..line.clone()
        })
        .collect();

    let invoice = NormalizedInvoice {
        kind: draft.kind,
        purpose,
        strict,
        number,
        issue_date,
        due_date: draft.due_date.as_deref().and_then(parse_date),
        currency,
        note: non_empty(draft.note.as_deref()),
        supplier: resolve_party(supplier, PartyRole::Supplier, PLACEHOLDER_SUPPLIER_NAME),
        customer: resolve_party(customer, PartyRole::Customer, PLACEHOLDER_CUSTOMER_NAME),
        lines,
        stamp: totals.stamp(),
        amount_description: non_empty(totals.amount_description.as_deref()),
    };

    tracing::debug!(
        number = %invoice.number,
        kind = ?invoice.kind,
        strict,
        lines = invoice.lines.len(),
        "normalized invoice snapshot"
    );

    Ok(invoice)
}

/// Fixed checking order: supplier, issue date, customer, lines, number.
fn check_required(
    draft: &InvoiceDraft,
    supplier: Option<&Party>,
    customer: Option<&Party>,
    issue_date: Option<NaiveDate>,
    lines: &[LineItem],
) -> Result<(), TeifError> {
    let missing = |field| Err(TeifError::MissingField(field));

    if !has_text(supplier.and_then(|p| p.tax_id.as_deref())) {
        return missing(RequiredField::SupplierTaxId);
    }
    if !has_text(supplier.and_then(|p| p.name.as_deref())) {
        return missing(RequiredField::SupplierName);
    }
    if !has_text(supplier.and_then(|p| p.address.as_deref())) {
        return missing(RequiredField::SupplierAddress);
    }
    if issue_date.is_none() {
        return missing(RequiredField::IssueDate);
    }
    if !has_text(customer.and_then(|p| p.name.as_deref())) {
        return missing(RequiredField::CustomerName);
    }
    if !has_text(customer.and_then(|p| p.tax_id.as_deref())) {
        return missing(RequiredField::CustomerTaxId);
    }
    if !has_text(customer.and_then(|p| p.address.as_deref())) {
        return missing(RequiredField::CustomerAddress);
    }
    if lines.is_empty() {
        return missing(RequiredField::Lines);
    }
    for (i, line) in lines.iter().enumerate() {
        if line.description.trim().is_empty() {
            return missing(RequiredField::LineDescription(i + 1));
        }
        if line.quantity <= Decimal::ZERO {
            return missing(RequiredField::LineQuantity(i + 1));
        }
    }
    if !has_text(draft.number.as_deref()) {
        return missing(RequiredField::DocumentNumber);
    }
    Ok(())
}

fn find_party(parties: &[Party], role: PartyRole) -> Option<&Party> {
    parties.iter().find(|p| p.role == role)
}

fn resolve_party(party: Option<&Party>, role: PartyRole, placeholder_name: &str) -> NormalizedParty {
    NormalizedParty {
        role,
        tax_id: party_field(party, |p| p.tax_id.as_deref())
            .unwrap_or_else(|| PLACEHOLDER_ID.to_string()),
        name: party_field(party, |p| p.name.as_deref())
            .unwrap_or_else(|| placeholder_name.to_string()),
        address: party_field(party, |p| p.address.as_deref()).unwrap_or_default(),
        street: party_field(party, |p| p.street.as_deref()).unwrap_or_default(),
        city: party_field(party, |p| p.city.as_deref()).unwrap_or_default(),
        postal_code: party_field(party, |p| p.postal_code.as_deref()).unwrap_or_default(),
        country: party_field(party, |p| p.country.as_deref())
            .map(|c| c.to_ascii_uppercase())
            .unwrap_or_else(|| DEFAULT_COUNTRY.to_string()),
    }
}

fn party_field(party: Option<&Party>, get: impl Fn(&Party) -> Option<&str>) -> Option<String> {
    non_empty(party.and_then(get))
}

/// Parse a stored date: `YYYY-MM-DD`, RFC 3339, or a naive timestamp.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive()))
        .or_else(|| {
            NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
                .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f"))
                .ok()
                .map(|dt| dt.date())
        })
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn has_text(value: Option<&str>) -> bool {
    value.is_some_and(|s| !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::builder::*;
    use rust_decimal_macros::dec;

    fn supplier() -> Party {
        PartyBuilder::supplier()
            .tax_id("1234567A/M/000")
            .name("Atlas SARL")
            .address("12 rue de Marseille, Tunis")
            .build()
    }

    fn customer() -> Party {
        PartyBuilder::customer()
            .tax_id("7654321B/A/M/000")
            .name("Carthage Trading")
            .address("Avenue Habib Bourguiba, Sousse")
            .build()
    }

    fn line() -> LineItem {
        LineItemBuilder::new("Maintenance", dec!(1), dec!(100)).build()
    }

    fn draft() -> InvoiceDraft {
        InvoiceDraftBuilder::new("inv-1")
            .number("FAC-001")
            .issue_date("2024-06-15")
            .build()
    }

    #[test]
    fn parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 6, 15);
        assert_eq!(parse_date("2024-06-15"), expected);
        assert_eq!(parse_date(" 2024-06-15T09:30:00Z "), expected);
        assert_eq!(parse_date("2024-06-15T09:30:00.123+01:00"), expected);
        assert_eq!(parse_date("2024-06-15 09:30:00"), expected);
        assert_eq!(parse_date("2024-02-30"), None);
        assert_eq!(parse_date("15/06/2024"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn lenient_defaults() {
        let draft = InvoiceDraftBuilder::new("inv-42").build();
        let inv = normalize(&draft, &[], &Totals::default(), &[], Purpose::Preview).unwrap();
        assert!(!inv.strict);
        assert_eq!(inv.number, "inv-42");
        assert_eq!(inv.currency, "TND");
        assert_eq!(inv.supplier.tax_id, "NA");
        assert_eq!(inv.supplier.name, "Société");
        assert_eq!(inv.customer.tax_id, "NA");
        assert_eq!(inv.customer.name, "Client");
        assert_eq!(inv.customer.country, "TN");
        assert_eq!(inv.issue_date, None);
        assert_eq!(inv.note, None);
    }

    #[test]
    fn trims_and_uppercases() {
        let draft = InvoiceDraftBuilder::new("inv-1")
            .number("  FAC-9 ")
            .currency("eur")
            .note("   ")
            .build();
        let cust = PartyBuilder::customer().name("  Zitouna  ").country("fr").build();
        let lines = [LineItemBuilder::new("  Audit ", dec!(1), dec!(5)).build()];
        let inv = normalize(&draft, &[cust], &Totals::default(), &lines, Purpose::Preview).unwrap();
        assert_eq!(inv.number, "FAC-9");
        assert_eq!(inv.currency, "EUR");
        assert_eq!(inv.note, None);
        assert_eq!(inv.customer.name, "Zitouna");
        assert_eq!(inv.customer.country, "FR");
        assert_eq!(inv.lines[0].description, "Audit");
    }

    #[test]
    fn strict_passes_when_complete() {
        let inv = normalize(
            &draft(),
            &[supplier(), customer()],
            &Totals::default(),
            &[line()],
            Purpose::Final,
        )
        .unwrap();
        assert!(inv.strict);
        assert_eq!(inv.supplier.name, "Atlas SARL");
    }

    #[test]
    fn strict_checks_supplier_before_customer() {
        let err = normalize(&draft(), &[], &Totals::default(), &[], Purpose::Final).unwrap_err();
        assert_eq!(err.missing_field(), Some(&RequiredField::SupplierTaxId));
    }

    #[test]
    fn strict_rejects_invalid_issue_date() {
        let draft = InvoiceDraftBuilder::new("inv-1")
            .number("FAC-001")
            .issue_date("not a date")
            .build();
        let err = normalize(
            &draft,
            &[supplier(), customer()],
            &Totals::default(),
            &[line()],
            Purpose::Final,
        )
        .unwrap_err();
        assert_eq!(err.missing_field(), Some(&RequiredField::IssueDate));
    }

    #[test]
    fn strict_line_checks() {
        let parties = [supplier(), customer()];
        let bad_qty = [line(), LineItemBuilder::new("Pièces", dec!(0), dec!(3)).build()];
        let err = normalize(&draft(), &parties, &Totals::default(), &bad_qty, Purpose::Final)
            .unwrap_err();
        assert_eq!(err.missing_field(), Some(&RequiredField::LineQuantity(2)));

        let no_desc = [LineItemBuilder::new(" ", dec!(1), dec!(3)).build()];
        let err = normalize(&draft(), &parties, &Totals::default(), &no_desc, Purpose::Final)
            .unwrap_err();
        assert_eq!(err.missing_field(), Some(&RequiredField::LineDescription(1)));

        let err = normalize(&draft(), &parties, &Totals::default(), &[], Purpose::Final)
            .unwrap_err();
        assert_eq!(err.missing_field(), Some(&RequiredField::Lines));
    }

    #[test]
    fn strict_requires_number_last() {
        let draft = InvoiceDraftBuilder::new("inv-1").issue_date("2024-06-15").build();
        let err = normalize(
            &draft,
            &[supplier(), customer()],
            &Totals::default(),
            &[line()],
            Purpose::Final,
        )
        .unwrap_err();
        assert_eq!(err.missing_field(), Some(&RequiredField::DocumentNumber));
    }

    #[test]
    fn quotes_are_lenient_even_when_final() {
        let draft = InvoiceDraftBuilder::new("q-1").kind(DocumentKind::Quote).build();
        let inv = normalize(&draft, &[], &Totals::default(), &[], Purpose::Final).unwrap();
        assert!(!inv.strict);
        assert_eq!(inv.customer.tax_id, PLACEHOLDER_ID);
    }
}
