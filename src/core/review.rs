//! Business-level readiness review of an invoice snapshot before submission.
//!
//! Unlike [`normalize`](super::normalize), this never fails and reports every
//! finding, split into blocking errors and advisory warnings.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::aggregate::{aggregate, round_amount};
use super::countries::is_known_country_code;
use super::currencies::is_known_currency_code;
use super::normalize::parse_date;
use super::types::*;

/// Stated totals may differ from recomputed ones by at most this much.
pub const TOTALS_TOLERANCE: Decimal = dec!(0.005);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

/// One finding of the readiness review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewFinding {
    pub severity: Severity,
    /// Stable machine-readable code (e.g. "SELLER_MF_MISSING").
    pub code: &'static str,
    /// Dot-separated path of the offending field.
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ReviewFinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}: {}", self.code, self.field, self.message)
    }
}

/// Totals recomputed from the lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewSummary {
    pub line_count: usize,
    pub net_total: Decimal,
    pub tax_total: Decimal,
    /// Zero unless the stamp is enabled.
    pub stamp_amount: Decimal,
    pub gross_total: Decimal,
}

#[derive(Debug, Clone)]
pub struct ReadinessReport {
    pub errors: Vec<ReviewFinding>,
    pub warnings: Vec<ReviewFinding>,
    pub summary: ReviewSummary,
}

impl ReadinessReport {
    /// True when nothing blocks submission.
    pub fn ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// Look a finding up by code.
    pub fn find(&self, code: &str) -> Option<&ReviewFinding> {
        self.errors
            .iter()
            .chain(&self.warnings)
            .find(|f| f.code == code)
    }
}

#[derive(Default)]
struct Findings {
    errors: Vec<ReviewFinding>,
    warnings: Vec<ReviewFinding>,
}

impl Findings {
    fn error(&mut self, code: &'static str, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ReviewFinding {
            severity: Severity::Error,
            code,
            field: field.into(),
            message: message.into(),
        });
    }

    fn warning(&mut self, code: &'static str, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ReviewFinding {
            severity: Severity::Warning,
            code,
            field: field.into(),
            message: message.into(),
        });
    }
}

/// Review a raw snapshot for submission readiness.
pub fn review_invoice(
    draft: &InvoiceDraft,
    parties: &[Party],
    totals: &Totals,
    lines: &[LineItem],
) -> ReadinessReport {
    let mut f = Findings::default();

    if blank(draft.number.as_deref()) {
        f.error("INV_NUMBER_MISSING", "number", "invoice number is missing");
    }
    match draft.issue_date.as_deref().filter(|s| !s.trim().is_empty()) {
        None => f.error("ISSUE_DATE_MISSING", "issue_date", "invoice date is missing"),
        Some(raw) if parse_date(raw).is_none() => f.error(
            "ISSUE_DATE_INVALID",
            "issue_date",
            format!("invoice date '{}' is not a valid date", raw.trim()),
        ),
        Some(_) => {}
    }

    let supplier = parties.iter().find(|p| p.role == PartyRole::Supplier);
    let customer = parties.iter().find(|p| p.role == PartyRole::Customer);

    if blank(supplier.and_then(|p| p.name.as_deref())) {
        f.error("SELLER_NAME_MISSING", "supplier.name", "company name is missing");
    }
    if blank(supplier.and_then(|p| p.tax_id.as_deref())) {
        f.error(
            "SELLER_MF_MISSING",
            "supplier.tax_id",
            "company tax identifier (MF) is missing",
        );
    }
    if blank(supplier.and_then(|p| p.address.as_deref())) {
        f.warning(
            "SELLER_ADDRESS_MISSING",
            "supplier.address",
            "company address is not set (recommended)",
        );
    }

    if blank(customer.and_then(|p| p.name.as_deref())) {
        f.error("BUYER_NAME_MISSING", "customer.name", "customer name is missing");
    }
    if blank(customer.and_then(|p| p.tax_id.as_deref())) {
        f.warning(
            "BUYER_MF_MISSING",
            "customer.tax_id",
            "customer tax identifier (MF) is empty (usually required for B2B)",
        );
    }
    if blank(customer.and_then(|p| p.address.as_deref())) {
        f.warning(
            "BUYER_ADDRESS_MISSING",
            "customer.address",
            "customer address is not set (recommended)",
        );
    }

    for (prefix, party) in [("supplier", supplier), ("customer", customer)] {
        if let Some(country) = party.and_then(|p| p.country.as_deref()) {
            let code = country.trim().to_ascii_uppercase();
            if !code.is_empty() && !is_known_country_code(&code) {
                f.warning(
                    "COUNTRY_UNKNOWN",
                    format!("{prefix}.country"),
                    format!("country code '{code}' is not a known ISO 3166-1 code"),
                );
            }
        }
    }

    if let Some(currency) = draft.currency.as_deref() {
        let code = currency.trim().to_ascii_uppercase();
        if !code.is_empty() && !is_known_currency_code(&code) {
            f.warning(
                "CURRENCY_UNKNOWN",
                "currency",
                format!("currency code '{code}' is not a known ISO 4217 code"),
            );
        }
    }

    if lines.is_empty() {
        f.error("ITEMS_EMPTY", "lines", "invoice must contain at least one line");
    }
    for (i, line) in lines.iter().enumerate() {
        review_line(line, i, &mut f);
    }

    let stamp = totals.stamp();
    let agg = aggregate(lines, stamp);
    let summary = ReviewSummary {
        line_count: lines.len(),
        net_total: agg.net_total,
        tax_total: agg.tax_total,
        stamp_amount: stamp.unwrap_or(Decimal::ZERO),
        gross_total: agg.gross_total,
    };

    review_totals(totals, &summary, &mut f);

    ReadinessReport {
        errors: f.errors,
        warnings: f.warnings,
        summary,
    }
}

fn review_line(line: &LineItem, index: usize, f: &mut Findings) {
    let n = index + 1;
    let field = |name: &str| format!("lines[{index}].{name}");

    if line.description.trim().is_empty() {
        f.error("ITEM_DESC_MISSING", field("description"), format!("line {n}: description is missing"));
    }
    if line.quantity <= Decimal::ZERO {
        f.error(
            "ITEM_QTY_INVALID",
            field("quantity"),
            format!("line {n}: quantity must be greater than zero"),
        );
    }
    if line.unit_price < Decimal::ZERO {
        f.error("ITEM_PU_INVALID", field("unit_price"), format!("line {n}: unit price is negative"));
    }
    if line.tax_rate < Decimal::ZERO || line.tax_rate > dec!(100) {
        f.error(
            "ITEM_VAT_INVALID",
            field("tax_rate"),
            format!("line {n}: VAT rate {} is outside 0..100", line.tax_rate),
        );
    }
    if let (Some(discount), Some(base)) = (
        line.discount_amount,
        line.quantity.checked_mul(line.unit_price),
    ) {
        if discount > Decimal::ZERO && discount > base {
            f.warning(
                "ITEM_DISCOUNT_EXCEEDS_BASE",
                field("discount_amount"),
                format!("line {n}: discount {discount} exceeds the line amount {base}"),
            );
        }
    }
}

fn review_totals(totals: &Totals, summary: &ReviewSummary, f: &mut Findings) {
    let stated_net = round_amount(totals.net);
    let stated_tax = round_amount(totals.tax);
    let stated_gross = round_amount(totals.gross);

    if stated_net.is_zero() {
        if summary.net_total > Decimal::ZERO {
            f.warning("TOTAL_HT_EMPTY", "totals.net", "stated net total is empty; the line total is used");
        }
    } else if !within_tolerance(stated_net, summary.net_total) {
        f.error(
            "TOTAL_HT_MISMATCH",
            "totals.net",
            format!("net total mismatch: invoice ({stated_net}) ≠ lines ({})", summary.net_total),
        );
    }

    if stated_tax.is_zero() {
        if summary.tax_total > Decimal::ZERO {
            f.warning("TOTAL_VAT_EMPTY", "totals.tax", "stated VAT total is empty; the line total is used");
        }
    } else if !within_tolerance(stated_tax, summary.tax_total) {
        f.error(
            "TOTAL_VAT_MISMATCH",
            "totals.tax",
            format!("VAT total mismatch: invoice ({stated_tax}) ≠ lines ({})", summary.tax_total),
        );
    }

    if totals.stamp_enabled && totals.stamp_amount <= Decimal::ZERO {
        f.warning("STAMP_ENABLED_ZERO", "totals.stamp_amount", "stamp duty enabled but amount is zero");
    }
    if !totals.stamp_enabled && totals.stamp_amount > Decimal::ZERO {
        f.warning(
            "STAMP_AMOUNT_WITHOUT_FLAG",
            "totals.stamp_enabled",
            "stamp amount is set but stamp duty is disabled",
        );
    }

    if stated_gross.is_zero() {
        f.warning("TOTAL_TTC_EMPTY", "totals.gross", "stated gross total is empty; the computed total is used");
    } else if !within_tolerance(stated_gross, summary.gross_total) {
        f.error(
            "TOTAL_TTC_MISMATCH",
            "totals.gross",
            format!(
                "gross total mismatch: invoice ({stated_gross}) ≠ lines + VAT + stamp ({})",
                summary.gross_total
            ),
        );
    }
}

fn within_tolerance(a: Decimal, b: Decimal) -> bool {
    a.checked_sub(b).is_some_and(|d| d.abs() <= TOTALS_TOLERANCE)
}

fn blank(value: Option<&str>) -> bool {
    value.is_none_or(|s| s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::builder::*;

    fn parties() -> Vec<Party> {
        vec![
            PartyBuilder::supplier()
                .tax_id("1234567A/M/000")
                .name("Atlas SARL")
                .address("Tunis")
                .build(),
            PartyBuilder::customer()
                .tax_id("7654321B/A/M/000")
                .name("Carthage Trading")
                .address("Sousse")
                .build(),
        ]
    }

    fn draft() -> InvoiceDraft {
        InvoiceDraftBuilder::new("inv-1")
            .number("FAC-001")
            .issue_date("2024-06-15")
            .build()
    }

    fn lines() -> Vec<LineItem> {
        vec![LineItemBuilder::new("Conseil", dec!(2), dec!(100))
            .discount_pct(dec!(10))
            .build()]
    }

    #[test]
    fn consistent_invoice_is_ready() {
        let totals = TotalsBuilder::new()
            .amounts(dec!(180), dec!(34.2), dec!(215.2))
            .stamp(dec!(1))
            .build();
        let report = review_invoice(&draft(), &parties(), &totals, &lines());
        assert!(report.ok(), "{:?}", report.errors);
        assert!(report.warnings.is_empty(), "{:?}", report.warnings);
        assert_eq!(report.summary.gross_total, dec!(215.2));
        assert_eq!(report.summary.stamp_amount, dec!(1));
    }

    #[test]
    fn mismatched_totals_are_errors() {
        let totals = TotalsBuilder::new()
            .amounts(dec!(200), dec!(34.2), dec!(300))
            .build();
        let report = review_invoice(&draft(), &parties(), &totals, &lines());
        assert!(!report.ok());
        assert!(report.find("TOTAL_HT_MISMATCH").is_some());
        assert!(report.find("TOTAL_VAT_MISMATCH").is_none());
        assert!(report.find("TOTAL_TTC_MISMATCH").is_some());
    }

    #[test]
    fn tolerance_absorbs_rounding() {
        let totals = TotalsBuilder::new()
            .amounts(dec!(180.004), dec!(34.196), dec!(214.2))
            .build();
        let report = review_invoice(&draft(), &parties(), &totals, &lines());
        assert!(report.ok(), "{:?}", report.errors);
    }

    #[test]
    fn reports_everything_at_once() {
        let draft = InvoiceDraftBuilder::new("inv-1")
            .issue_date("31/12/2024")
            .currency("xyz")
            .build();
        let bad = vec![LineItemBuilder::new("", dec!(0), dec!(-1)).tax_rate(dec!(120)).build()];
        let report = review_invoice(&draft, &[], &Totals::default(), &bad);

        let codes: Vec<_> = report.errors.iter().map(|e| e.code).collect();
        assert_eq!(
            codes,
            vec![
                "INV_NUMBER_MISSING",
                "ISSUE_DATE_INVALID",
                "SELLER_NAME_MISSING",
                "SELLER_MF_MISSING",
                "BUYER_NAME_MISSING",
                "ITEM_DESC_MISSING",
                "ITEM_QTY_INVALID",
                "ITEM_PU_INVALID",
                "ITEM_VAT_INVALID",
            ]
        );
        assert!(report.find("CURRENCY_UNKNOWN").is_some());
        assert!(report.find("TOTAL_TTC_EMPTY").is_some());
        assert_eq!(report.find("ITEM_QTY_INVALID").unwrap().field, "lines[0].quantity");
    }

    #[test]
    fn stamp_flag_inconsistencies_warn() {
        let mut totals = Totals {
            stamp_amount: dec!(1),
            ..Totals::default()
        };
        let report = review_invoice(&draft(), &parties(), &totals, &lines());
        assert!(report.find("STAMP_AMOUNT_WITHOUT_FLAG").is_some());

        totals.stamp_enabled = true;
        totals.stamp_amount = Decimal::ZERO;
        let report = review_invoice(&draft(), &parties(), &totals, &lines());
        assert!(report.find("STAMP_ENABLED_ZERO").is_some());
    }

    #[test]
    fn discount_above_line_amount_warns() {
        let lines = vec![LineItemBuilder::new("Remise", dec!(1), dec!(10))
            .discount_amount(dec!(50))
            .build()];
        let totals = TotalsBuilder::new()
            .amounts(dec!(-40), dec!(-7.6), dec!(-47.6))
            .build();
        let report = review_invoice(&draft(), &parties(), &totals, &lines);

        assert!(report.ok(), "{:?}", report.errors);
        let finding = report.find("ITEM_DISCOUNT_EXCEEDS_BASE").unwrap();
        assert_eq!(finding.severity, Severity::Warning);
        assert_eq!(finding.field, "lines[0].discount_amount");
        assert_eq!(report.summary.net_total, dec!(-40));

        let within = vec![LineItemBuilder::new("Remise", dec!(1), dec!(10))
            .discount_amount(dec!(10))
            .build()];
        let report = review_invoice(&draft(), &parties(), &Totals::default(), &within);
        assert!(report.find("ITEM_DISCOUNT_EXCEEDS_BASE").is_none());
    }

    #[test]
    fn extreme_totals_count_as_mismatches() {
        let huge = Decimal::from_i128_with_scale(10i128.pow(20), 0);
        let lines = vec![LineItemBuilder::new("x", huge, huge).build()];
        let totals = TotalsBuilder::new()
            .amounts(Decimal::MIN, Decimal::MAX, Decimal::MIN)
            .stamp(Decimal::MAX)
            .build();
        let report = review_invoice(&draft(), &parties(), &totals, &lines);

        assert_eq!(report.summary.net_total, Decimal::ZERO);
        assert!(report.find("TOTAL_HT_MISMATCH").is_some());
        assert!(report.find("TOTAL_VAT_MISMATCH").is_some());
        assert!(report.find("TOTAL_TTC_MISMATCH").is_some());
    }

    #[test]
    fn missing_lines() {
        let report = review_invoice(&draft(), &parties(), &Totals::default(), &[]);
        assert!(report.find("ITEMS_EMPTY").is_some());
        assert_eq!(report.summary.line_count, 0);
    }
}
