//! Discount resolution and per-rate VAT aggregation.

use std::collections::BTreeMap;

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

use super::types::LineItem;

/// Decimal places used for every amount in the tax document.
pub const AMOUNT_SCALE: u32 = 3;

/// Largest magnitude a resolved line amount may reach.
pub const MAX_LINE_AMOUNT: Decimal = dec!(1000000000000000);

/// Amounts resolved for a single line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineAmounts {
    /// quantity × unit price.
    pub base: Decimal,
    /// Discount actually applied.
    pub discount: Decimal,
    /// `base - discount`, the line's taxable base.
    pub net: Decimal,
    /// VAT on `net` at the line's rate.
    pub tax: Decimal,
}

/// All lines sharing one nominal VAT rate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxBucket {
    pub rate: Decimal,
    /// Sum of discounted line bases, rounded to three decimals.
    pub taxable_base: Decimal,
    /// Sum of line VAT amounts, rounded to three decimals.
    pub tax_amount: Decimal,
    pub line_count: usize,
}

/// Result of aggregating an invoice's lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aggregation {
    /// One entry per input line, same order.
    pub lines: Vec<LineAmounts>,
    /// Ascending by rate; never empty.
    pub buckets: Vec<TaxBucket>,
    /// Sum of bucket bases.
    pub net_total: Decimal,
    /// Sum of bucket taxes.
    pub tax_total: Decimal,
    pub stamp: Option<Decimal>,
    /// `net_total + tax_total + stamp`.
    pub gross_total: Decimal,
}

impl LineAmounts {
    pub const ZERO: Self = Self {
        base: Decimal::ZERO,
        discount: Decimal::ZERO,
        net: Decimal::ZERO,
        tax: Decimal::ZERO,
    };
}

/// Resolve one line's discount, taxable base and VAT.
///
/// A positive absolute discount wins; otherwise a positive percentage
/// (clamped to 100) applies. The two are never combined.
///
/// A line whose arithmetic overflows, or whose amounts exceed
/// [`MAX_LINE_AMOUNT`] in magnitude, resolves to [`LineAmounts::ZERO`].
pub fn resolve_line(line: &LineItem) -> LineAmounts {
    checked_line(line).unwrap_or_else(|| {
        tracing::warn!(
            quantity = %line.quantity,
            unit_price = %line.unit_price,
            tax_rate = %line.tax_rate,
            "line amounts out of range, counted as zero"
        );
        LineAmounts::ZERO
    })
}

fn checked_line(line: &LineItem) -> Option<LineAmounts> {
    let base = line.quantity.checked_mul(line.unit_price)?;

    let discount = match (line.discount_amount, line.discount_pct) {
        (Some(amount), _) if amount > Decimal::ZERO => amount,
        (_, Some(pct)) if pct > Decimal::ZERO => {
            base.checked_mul(pct.min(dec!(100)))?.checked_div(dec!(100))?
        }
        _ => Decimal::ZERO,
    };

    let net = base.checked_sub(discount)?;
    let tax = net.checked_mul(line.tax_rate)?.checked_div(dec!(100))?;

    let amounts = LineAmounts {
        base,
        discount,
        net,
        tax,
    };
    [base, discount, net, tax]
        .iter()
        .all(|a| a.abs() <= MAX_LINE_AMOUNT)
        .then_some(amounts)
}

/// Group lines into per-rate buckets and derive invoice totals.
///
/// With no lines a single zero-rate bucket is synthesized so the tax
/// breakdown is never empty. Sums saturate at the `Decimal` bounds.
pub fn aggregate(lines: &[LineItem], stamp: Option<Decimal>) -> Aggregation {
    let resolved: Vec<LineAmounts> = lines.iter().map(resolve_line).collect();

    let mut by_rate: BTreeMap<Decimal, (Decimal, Decimal, usize)> = BTreeMap::new();
    for (line, amounts) in lines.iter().zip(&resolved) {
        let entry = by_rate
            .entry(line.tax_rate)
            .or_insert((Decimal::ZERO, Decimal::ZERO, 0));
        entry.0 = entry.0.saturating_add(amounts.net);
        entry.1 = entry.1.saturating_add(amounts.tax);
        entry.2 += 1;
    }

    let mut buckets: Vec<TaxBucket> = by_rate
        .into_iter()
        .map(|(rate, (base, tax, line_count))| TaxBucket {
            rate,
            taxable_base: round_amount(base),
            tax_amount: round_amount(tax),
            line_count,
        })
        .collect();

    if buckets.is_empty() {
        buckets.push(TaxBucket {
            rate: Decimal::ZERO,
            taxable_base: Decimal::ZERO,
            tax_amount: Decimal::ZERO,
            line_count: 0,
        });
    }

    let net_total = buckets
        .iter()
        .fold(Decimal::ZERO, |acc, b| acc.saturating_add(b.taxable_base));
    let tax_total = buckets
        .iter()
        .fold(Decimal::ZERO, |acc, b| acc.saturating_add(b.tax_amount));
    let gross_total = net_total
        .saturating_add(tax_total)
        .saturating_add(stamp.unwrap_or(Decimal::ZERO));

    Aggregation {
        lines: resolved,
        buckets,
        net_total,
        tax_total,
        stamp,
        gross_total,
    }
}

/// Round half-up (commercial rounding) to [`AMOUNT_SCALE`] places.
pub fn round_amount(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(AMOUNT_SCALE, RoundingStrategy::MidpointAwayFromZero)
}
