//! Compile a sample invoice, check its structure and enforce the size ceiling.
//!
//! Run with: `RUST_LOG=teif=debug cargo run --example compile_invoice`

use rust_decimal_macros::dec;
use teif::core::*;
use teif::teif::{compile, enforce_default_size, validate_structure};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), TeifError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "teif=info".into()))
        .init();

    let draft = InvoiceDraftBuilder::new("a41f")
        .number("FAC-2024-0128")
        .issue_date("2024-06-15")
        .due_date("2024-07-15")
        .note("Paiement par virement sous 30 jours")
        .build();
    let parties = [
        PartyBuilder::supplier()
            .tax_id("1234567A/A/M/000")
            .name("Atlas Informatique SARL")
            .address("12 rue de Marseille")
            .street("Rue de Marseille")
            .city("Tunis")
            .postal_code("1000")
            .build(),
        PartyBuilder::customer()
            .tax_id("7654321B/P/M/000")
            .name("Carthage Distribution")
            .address("5 avenue Habib Bourguiba")
            .city("Sfax")
            .postal_code("3000")
            .build(),
    ];
    let lines = [
        LineItemBuilder::new("Maintenance annuelle", dec!(2), dec!(100))
            .discount_pct(dec!(10))
            .build(),
        LineItemBuilder::new("Guide utilisateur", dec!(3), dec!(12.5))
            .tax_rate(dec!(7))
            .build(),
    ];
    let totals = TotalsBuilder::new()
        .amounts(dec!(217.5), dec!(36.825), dec!(255.325))
        .stamp(dec!(1))
        .build();

    let report = review_invoice(&draft, &parties, &totals, &lines);
    for finding in report.errors.iter().chain(&report.warnings) {
        eprintln!("{finding}");
    }

    let xml = compile(&draft, &parties, &totals, &lines, Purpose::Final)?;
    for issue in validate_structure(&xml) {
        eprintln!("structure: {issue}");
    }

    let doc = enforce_default_size(&xml);
    eprintln!(
        "size: {} -> {} bytes (trimmed: {})",
        doc.original_size(),
        doc.final_size(),
        doc.trimmed()
    );
    println!("{}", doc.text());
    Ok(())
}
