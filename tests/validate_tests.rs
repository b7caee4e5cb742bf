#![cfg(feature = "teif")]

use rust_decimal_macros::dec;
use teif::core::*;
use teif::teif::{compile, validate_structure};

fn full_invoice_xml() -> String {
    let draft = InvoiceDraftBuilder::new("9f1e")
        .number("FAC-2024-0100")
        .issue_date("2024-03-01")
        .due_date("2024-03-31")
        .note("Règlement par virement")
        .build();
    let parties = [
        PartyBuilder::supplier()
            .tax_id("1234567A/A/M/000")
            .name("Atlas Informatique SARL")
            .address("12 rue de Marseille")
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
        LineItemBuilder::new("Serveur", dec!(1), dec!(2500)).tax_rate(dec!(19)).build(),
        LineItemBuilder::new("Manuel", dec!(4), dec!(12.5)).tax_rate(dec!(7)).build(),
    ];
    let totals = TotalsBuilder::new()
        .stamp(dec!(1))
        .amount_description("Trois mille dinars")
        .build();
    compile(&draft, &parties, &totals, &lines, Purpose::Final).unwrap()
}

/// Drop the `PartnerDetails` block carrying `code`.
fn remove_partner(xml: &str, code: &str) -> String {
    let open = format!(r#"<PartnerDetails functionCode="{code}">"#);
    let start = xml.find(&open).unwrap();
    let end = start + xml[start..].find("</PartnerDetails>").unwrap() + "</PartnerDetails>".len();
    format!("{}{}", &xml[..start], &xml[end..])
}

fn lines_of(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn compiled_final_invoice_is_clean() {
    let issues = validate_structure(&full_invoice_xml());
    assert!(issues.is_empty(), "{}", lines_of(&issues));
}

#[test]
fn compiled_preview_of_empty_snapshot_flags_only_content_gaps() {
    let xml = compile(
        &InvoiceDraftBuilder::new("draft-1").build(),
        &[],
        &Totals::default(),
        &[],
        Purpose::Preview,
    )
    .unwrap();
    let issues = validate_structure(&xml);
    let elements: Vec<_> = issues.iter().map(|i| i.element.as_str()).collect();
    assert_eq!(elements, ["DateText[I-31]", "Lin"]);
}

#[test]
fn missing_customer_block_is_reported() {
    let xml = remove_partner(&full_invoice_xml(), "I-64");
    let issues = validate_structure(&xml);
    assert_eq!(issues.len(), 1, "{}", lines_of(&issues));
    assert_eq!(issues[0].element, "PartnerDetails[I-64]");
    assert!(issues[0].message.contains("customer partner"));
}

#[test]
fn empty_partner_identifier_is_reported() {
    let xml = full_invoice_xml().replace(
        r#"<PartnerIdentifier type="I-01">1234567A/A/M/000</PartnerIdentifier>"#,
        r#"<PartnerIdentifier type="I-01">  </PartnerIdentifier>"#,
    );
    let issues = validate_structure(&xml);
    assert_eq!(lines_of(&issues), "PartnerDetails[I-62]: missing or empty supplier identifier");
}

#[test]
fn reformatted_issue_date_is_reported() {
    let xml = full_invoice_xml().replace(">010324</DateText>", ">2024-03-01</DateText>");
    let issues = validate_structure(&xml);
    assert_eq!(
        lines_of(&issues),
        "DateText[I-31]: issue date '2024-03-01' is not in ddMMyy format"
    );
}

#[test]
fn line_without_unit_price_is_reported() {
    let xml = full_invoice_xml().replacen(r#"amountTypeCode="I-183""#, r#"amountTypeCode="I-999""#, 1);
    let issues = validate_structure(&xml);
    assert_eq!(lines_of(&issues), "Lin[1]: missing unit price (I-183)");
}

#[test]
fn stamp_entry_alone_does_not_satisfy_vat_rule() {
    let xml = full_invoice_xml().replace(
        r#"<TaxTypeName code="I-1602">TVA</TaxTypeName>"#,
        r#"<TaxTypeName code="I-1601">droit de timbre</TaxTypeName>"#,
    );
    let issues = validate_structure(&xml);
    assert_eq!(lines_of(&issues), "TaxTypeName[I-1602]: missing VAT tax entry");
}

#[test]
fn every_violation_is_listed_in_order() {
    insta::assert_snapshot!(lines_of(&validate_structure("")), @r#"
    TEIF: missing <TEIF> root element
    TEIF: missing controlingAgency="TTN"
    TEIF: missing version="1.8.8"
    InvoiceHeader: missing <InvoiceHeader>
    InvoiceBody: missing <InvoiceBody>
    Bgm: missing <Bgm> identity block
    DocumentIdentifier: missing or empty document identifier
    Dtm: missing <Dtm> dates block
    DateText[I-31]: missing issue date
    PartnerSection: missing <PartnerSection>
    PartnerDetails[I-62]: missing supplier partner
    PartnerDetails[I-64]: missing customer partner
    LinSection: missing <LinSection>
    Lin: missing at least one line item
    InvoiceMoa: missing <InvoiceMoa> totals
    Moa[I-176]: missing invoice net total
    Moa[I-182]: missing invoice taxable base
    Moa[I-181]: missing invoice tax total
    Moa[I-180]: missing invoice gross total
    InvoiceTax: missing <InvoiceTax>
    TaxTypeName[I-1602]: missing VAT tax entry
    "#);
}

#[test]
fn non_xml_input_does_not_panic() {
    let issues = validate_structure("<<<not xml>>> &&&");
    assert!(!issues.is_empty());
    assert!(issues.iter().any(|i| i.element == "TEIF"));
}
