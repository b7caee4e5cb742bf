use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::codes::*;
use super::xml_utils::{COUNTRY_CODE_LIST, XmlWriter, format_plain};
use super::{CONTROLLING_AGENCY, DATE_FORMAT, TEIF_VERSION};
use crate::core::*;

/// Unit of measure for line quantities (UN/ECE Rec 20 "one").
const MEASUREMENT_UNIT: &str = "C62";

/// Compile an invoice snapshot into TEIF XML.
///
/// Runs the normalizer (strict for final non-quote documents), aggregates VAT
/// per rate, and renders the document. Fails only on a missing mandatory
/// field in strict mode; no partial document is ever returned.
pub fn compile(
    draft: &InvoiceDraft,
    parties: &[Party],
    totals: &Totals,
    lines: &[LineItem],
    purpose: Purpose,
) -> Result<String, TeifError> {
    let invoice = normalize(draft, parties, totals, lines, purpose)?;
    let aggregation = aggregate(&invoice.lines, invoice.stamp);
    let xml = compile_normalized(&invoice, &aggregation)?;

    tracing::debug!(
        number = %invoice.number,
        buckets = aggregation.buckets.len(),
        bytes = xml.len(),
        "compiled TEIF document"
    );

    Ok(xml)
}

/// Render an already normalized and aggregated invoice.
pub fn compile_normalized(
    invoice: &NormalizedInvoice,
    aggregation: &Aggregation,
) -> Result<String, TeifError> {
    let mut w = XmlWriter::new()?;

    w.start_element_with_attrs(
        "TEIF",
        &[("controlingAgency", CONTROLLING_AGENCY), ("version", TEIF_VERSION)],
    )?;

    write_header(&mut w, invoice)?;

    w.start_element("InvoiceBody")?;
    write_bgm(&mut w, invoice)?;
    write_dtm(&mut w, invoice)?;

    w.start_element("PartnerSection")?;
    write_partner(&mut w, &invoice.supplier)?;
    write_partner(&mut w, &invoice.customer)?;
    w.end_element("PartnerSection")?;

    if let Some(note) = &invoice.note {
        w.start_element("Ftx")?;
        w.start_element_with_attrs("FtxDetail", &[("functionCode", TextFunction::Note.code())])?;
        w.text_element_with_attrs("Text", note, &[("lang", "fr")])?;
        w.end_element("FtxDetail")?;
        w.end_element("Ftx")?;
    }

    write_lines(&mut w, invoice, aggregation)?;
    write_invoice_moa(&mut w, invoice, aggregation)?;
    write_invoice_tax(&mut w, invoice, aggregation)?;

    w.end_element("InvoiceBody")?;
    w.end_element("TEIF")?;

    w.into_string()
}

fn write_header(w: &mut XmlWriter, invoice: &NormalizedInvoice) -> Result<(), TeifError> {
    let id_type = [("type", IdentifierType::TaxId.code())];
    w.start_element("InvoiceHeader")?;
    w.text_element_with_attrs("MessageSenderIdentifier", &invoice.supplier.tax_id, &id_type)?;
    // "Reciever" is the spelling mandated by the schema.
    w.text_element_with_attrs("MessageRecieverIdentifier", &invoice.customer.tax_id, &id_type)?;
    w.end_element("InvoiceHeader")?;
    Ok(())
}

fn write_bgm(w: &mut XmlWriter, invoice: &NormalizedInvoice) -> Result<(), TeifError> {
    w.start_element("Bgm")?;
    w.text_element("DocumentIdentifier", &invoice.number)?;
    if let Some(doc_type) = DocumentTypeCode::for_kind(invoice.kind) {
        w.text_element_with_attrs("DocumentType", doc_type.label(), &[("code", doc_type.code())])?;
    }
    w.end_element("Bgm")?;
    Ok(())
}

fn write_dtm(w: &mut XmlWriter, invoice: &NormalizedInvoice) -> Result<(), TeifError> {
    w.start_element("Dtm")?;
    write_date(w, DateFunction::Issue, invoice.issue_date)?;
    if invoice.due_date.is_some() {
        write_date(w, DateFunction::Due, invoice.due_date)?;
    }
    w.end_element("Dtm")?;
    Ok(())
}

fn write_date(
    w: &mut XmlWriter,
    function: DateFunction,
    date: Option<NaiveDate>,
) -> Result<(), TeifError> {
    let text = date.map(format_date).unwrap_or_default();
    w.text_element_with_attrs(
        "DateText",
        &text,
        &[("format", "ddMMyy"), ("functionCode", function.code())],
    )?;
    Ok(())
}

/// Six digits, day-month-year, no separators.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn write_partner(w: &mut XmlWriter, party: &NormalizedParty) -> Result<(), TeifError> {
    let function = PartnerFunction::from(party.role);
    w.start_element_with_attrs("PartnerDetails", &[("functionCode", function.code())])?;
    w.start_element("Nad")?;
    w.text_element_with_attrs(
        "PartnerIdentifier",
        &party.tax_id,
        &[("type", IdentifierType::TaxId.code())],
    )?;
    w.text_element_with_attrs("PartnerName", &party.name, &[("nameType", "Qualification")])?;
    w.start_element_with_attrs("PartnerAdresses", &[("lang", "fr")])?;
    w.text_element("AdressDescription", &party.address)?;
    w.text_element("Street", &party.street)?;
    w.text_element("CityName", &party.city)?;
    w.text_element("PostalCode", &party.postal_code)?;
    w.text_element_with_attrs("Country", &party.country, &[("codeList", COUNTRY_CODE_LIST)])?;
    w.end_element("PartnerAdresses")?;
    w.end_element("Nad")?;
    w.end_element("PartnerDetails")?;
    Ok(())
}

fn write_lines(
    w: &mut XmlWriter,
    invoice: &NormalizedInvoice,
    aggregation: &Aggregation,
) -> Result<(), TeifError> {
    let currency = invoice.currency.as_str();

    w.start_element("LinSection")?;
    for (i, (line, amounts)) in invoice.lines.iter().zip(&aggregation.lines).enumerate() {
        let seq = (i + 1).to_string();
        w.start_element("Lin")?;
        w.text_element("ItemIdentifier", &seq)?;

        w.start_element("LinImd")?;
        w.text_element("ItemCode", &seq)?;
        w.text_element("ItemDescription", &line.description)?;
        w.end_element("LinImd")?;

        w.start_element("LinQty")?;
        w.text_element_with_attrs(
            "Quantity",
            &format_plain(line.quantity),
            &[("measurementUnit", MEASUREMENT_UNIT)],
        )?;
        w.end_element("LinQty")?;

        w.start_element("LinTax")?;
        write_tax_type(w, TaxType::Vat)?;
        write_tax_rate(w, line.tax_rate)?;
        w.end_element("LinTax")?;

        w.start_element("LinMoa")?;
        w.start_element("MoaDetails")?;
        w.moa(AmountType::UnitPrice, line.unit_price, currency, None)?;
        w.end_element("MoaDetails")?;
        w.start_element("MoaDetails")?;
        w.moa(AmountType::LineNet, amounts.net, currency, None)?;
        w.end_element("MoaDetails")?;
        w.end_element("LinMoa")?;

        w.end_element("Lin")?;
    }
    w.end_element("LinSection")?;
    Ok(())
}

fn write_invoice_moa(
    w: &mut XmlWriter,
    invoice: &NormalizedInvoice,
    aggregation: &Aggregation,
) -> Result<(), TeifError> {
    let currency = invoice.currency.as_str();

    w.start_element("InvoiceMoa")?;
    for role in AmountType::INVOICE_TOTALS {
        let (amount, description) = match role {
            AmountType::InvoiceTax => (aggregation.tax_total, None),
            AmountType::InvoiceGross => {
                (aggregation.gross_total, invoice.amount_description.as_deref())
            }
            // Net and taxable base coincide: there are no document-level allowances.
            _ => (aggregation.net_total, None),
        };
        w.start_element("AmountDetails")?;
        w.moa(role, amount, currency, description)?;
        w.end_element("AmountDetails")?;
    }
    w.end_element("InvoiceMoa")?;
    Ok(())
}

fn write_invoice_tax(
    w: &mut XmlWriter,
    invoice: &NormalizedInvoice,
    aggregation: &Aggregation,
) -> Result<(), TeifError> {
    let currency = invoice.currency.as_str();

    w.start_element("InvoiceTax")?;

    if let Some(stamp) = aggregation.stamp {
        w.start_element("InvoiceTaxDetails")?;
        w.start_element("Tax")?;
        write_tax_type(w, TaxType::StampDuty)?;
        write_tax_rate(w, Decimal::ZERO)?;
        w.end_element("Tax")?;
        w.start_element("AmountDetails")?;
        w.moa(AmountType::TaxAmount, stamp, currency, None)?;
        w.end_element("AmountDetails")?;
        w.end_element("InvoiceTaxDetails")?;
    }

    for bucket in &aggregation.buckets {
        w.start_element("InvoiceTaxDetails")?;
        w.start_element("Tax")?;
        write_tax_type(w, TaxType::Vat)?;
        write_tax_rate(w, bucket.rate)?;
        w.end_element("Tax")?;
        w.start_element("AmountDetails")?;
        w.moa(AmountType::TaxBase, bucket.taxable_base, currency, None)?;
        w.end_element("AmountDetails")?;
        w.start_element("AmountDetails")?;
        w.moa(AmountType::TaxAmount, bucket.tax_amount, currency, None)?;
        w.end_element("AmountDetails")?;
        w.end_element("InvoiceTaxDetails")?;
    }

    w.end_element("InvoiceTax")?;
    Ok(())
}

fn write_tax_type(w: &mut XmlWriter, tax: TaxType) -> Result<(), TeifError> {
    w.text_element_with_attrs("TaxTypeName", tax.label(), &[("code", tax.code())])?;
    Ok(())
}

fn write_tax_rate(w: &mut XmlWriter, rate: Decimal) -> Result<(), TeifError> {
    w.start_element("TaxDetails")?;
    w.text_element("TaxRate", &format_plain(rate))?;
    w.end_element("TaxDetails")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn date_is_six_digits() {
        let d = NaiveDate::from_ymd_opt(2024, 6, 5).unwrap();
        assert_eq!(format_date(d), "050624");
        let d = NaiveDate::from_ymd_opt(2031, 12, 31).unwrap();
        assert_eq!(format_date(d), "311231");
    }

    #[test]
    fn preview_of_empty_snapshot_compiles() {
        let draft = InvoiceDraftBuilder::new("inv-0").build();
        let xml = compile(&draft, &[], &Totals::default(), &[], Purpose::Preview).unwrap();
        assert!(xml.contains(r#"<TEIF controlingAgency="TTN" version="1.8.8">"#));
        assert!(xml.contains("<DocumentIdentifier>inv-0</DocumentIdentifier>"));
        assert!(xml.contains(r#"<MessageSenderIdentifier type="I-01">NA</MessageSenderIdentifier>"#));
        assert!(xml.contains(r#"<PartnerName nameType="Qualification">Client</PartnerName>"#));
        assert!(xml.contains("<TaxRate>0</TaxRate>"));
        assert!(!xml.contains("<Ftx>"));
    }

    #[test]
    fn stamp_entry_precedes_vat_entries() {
        let draft = InvoiceDraftBuilder::new("inv-1").build();
        let lines = [LineItemBuilder::new("Câble", dec!(3), dec!(10)).tax_rate(dec!(7)).build()];
        let totals = TotalsBuilder::new().stamp(dec!(1)).build();
        let xml = compile(&draft, &[], &totals, &lines, Purpose::Preview).unwrap();
        let stamp = xml.find(r#"<TaxTypeName code="I-1601">droit de timbre</TaxTypeName>"#).unwrap();
        let tax_section = xml.find("<InvoiceTax>").unwrap();
        let vat_entry = xml[tax_section..].find(r#"code="I-1602""#).unwrap() + tax_section;
        assert!(tax_section < stamp && stamp < vat_entry);
    }

    #[test]
    fn quote_has_no_document_type() {
        let draft = InvoiceDraftBuilder::new("q-1").kind(DocumentKind::Quote).build();
        let xml = compile(&draft, &[], &Totals::default(), &[], Purpose::Preview).unwrap();
        assert!(!xml.contains("<DocumentType"));
    }
}
