use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use super::codes::*;
use super::{CONTROLLING_AGENCY, TEIF_VERSION};
use crate::core::ValidationIssue;

/// Check a serialized TEIF document for the structure the authority requires.
///
/// Works on the text alone, independently of the compiler, so it also
/// catches hand-edited documents. Never fails: returns every violated rule
/// in checking order, or an empty list. A document that stops being
/// well-formed is scanned up to the error and reported on what was seen.
pub fn validate_structure(xml: &str) -> Vec<ValidationIssue> {
    let scan = Scan::run(xml);
    let mut issues = Vec::new();
    let mut issue = |element: String, message: String| {
        issues.push(ValidationIssue::new(element, message));
    };

    if let Some(err) = &scan.malformed {
        issue("TEIF".into(), format!("document is not well-formed XML ({err})"));
    }

    // Root and identity attributes
    if !scan.root {
        issue("TEIF".into(), "missing <TEIF> root element".into());
    }
    if scan.agency.as_deref() != Some(CONTROLLING_AGENCY) {
        issue("TEIF".into(), format!("missing controlingAgency=\"{CONTROLLING_AGENCY}\""));
    }
    if scan.version.as_deref() != Some(TEIF_VERSION) {
        issue("TEIF".into(), format!("missing version=\"{TEIF_VERSION}\""));
    }

    // Containers
    if !scan.header {
        issue("InvoiceHeader".into(), "missing <InvoiceHeader>".into());
    }
    if !scan.body {
        issue("InvoiceBody".into(), "missing <InvoiceBody>".into());
    }

    // Identity
    if !scan.bgm {
        issue("Bgm".into(), "missing <Bgm> identity block".into());
    }
    if !scan.document_identifier {
        issue("DocumentIdentifier".into(), "missing or empty document identifier".into());
    }

    // Dates
    if !scan.dtm {
        issue("Dtm".into(), "missing <Dtm> dates block".into());
    }
    let issue_element = format!("DateText[{}]", DateFunction::Issue.code());
    match (&scan.issue_date, scan.issue_date_seen) {
        (_, false) => issue(issue_element, "missing issue date".into()),
        (Some(text), true) if is_ddmmyy(text) => {}
        (text, true) => issue(
            issue_element,
            format!(
                "issue date '{}' is not in ddMMyy format",
                text.as_deref().unwrap_or_default()
            ),
        ),
    }

    // Partners
    if !scan.partner_section {
        issue("PartnerSection".into(), "missing <PartnerSection>".into());
    }
    for function in [PartnerFunction::Supplier, PartnerFunction::Customer] {
        let element = format!("PartnerDetails[{}]", function.code());
        let mut found = scan.partners.iter().filter(|p| p.function == Some(function)).peekable();
        if found.peek().is_none() {
            issue(element, format!("missing {} partner", function.describe()));
        } else if !found.all(|p| p.identified) {
            issue(element, format!("missing or empty {} identifier", function.describe()));
        }
    }

    // Lines
    if !scan.lin_section {
        issue("LinSection".into(), "missing <LinSection>".into());
    }
    if scan.lines.is_empty() {
        issue("Lin".into(), "missing at least one line item".into());
    }
    for (i, amounts) in scan.lines.iter().enumerate() {
        for role in [AmountType::UnitPrice, AmountType::LineNet] {
            if !amounts.contains(&role) {
                issue(
                    format!("Lin[{}]", i + 1),
                    format!("missing {} ({})", role.describe(), role.code()),
                );
            }
        }
    }

    // Totals
    if !scan.invoice_moa {
        issue("InvoiceMoa".into(), "missing <InvoiceMoa> totals".into());
    }
    for role in AmountType::INVOICE_TOTALS {
        if !scan.invoice_amounts.contains(&role) {
            issue(format!("Moa[{}]", role.code()), format!("missing {}", role.describe()));
        }
    }

    // Tax breakdown
    if !scan.invoice_tax {
        issue("InvoiceTax".into(), "missing <InvoiceTax>".into());
    }
    if scan.vat_entries == 0 {
        issue(
            format!("TaxTypeName[{}]", TaxType::Vat.code()),
            "missing VAT tax entry".into(),
        );
    }

    if !issues.is_empty() {
        tracing::debug!(issues = issues.len(), "TEIF structure check found violations");
    }
    issues
}

fn is_ddmmyy(text: &str) -> bool {
    text.len() == 6 && text.bytes().all(|b| b.is_ascii_digit())
}

struct ScannedPartner {
    function: Option<PartnerFunction>,
    identified: bool,
}

/// Structural facts collected in one pass over the document.
#[derive(Default)]
struct Scan {
    malformed: Option<String>,
    root: bool,
    agency: Option<String>,
    version: Option<String>,
    header: bool,
    body: bool,
    bgm: bool,
    document_identifier: bool,
    dtm: bool,
    issue_date_seen: bool,
    issue_date: Option<String>,
    open_date: Option<DateFunction>,
    partner_section: bool,
    partners: Vec<ScannedPartner>,
    lin_section: bool,
    /// Amount roles found in each `Lin`.
    lines: Vec<Vec<AmountType>>,
    invoice_moa: bool,
    invoice_amounts: Vec<AmountType>,
    invoice_tax: bool,
    vat_entries: usize,
}

impl Scan {
    fn run(xml: &str) -> Self {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut scan = Scan::default();
        let mut path: Vec<String> = Vec::new();

        loop {
            match reader.read_event() {
                Ok(Event::Start(ref e)) => {
                    let name = element_name(e);
                    scan.open(&name, e, &path);
                    path.push(name);
                }
                Ok(Event::Empty(ref e)) => {
                    let name = element_name(e);
                    scan.open(&name, e, &path);
                }
                Ok(Event::Text(ref e)) => {
                    let text = e.unescape().map(|t| t.into_owned()).unwrap_or_default();
                    scan.text(&path, text.trim());
                }
                Ok(Event::End(_)) => {
                    path.pop();
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    scan.malformed = Some(format!("at byte {}: {e}", reader.buffer_position()));
                    break;
                }
                Ok(_) => {}
            }
        }
        scan
    }

    fn open(&mut self, name: &str, e: &BytesStart<'_>, path: &[String]) {
        let inside = |ancestor: &str| path.iter().any(|p| p == ancestor);

        match name {
            "TEIF" if path.is_empty() => {
                self.root = true;
                self.agency = attr(e, "controlingAgency");
                self.version = attr(e, "version");
            }
            "InvoiceHeader" if inside("TEIF") => self.header = true,
            "InvoiceBody" if inside("TEIF") => self.body = true,
            "Bgm" => self.bgm = true,
            "Dtm" => self.dtm = true,
            "DateText" => {
                self.open_date = attr(e, "functionCode").and_then(|c| DateFunction::from_code(&c));
                if self.open_date == Some(DateFunction::Issue) {
                    self.issue_date_seen = true;
                }
            }
            "PartnerSection" => self.partner_section = true,
            "PartnerDetails" => self.partners.push(ScannedPartner {
                function: attr(e, "functionCode").and_then(|c| PartnerFunction::from_code(&c)),
                identified: false,
            }),
            "LinSection" => self.lin_section = true,
            "Lin" if inside("LinSection") => self.lines.push(Vec::new()),
            "InvoiceMoa" => self.invoice_moa = true,
            "InvoiceTax" => self.invoice_tax = true,
            "Moa" => {
                let Some(role) = attr(e, "amountTypeCode").and_then(|c| AmountType::from_code(&c))
                else {
                    return;
                };
                if inside("Lin") {
                    if let Some(line) = self.lines.last_mut() {
                        line.push(role);
                    }
                } else if inside("InvoiceMoa") {
                    self.invoice_amounts.push(role);
                }
            }
            "TaxTypeName" if inside("InvoiceTaxDetails") => {
                let kind = attr(e, "code").and_then(|c| TaxType::from_code(&c));
                if kind == Some(TaxType::Vat) {
                    self.vat_entries += 1;
                }
            }
            _ => {}
        }
    }

    fn text(&mut self, path: &[String], text: &str) {
        if text.is_empty() {
            return;
        }
        match path.last().map(String::as_str) {
            Some("DocumentIdentifier") => self.document_identifier = true,
            Some("DateText") if self.open_date == Some(DateFunction::Issue) => {
                self.issue_date = Some(text.to_string());
            }
            Some("PartnerIdentifier") => {
                if let Some(partner) = self.partners.last_mut() {
                    partner.identified = true;
                }
            }
            _ => {}
        }
    }
}

fn element_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.name().as_ref()).into_owned()
}

fn attr(e: &BytesStart<'_>, key: &str) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.as_ref() == key.as_bytes())
        .and_then(|a| a.unescape_value().ok().map(|v| v.into_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ddmmyy() {
        assert!(is_ddmmyy("150624"));
        assert!(!is_ddmmyy("15062024"));
        assert!(!is_ddmmyy("15-06-"));
        assert!(!is_ddmmyy(""));
    }

    #[test]
    fn malformed_document_is_reported_not_fatal() {
        let issues = validate_structure(r#"<TEIF controlingAgency="TTN" version="1.8.8"><InvoiceHeader></TEIF>"#);
        assert!(issues[0].message.starts_with("document is not well-formed XML"));
        // Root attributes were seen before the error.
        assert!(!issues.iter().any(|i| i.message.contains("controlingAgency")));
    }

    #[test]
    fn wrong_root_attribute_values() {
        let issues = validate_structure(r#"<TEIF controlingAgency="XYZ" version="1.8.7"/>"#);
        assert!(issues.iter().any(|i| i.message == r#"missing controlingAgency="TTN""#));
        assert!(issues.iter().any(|i| i.message == r#"missing version="1.8.8""#));
        assert!(!issues.iter().any(|i| i.message.contains("root element")));
    }

    #[test]
    fn empty_issue_date_is_a_format_violation() {
        let xml = r#"<TEIF><InvoiceBody><Dtm><DateText format="ddMMyy" functionCode="I-31"></DateText></Dtm></InvoiceBody></TEIF>"#;
        let issues = validate_structure(xml);
        let date = issues.iter().find(|i| i.element == "DateText[I-31]").unwrap();
        assert_eq!(date.message, "issue date '' is not in ddMMyy format");
    }
}
