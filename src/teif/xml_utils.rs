use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use rust_decimal::Decimal;
use std::io::Cursor;

use super::codes::AmountType;
use crate::core::{AMOUNT_SCALE, TeifError, round_amount};

/// Code list named on every `Moa`.
pub const CURRENCY_CODE_LIST: &str = "ISO_4217";
/// Code list named on every `Country`.
pub const COUNTRY_CODE_LIST: &str = "ISO_3166-1";

fn xml_io(e: std::io::Error) -> TeifError {
    TeifError::Xml(format!("XML write error: {e}"))
}

pub struct XmlWriter {
    writer: Writer<Cursor<Vec<u8>>>,
}

impl XmlWriter {
    pub fn new() -> Result<Self, TeifError> {
        let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(xml_io)?;
        Ok(Self { writer })
    }

    pub fn into_string(self) -> Result<String, TeifError> {
        let buf = self.writer.into_inner().into_inner();
        String::from_utf8(buf).map_err(|e| TeifError::Xml(format!("XML UTF-8 error: {e}")))
    }

    pub fn start_element(&mut self, name: &str) -> Result<&mut Self, TeifError> {
        self.writer
            .write_event(Event::Start(BytesStart::new(name)))
            .map_err(xml_io)?;
        Ok(self)
    }

    pub fn start_element_with_attrs(
        &mut self,
        name: &str,
        attrs: &[(&str, &str)],
    ) -> Result<&mut Self, TeifError> {
        let mut elem = BytesStart::new(name);
        for (k, v) in attrs {
            elem.push_attribute((*k, *v));
        }
        self.writer
            .write_event(Event::Start(elem))
            .map_err(xml_io)?;
        Ok(self)
    }

    pub fn end_element(&mut self, name: &str) -> Result<&mut Self, TeifError> {
        self.writer
            .write_event(Event::End(BytesEnd::new(name)))
            .map_err(xml_io)?;
        Ok(self)
    }

    pub fn text_element(&mut self, name: &str, text: &str) -> Result<&mut Self, TeifError> {
        self.text_element_with_attrs(name, text, &[])
    }

    /// Always writes an explicit start/end pair, even for empty text.
    pub fn text_element_with_attrs(
        &mut self,
        name: &str,
        text: &str,
        attrs: &[(&str, &str)],
    ) -> Result<&mut Self, TeifError> {
        self.start_element_with_attrs(name, attrs)?;
        self.writer
            .write_event(Event::Text(BytesText::new(text)))
            .map_err(xml_io)?;
        self.end_element(name)
    }

    /// Write a `Moa` block: role code, currency-tagged amount and an optional
    /// amount description.
    pub fn moa(
        &mut self,
        role: AmountType,
        amount: Decimal,
        currency: &str,
        description: Option<&str>,
    ) -> Result<&mut Self, TeifError> {
        self.start_element_with_attrs(
            "Moa",
            &[
                ("amountTypeCode", role.code()),
                ("currencyCodeList", CURRENCY_CODE_LIST),
            ],
        )?;
        self.text_element_with_attrs(
            "Amount",
            &format_amount(amount),
            &[("currencyIdentifier", currency)],
        )?;
        if let Some(text) = description {
            self.text_element_with_attrs("AmountDescription", text, &[("lang", "fr")])?;
        }
        self.end_element("Moa")
    }
}

/// Format an amount with exactly three decimals (millimes), half-up.
pub fn format_amount(d: Decimal) -> String {
    let mut rounded = round_amount(d);
    if rounded.is_zero() {
        rounded = Decimal::ZERO;
    }
    rounded.rescale(AMOUNT_SCALE);
    rounded.to_string()
}

/// Format a rate or quantity without trailing zeros (`19`, `7.5`).
pub fn format_plain(d: Decimal) -> String {
    d.normalize().to_string()
}
