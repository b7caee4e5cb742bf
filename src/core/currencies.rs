//! ISO 4217 currency code lookup.
//!
//! Covers the dinar and the currencies Tunisian businesses commonly invoice
//! in (trading partners in the Maghreb, the Gulf, Europe and North America).

/// Check whether `code` is a known ISO 4217 currency code.
pub fn is_known_currency_code(code: &str) -> bool {
    CURRENCY_CODES.binary_search(&code).is_ok()
}

/// Sorted for binary search.
static CURRENCY_CODES: &[&str] = &[
    "AED", // UAE Dirham
    "BHD", // Bahraini Dinar
    "CAD", // Canadian Dollar
    "CHF", // Swiss Franc
    "CNY", // Chinese Yuan
    "DKK", // Danish Krone
    "DZD", // Algerian Dinar
    "EGP", // Egyptian Pound
    "EUR", // Euro
    "GBP", // Pound Sterling
    "JOD", // Jordanian Dinar
    "JPY", // Japanese Yen
    "KWD", // Kuwaiti Dinar
    "LYD", // Libyan Dinar
    "MAD", // Moroccan Dirham
    "MRU", // Mauritanian Ouguiya
    "NOK", // Norwegian Krone
    "OMR", // Omani Rial
    "QAR", // Qatari Riyal
    "SAR", // Saudi Riyal
    "SEK", // Swedish Krona
    "TND", // Tunisian Dinar
    "TRY", // Turkish Lira
    "USD", // US Dollar
    "XOF", // CFA Franc BCEAO
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_currencies() {
        assert!(is_known_currency_code("TND"));
        assert!(is_known_currency_code("EUR"));
        assert!(is_known_currency_code("USD"));
        assert!(is_known_currency_code("LYD"));
        assert!(is_known_currency_code("DZD"));
    }

    #[test]
    fn unknown_currencies() {
        assert!(!is_known_currency_code("DT"));
        assert!(!is_known_currency_code(""));
        assert!(!is_known_currency_code("tnd"));
        assert!(!is_known_currency_code("DINAR"));
    }

    #[test]
    fn list_is_sorted() {
        for window in CURRENCY_CODES.windows(2) {
            assert!(
                window[0] < window[1],
                "currency codes not sorted: {} >= {}",
                window[0],
                window[1]
            );
        }
    }
}
