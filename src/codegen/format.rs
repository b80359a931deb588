//! Code fields and their formatting policy.
//!
//! Every external code is `<prefix><suffix>`. Some fields zero-pad the suffix
//! to five digits, the year-scoped document codes keep it unpadded. Parsing is
//! always a free-width trailing-digit match, so a suffix that outgrows its pad
//! width stays monotonic.

use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// A row field that receives an allocated external code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CodeField {
    CustomerId,
    VendorId,
    ErpSalesOrderId,
    ErpSalesOrderCode,
    DeliveryDocumentCode,
    ErpInvoiceCode,
}

impl CodeField {
    /// Column name; doubles as the key in `code_sequences`.
    pub fn column(self) -> &'static str {
        match self {
            CodeField::CustomerId => "customer_id",
            CodeField::VendorId => "vendor_id",
            CodeField::ErpSalesOrderId => "erp_sales_order_id",
            CodeField::ErpSalesOrderCode => "erp_sales_order_code",
            CodeField::DeliveryDocumentCode => "delivery_document_code",
            CodeField::ErpInvoiceCode => "erp_invoice_code",
        }
    }

    pub fn table(self) -> &'static str {
        match self {
            CodeField::CustomerId | CodeField::VendorId => "farmer_details",
            CodeField::ErpSalesOrderId | CodeField::ErpSalesOrderCode => "sales_orders",
            CodeField::DeliveryDocumentCode => "delivery_documents",
            CodeField::ErpInvoiceCode => "waybills",
        }
    }

    /// Timestamp column touched together with the code column.
    pub fn touch_column(self) -> &'static str {
        match self {
            CodeField::CustomerId => "cust_id_update_at",
            CodeField::VendorId => "vendor_id_update_at",
            _ => "updated_at",
        }
    }

    pub fn prefix(self) -> &'static str {
        match self {
            CodeField::CustomerId => "CUST",
            CodeField::VendorId => "VEND",
            CodeField::ErpSalesOrderId => "ERP-SO-",
            CodeField::ErpSalesOrderCode => "ECL 2025/",
            CodeField::DeliveryDocumentCode => "GT2 2025/",
            CodeField::ErpInvoiceCode => "INV-2026-",
        }
    }

    /// Zero-pad width of the suffix; `None` means unpadded.
    pub fn pad_width(self) -> Option<usize> {
        match self {
            CodeField::CustomerId
            | CodeField::VendorId
            | CodeField::ErpSalesOrderId
            | CodeField::ErpInvoiceCode => Some(5),
            CodeField::ErpSalesOrderCode | CodeField::DeliveryDocumentCode => None,
        }
    }

    pub fn format(self, n: i64) -> String {
        match self.pad_width() {
            Some(width) => format!("{}{:0width$}", self.prefix(), n, width = width),
            None => format!("{}{}", self.prefix(), n),
        }
    }
}

impl fmt::Display for CodeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

/// Trailing numeric suffix of an existing code, or `None` if the code does
/// not end in digits.
pub fn parse_suffix(code: &str) -> Option<i64> {
    static SUFFIX_RE: OnceLock<Regex> = OnceLock::new();
    let re = SUFFIX_RE.get_or_init(|| Regex::new(r"\d+$").expect("static suffix pattern"));
    re.find(code)?.as_str().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn padded_fields_use_five_digits() {
        assert_eq!(CodeField::CustomerId.format(1), "CUST00001");
        assert_eq!(CodeField::VendorId.format(10), "VEND00010");
        assert_eq!(CodeField::ErpSalesOrderId.format(42), "ERP-SO-00042");
        assert_eq!(CodeField::ErpInvoiceCode.format(7), "INV-2026-00007");
    }

    #[test]
    fn document_codes_are_unpadded() {
        assert_eq!(CodeField::ErpSalesOrderCode.format(7), "ECL 2025/7");
        assert_eq!(CodeField::DeliveryDocumentCode.format(12), "GT2 2025/12");
    }

    #[test]
    fn suffix_past_pad_width_keeps_growing() {
        assert_eq!(CodeField::CustomerId.format(123456), "CUST123456");
    }

    #[test]
    fn parse_reads_trailing_digits() {
        assert_eq!(parse_suffix("CUST00009"), Some(9));
        assert_eq!(parse_suffix("ECL 2025/31"), Some(31));
        assert_eq!(parse_suffix("INV-2026-00100"), Some(100));
    }

    #[test]
    fn parse_rejects_codes_without_digit_tail() {
        assert_eq!(parse_suffix("CUST"), None);
        assert_eq!(parse_suffix(""), None);
        assert_eq!(parse_suffix("00010-X"), None);
    }

    #[test]
    fn format_then_parse_round_trips() {
        for field in [
            CodeField::CustomerId,
            CodeField::VendorId,
            CodeField::ErpSalesOrderId,
            CodeField::ErpSalesOrderCode,
            CodeField::DeliveryDocumentCode,
            CodeField::ErpInvoiceCode,
        ] {
            assert_eq!(parse_suffix(&field.format(37)), Some(37));
        }
    }
}
