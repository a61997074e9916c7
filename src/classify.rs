use log::debug;

use crate::schema::{
    AnalyzerConfig, BillRecord, BillType, Charge, LineItem, RawBill, RawCharge, RawLineItem,
};

/// Placeholder for lines the extractor could not name.
pub const UNKNOWN_ITEM: &str = "Unknown Item";

/// Substrings (matched case-insensitively) that mark a line entry as a
/// service charge rather than an inventory product.
pub const DEFAULT_CHARGE_KEYWORDS: [&str; 18] = [
    "packing",
    "forwarding",
    "freight",
    "shipping",
    "handling",
    "delivery",
    "transport",
    "transportation",
    "courier",
    "service charge",
    "service fee",
    "insurance",
    "loading",
    "unloading",
    "charges",
    "charge",
    "p&f",
    "p & f",
];

const SALES_KEYWORDS: [&str; 10] = [
    "sold to",
    "customer",
    "invoice to",
    "bill to",
    "ship to",
    "buyer",
    "sales invoice",
    "tax invoice",
    "retail",
    "sale",
];

const PURCHASE_KEYWORDS: [&str; 9] = [
    "purchased from",
    "supplier",
    "vendor",
    "purchase order",
    "po number",
    "bought from",
    "purchase invoice",
    "wholesale",
    "procurement",
];

/// Outcome of classifying one raw line entry.
#[derive(Debug, Clone, PartialEq)]
pub enum ClassifiedLine {
    Product(LineItem),
    Service(Charge),
}

fn is_charge(name: &str, keywords: &[String]) -> bool {
    let name_lower = name.to_lowercase();
    keywords.iter().any(|kw| name_lower.contains(kw.as_str()))
}

fn resolve_name(raw: Option<&str>) -> String {
    match raw.map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => UNKNOWN_ITEM.to_string(),
    }
}

/// Cleans and classifies one raw extracted line entry.
///
/// Three steps, in order: backfill a missing amount from quantity and rate,
/// zero out a phantom discount the extractor misread from a tax column, and
/// route service-keyword names to `Service`. A printed amount is always
/// trusted over a recomputed one. Negative quantities and rates pass
/// through untouched; they surface later in `validation`.
pub fn classify_line(raw: &RawLineItem, config: &AnalyzerConfig) -> ClassifiedLine {
    let name = resolve_name(raw.name.as_deref());
    let quantity = raw.quantity.unwrap_or(1.0);
    let rate = raw.rate.unwrap_or(0.0);
    let mut discount_percent = raw.discount_percent.unwrap_or(0.0);
    let mut amount = raw.amount.unwrap_or(0.0);

    // Backfill only genuinely missing totals.
    if amount == 0.0 && rate > 0.0 {
        amount = if discount_percent > 0.0 {
            quantity * rate * (1.0 - discount_percent / 100.0)
        } else {
            quantity * rate
        };
    }

    // Phantom discount: the declared percentage could not have produced the
    // final amount, so it was most likely a tax rate misread as a discount.
    // Runs against the post-backfill amount.
    if amount > 0.0 && rate > 0.0 && discount_percent > 0.0 {
        let expected = quantity * rate;
        if (expected - amount).abs() < config.discount_tolerance {
            debug!(
                "Removed phantom {}% discount on '{}': printed amount {} matches {} x {}",
                discount_percent, name, amount, quantity, rate
            );
            discount_percent = 0.0;
        }
    }

    if is_charge(&name, &config.charge_keywords) {
        debug!("'{}' classified as a service charge", name);
        return ClassifiedLine::Service(Charge {
            name,
            amount,
            quantity: None,
            rate: None,
        });
    }

    ClassifiedLine::Product(LineItem {
        name,
        quantity,
        rate,
        discount_percent,
        amount,
    })
}

fn resolve_charge(raw: &RawCharge) -> Option<Charge> {
    let name = raw.name.as_deref().map(str::trim)?;
    let amount = raw.amount.unwrap_or(0.0);
    if name.is_empty() || amount <= 0.0 {
        return None;
    }

    Some(Charge {
        name: name.to_string(),
        amount,
        quantity: raw.quantity,
        rate: raw.rate,
    })
}

/// Assembles an extraction collaborator's raw bill into an immutable
/// `BillRecord`: every raw line entry is classified, extracted charges with
/// a name and a positive amount are carried over, and the total tax is the
/// sum of whichever GST components were printed.
pub fn classify_bill(raw: &RawBill, config: &AnalyzerConfig) -> BillRecord {
    let mut line_items = Vec::new();
    let mut charges = Vec::new();

    for item in &raw.line_items {
        match classify_line(item, config) {
            ClassifiedLine::Product(product) => line_items.push(product),
            ClassifiedLine::Service(service) => charges.push(service),
        }
    }

    charges.extend(raw.additional_charges.iter().filter_map(resolve_charge));

    let tax = raw.cgst.unwrap_or(0.0) + raw.sgst.unwrap_or(0.0) + raw.igst.unwrap_or(0.0);

    BillRecord {
        bill_number: raw.invoice_number.clone(),
        date: raw.date.clone(),
        party_name: raw.vendor_name.clone(),
        line_items,
        charges,
        subtotal: raw.subtotal,
        cgst: raw.cgst,
        sgst: raw.sgst,
        igst: raw.igst,
        tax,
        total: raw.total,
    }
}

/// Auto-detects whether raw document text reads as a sales or a purchase
/// bill, by keyword majority. Ties are `Unknown`.
pub fn detect_bill_type(text: &str) -> BillType {
    let text_lower = text.to_lowercase();

    let sales_score = SALES_KEYWORDS
        .iter()
        .filter(|kw| text_lower.contains(*kw))
        .count();
    let purchase_score = PURCHASE_KEYWORDS
        .iter()
        .filter(|kw| text_lower.contains(*kw))
        .count();

    if sales_score > purchase_score {
        BillType::Sales
    } else if purchase_score > sales_score {
        BillType::Purchase
    } else {
        BillType::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(line: ClassifiedLine) -> LineItem {
        match line {
            ClassifiedLine::Product(item) => item,
            ClassifiedLine::Service(charge) => panic!("expected product, got charge {:?}", charge),
        }
    }

    fn raw_item(name: &str, qty: f64, rate: f64, discount: f64, amount: f64) -> RawLineItem {
        RawLineItem {
            name: Some(name.to_string()),
            quantity: Some(qty),
            rate: Some(rate),
            discount_percent: Some(discount),
            amount: Some(amount),
        }
    }

    #[test]
    fn test_amount_backfill_without_discount() {
        let item = product(classify_line(
            &raw_item("Steel bottle 750ml", 10.0, 25.0, 0.0, 0.0),
            &AnalyzerConfig::default(),
        ));
        assert_eq!(item.amount, 250.0);
    }

    #[test]
    fn test_amount_backfill_applies_declared_discount() {
        let item = product(classify_line(
            &raw_item("Steel bottle 750ml", 10.0, 25.0, 50.0, 0.0),
            &AnalyzerConfig::default(),
        ));
        assert_eq!(item.amount, 125.0);
        // The backfilled amount reflects the discount, so it is not phantom.
        assert_eq!(item.discount_percent, 50.0);
    }

    #[test]
    fn test_printed_amount_trusted_over_recomputation() {
        // 200 x 24 with a genuine 50% discount printed as 2400.
        let item = product(classify_line(
            &raw_item("TROPHY - 646", 200.0, 24.0, 50.0, 2400.0),
            &AnalyzerConfig::default(),
        ));
        assert_eq!(item.amount, 2400.0);
        assert_eq!(item.discount_percent, 50.0);
    }

    #[test]
    fn test_phantom_discount_is_zeroed() {
        // Printed amount equals qty x rate exactly, so the 18% "discount"
        // is a misread GST rate.
        let item = product(classify_line(
            &raw_item("TROPHY - 646", 50.0, 10.0, 18.0, 500.0),
            &AnalyzerConfig::default(),
        ));
        assert_eq!(item.discount_percent, 0.0);
        assert_eq!(item.amount, 500.0);
    }

    #[test]
    fn test_phantom_correction_respects_tolerance() {
        // 499.5 is within 1.0 of 500 -> phantom. 490 is not -> kept.
        let config = AnalyzerConfig::default();
        let near = product(classify_line(&raw_item("Item", 50.0, 10.0, 18.0, 499.5), &config));
        assert_eq!(near.discount_percent, 0.0);

        let far = product(classify_line(&raw_item("Item", 50.0, 10.0, 2.0, 490.0), &config));
        assert_eq!(far.discount_percent, 2.0);
    }

    #[test]
    fn test_charge_keyword_routes_to_service() {
        let line = classify_line(
            &raw_item("Packing Charges", 1.0, 200.0, 0.0, 200.0),
            &AnalyzerConfig::default(),
        );
        match line {
            ClassifiedLine::Service(charge) => {
                assert_eq!(charge.name, "Packing Charges");
                assert_eq!(charge.amount, 200.0);
                assert_eq!(charge.quantity, None);
                assert_eq!(charge.rate, None);
            }
            ClassifiedLine::Product(item) => panic!("expected charge, got product {:?}", item),
        }
    }

    #[test]
    fn test_charge_detection_is_case_insensitive() {
        let config = AnalyzerConfig::default();
        for name in ["FREIGHT", "P&F Charges", "Courier fee", "Transportation"] {
            let line = classify_line(&raw_item(name, 1.0, 0.0, 0.0, 100.0), &config);
            assert!(
                matches!(line, ClassifiedLine::Service(_)),
                "'{}' should classify as a charge",
                name
            );
        }
    }

    #[test]
    fn test_blank_name_defaults_to_unknown_item() {
        let config = AnalyzerConfig::default();
        let missing = product(classify_line(&RawLineItem::default(), &config));
        assert_eq!(missing.name, UNKNOWN_ITEM);

        let blank = product(classify_line(
            &RawLineItem {
                name: Some("   ".to_string()),
                ..RawLineItem::default()
            },
            &config,
        ));
        assert_eq!(blank.name, UNKNOWN_ITEM);
    }

    #[test]
    fn test_negative_values_pass_through() {
        let item = product(classify_line(
            &raw_item("Broken Item", -5.0, -10.0, 0.0, 100.0),
            &AnalyzerConfig::default(),
        ));
        assert_eq!(item.quantity, -5.0);
        assert_eq!(item.rate, -10.0);
    }

    #[test]
    fn test_classify_bill_assembles_record() {
        let raw = RawBill {
            invoice_number: Some("65/25-26".to_string()),
            date: Some("8-Apr-25".to_string()),
            vendor_name: Some("Sharma Traders".to_string()),
            line_items: vec![
                raw_item("TROPHY - 646", 200.0, 24.0, 0.0, 4800.0),
                raw_item("Packing Charges", 1.0, 200.0, 0.0, 200.0),
            ],
            additional_charges: vec![
                RawCharge {
                    name: Some("Freight".to_string()),
                    amount: Some(150.0),
                    quantity: Some(1.0),
                    rate: Some(150.0),
                },
                // Dropped: no amount.
                RawCharge {
                    name: Some("Handling".to_string()),
                    ..RawCharge::default()
                },
            ],
            subtotal: Some(5000.0),
            cgst: Some(450.0),
            sgst: Some(450.0),
            igst: None,
            total: Some(5900.0),
        };

        let bill = classify_bill(&raw, &AnalyzerConfig::default());
        assert_eq!(bill.bill_number.as_deref(), Some("65/25-26"));
        assert_eq!(bill.line_items.len(), 1);
        assert_eq!(bill.line_items[0].name, "TROPHY - 646");
        // "Packing Charges" reclassified plus the explicit freight charge.
        assert_eq!(bill.charges.len(), 2);
        assert_eq!(bill.tax, 900.0);
    }

    #[test]
    fn test_detect_bill_type() {
        assert_eq!(
            detect_bill_type("TAX INVOICE\nSold to: Retail Mart\nBuyer GSTIN ..."),
            BillType::Sales
        );
        assert_eq!(
            detect_bill_type("PURCHASE ORDER\nSupplier: Acme Wholesale\nPO Number 42"),
            BillType::Purchase
        );
        assert_eq!(detect_bill_type("no billing words here"), BillType::Unknown);
    }
}
