use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::classify::DEFAULT_CHARGE_KEYWORDS;
use crate::dates::DateRange;

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct RawLineItem {
    #[serde(alias = "item_name")]
    #[schemars(
        description = "Full product name/description, verbatim, including model numbers, codes and sizes. Null if the extractor could not read it."
    )]
    pub name: Option<String>,

    #[schemars(description = "Number of units. May be fractional. Defaults to 1 when absent.")]
    pub quantity: Option<f64>,

    #[schemars(description = "Price per unit. Defaults to 0 when not printed on the bill.")]
    pub rate: Option<f64>,

    #[schemars(
        description = "Discount percentage on this line (e.g. 50 for 50%). Only present when the bill explicitly marks a discount. GST rates (5%, 12%, 18%, 28%) are NOT discounts."
    )]
    pub discount_percent: Option<f64>,

    #[schemars(
        description = "Total line amount AFTER any discount, exactly as printed. The printed amount is authoritative; it is never recomputed when present."
    )]
    pub amount: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct RawCharge {
    #[serde(alias = "charge_name")]
    #[schemars(description = "Name of the charge (e.g. 'Packing Charges', 'Freight').")]
    pub name: Option<String>,

    #[schemars(description = "Charge amount.")]
    pub amount: Option<f64>,

    #[schemars(description = "Quantity if the charge is itemized (e.g. '1.00 NOS').")]
    pub quantity: Option<f64>,

    #[schemars(description = "Rate if the charge is itemized.")]
    pub rate: Option<f64>,
}

/// The extraction collaborator's per-document output. Every field is
/// optional: absence means "unknown", never zero.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct RawBill {
    #[schemars(
        description = "Invoice or bill reference number, preserving special characters (e.g. '65/25-26')."
    )]
    pub invoice_number: Option<String>,

    #[schemars(description = "Document date string exactly as printed, any format.")]
    pub date: Option<String>,

    #[schemars(description = "Vendor, supplier or customer name.")]
    pub vendor_name: Option<String>,

    #[serde(default)]
    #[schemars(description = "Actual products with a meaningful quantity. Inventory items only.")]
    pub line_items: Vec<RawLineItem>,

    #[serde(default)]
    #[schemars(
        description = "Service charges, fees or extras (packing, freight, etc). These are not inventory."
    )]
    pub additional_charges: Vec<RawCharge>,

    #[schemars(description = "Sum of line item amounts before tax.")]
    pub subtotal: Option<f64>,

    #[schemars(description = "Central GST amount, only when the amount is printed.")]
    pub cgst: Option<f64>,

    #[schemars(description = "State GST amount, only when the amount is printed.")]
    pub sgst: Option<f64>,

    #[schemars(description = "Integrated GST amount (inter-state bills).")]
    pub igst: Option<f64>,

    #[schemars(description = "Final printed total. Trusted over any recomputed sum.")]
    pub total: Option<f64>,
}

impl RawBill {
    pub fn generate_json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(RawBill)
    }

    pub fn schema_as_json() -> Result<String, serde_json::Error> {
        let schema = Self::generate_json_schema();
        serde_json::to_string_pretty(&schema)
    }
}

/// A classified product line. `discount_percent` and `amount` are the
/// corrected figures, not necessarily what the extractor reported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub name: String,
    pub quantity: f64,
    pub rate: f64,
    pub discount_percent: f64,
    pub amount: f64,
}

/// A non-stock service line. Never contributes to stock quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Charge {
    pub name: String,
    pub amount: f64,
    pub quantity: Option<f64>,
    pub rate: Option<f64>,
}

/// One parsed document, immutable once built by `classify_bill`.
/// Whether it is a purchase or a sales bill is decided by which slice it
/// is passed in to `analyze`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillRecord {
    pub bill_number: Option<String>,
    /// Raw date string, pre-normalization.
    pub date: Option<String>,
    pub party_name: Option<String>,
    pub line_items: Vec<LineItem>,
    pub charges: Vec<Charge>,
    pub subtotal: Option<f64>,
    pub cgst: Option<f64>,
    pub sgst: Option<f64>,
    pub igst: Option<f64>,
    /// Sum of the GST components that were present.
    pub tax: f64,
    pub total: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillType {
    Sales,
    Purchase,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    /// More purchased than sold.
    Surplus,
    /// More sold than purchased.
    Deficit,
    /// Equal purchase and sale.
    Balanced,
    /// Surplus, but below the low-stock threshold.
    LowStock,
}

/// Aggregated stock position for a single item. The name is the
/// normalized identity: case-folded, whitespace-collapsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub name: String,
    pub purchased_qty: f64,
    pub sold_qty: f64,
    pub purchased_value: f64,
    pub sold_value: f64,
    pub surplus_deficit: f64,
    pub status: StockStatus,
}

impl InventoryItem {
    pub(crate) fn new(name: String) -> Self {
        Self {
            name,
            purchased_qty: 0.0,
            sold_qty: 0.0,
            purchased_value: 0.0,
            sold_value: 0.0,
            surplus_deficit: 0.0,
            status: StockStatus::Balanced,
        }
    }
}

/// Complete reconciliation result. Constructed once, never mutated after
/// return; every list is already sorted/filtered, so consumers only format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryAnalysis {
    /// All items, in first-seen order.
    pub items: Vec<InventoryItem>,
    pub surplus_items: Vec<String>,
    pub deficit_items: Vec<String>,
    pub low_stock_items: Vec<String>,
    /// Top sellers by descending sold quantity, ties first-seen-first.
    pub top_selling_items: Vec<String>,
    pub insights: Vec<String>,
    pub purchase_bill_count: usize,
    pub sales_bill_count: usize,
    pub total_purchase_value: f64,
    pub total_sales_value: f64,
    pub purchase_date_range: Option<DateRange>,
    pub sales_date_range: Option<DateRange>,
    /// None when both ranges align or either set has no parsable dates.
    pub date_mismatch_warning: Option<String>,
}

/// Tunable constants for classification and aggregation. The defaults are
/// the behavior of the production heuristics; tests inject boundary values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// A positive surplus below this many units is flagged as low stock.
    #[serde(default = "default_low_stock_threshold")]
    pub low_stock_threshold: f64,

    /// Absolute currency tolerance when deciding whether a declared
    /// discount actually affected the printed amount.
    #[serde(default = "default_discount_tolerance")]
    pub discount_tolerance: f64,

    /// How many names to report as top sellers.
    #[serde(default = "default_top_seller_count")]
    pub top_seller_count: usize,

    /// Case-insensitive substrings that mark a line as a service charge.
    #[serde(default = "default_charge_keywords")]
    pub charge_keywords: Vec<String>,
}

fn default_low_stock_threshold() -> f64 {
    10.0
}

fn default_discount_tolerance() -> f64 {
    1.0
}

fn default_top_seller_count() -> usize {
    5
}

fn default_charge_keywords() -> Vec<String> {
    DEFAULT_CHARGE_KEYWORDS
        .iter()
        .map(|kw| kw.to_string())
        .collect()
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            low_stock_threshold: default_low_stock_threshold(),
            discount_tolerance: default_discount_tolerance(),
            top_seller_count: default_top_seller_count(),
            charge_keywords: default_charge_keywords(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_generation() {
        let schema_json = RawBill::schema_as_json().unwrap();
        assert!(schema_json.contains("invoice_number"));
        assert!(schema_json.contains("line_items"));
        assert!(schema_json.contains("additional_charges"));
    }

    #[test]
    fn test_raw_bill_deserializes_extractor_field_names() {
        let json = r#"{
            "invoice_number": "65/25-26",
            "date": "08/04/2025",
            "vendor_name": "Sharma Traders",
            "line_items": [
                {"item_name": "TROPHY - 646", "quantity": 200, "rate": 24, "amount": 4800}
            ],
            "additional_charges": [
                {"charge_name": "Packing Charges", "amount": 200}
            ],
            "igst": 879.0,
            "total": 5879.0
        }"#;

        let bill: RawBill = serde_json::from_str(json).unwrap();
        assert_eq!(bill.invoice_number.as_deref(), Some("65/25-26"));
        assert_eq!(bill.line_items.len(), 1);
        assert_eq!(bill.line_items[0].name.as_deref(), Some("TROPHY - 646"));
        assert_eq!(bill.additional_charges[0].name.as_deref(), Some("Packing Charges"));
        assert_eq!(bill.subtotal, None);
        assert_eq!(bill.cgst, None);
    }

    #[test]
    fn test_config_defaults() {
        let config = AnalyzerConfig::default();
        assert_eq!(config.low_stock_threshold, 10.0);
        assert_eq!(config.discount_tolerance, 1.0);
        assert_eq!(config.top_seller_count, 5);
        assert!(config.charge_keywords.iter().any(|k| k == "freight"));
    }

    #[test]
    fn test_partial_config_deserializes_with_defaults() {
        let config: AnalyzerConfig = serde_json::from_str(r#"{"low_stock_threshold": 0.0}"#).unwrap();
        assert_eq!(config.low_stock_threshold, 0.0);
        assert_eq!(config.top_seller_count, 5);
        assert!(!config.charge_keywords.is_empty());
    }
}
