use serde::{Deserialize, Serialize};

use crate::schema::{AnalyzerConfig, BillRecord};

/// Data-quality report for one classified bill. Errors mark the bill
/// invalid; warnings are advisory. Validation never mutates the bill and
/// never blocks analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }
}

impl ValidationResult {
    fn add_error(&mut self, message: String) {
        self.errors.push(message);
        self.is_valid = false;
    }

    fn add_warning(&mut self, message: String) {
        self.warnings.push(message);
    }
}

/// Validates a classified bill: mandatory fields, non-negative quantities
/// and prices, and line math consistency. This is where the classifier's
/// pass-through negatives surface. The printed amount stays authoritative
/// on a math mismatch; the line is only flagged.
pub fn validate_bill(bill: &BillRecord, config: &AnalyzerConfig) -> ValidationResult {
    let mut result = ValidationResult::default();

    validate_mandatory_fields(bill, &mut result);
    validate_line_items(bill, config, &mut result);

    result
}

fn is_blank(field: &Option<String>) -> bool {
    field.as_deref().map_or(true, |s| s.trim().is_empty())
}

fn validate_mandatory_fields(bill: &BillRecord, result: &mut ValidationResult) {
    if is_blank(&bill.bill_number) {
        result.add_warning("Invoice/Bill number is missing".to_string());
    }

    if is_blank(&bill.date) {
        result.add_warning("Document date is missing".to_string());
    }

    if is_blank(&bill.party_name) {
        result.add_warning("Vendor/Supplier name could not be identified".to_string());
    }

    if bill.line_items.is_empty() {
        result.add_error("No line items could be extracted".to_string());
    }
}

fn validate_line_items(bill: &BillRecord, config: &AnalyzerConfig, result: &mut ValidationResult) {
    let mut items_without_prices = 0;

    for (i, item) in bill.line_items.iter().enumerate() {
        let line_no = i + 1;

        if item.name.trim().is_empty() {
            result.add_warning(format!("Line item {}: Item name is empty", line_no));
        }

        if item.quantity < 0.0 {
            result.add_error(format!("Line item {}: Quantity cannot be negative", line_no));
        }

        if item.rate < 0.0 {
            result.add_error(format!("Line item {}: Rate cannot be negative", line_no));
        } else if item.rate == 0.0 {
            items_without_prices += 1;
        }

        if item.amount < 0.0 {
            result.add_error(format!("Line item {}: Amount cannot be negative", line_no));
        }

        if item.quantity != 0.0 && item.rate != 0.0 {
            let computed = item.quantity * item.rate;
            if (computed - item.amount).abs() > config.discount_tolerance {
                result.add_warning(format!(
                    "Line item {}: math mismatch: {} x {} = {}, printed amount is {}",
                    line_no, item.quantity, item.rate, computed, item.amount
                ));
            }
        }
    }

    if items_without_prices > 0 && items_without_prices == bill.line_items.len() {
        result.add_warning("No price data could be extracted from the document".to_string());
    }
}
