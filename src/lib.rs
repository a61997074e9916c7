//! # Bill Reconciler
//!
//! A library for reconciling loosely-structured financial documents
//! (purchase and sales bills, already reduced to raw extracted records by
//! an AI extraction service) into a single inventory ledger.
//!
//! ## Core Concepts
//!
//! - **Raw records**: per-document output of the extraction collaborator,
//!   with every field optional ("unknown" is not "zero")
//! - **Classification**: raw line entries are cleaned and split into real
//!   inventory products and non-stock service charges, with extraction
//!   artifacts (phantom discounts, missing totals) repaired
//! - **Reconciliation**: classified bills from both sets are aggregated by
//!   normalized item identity into per-item surplus/deficit positions,
//!   with date-range validation and rule-based insights
//!
//! The whole crate is a pure, stateless, in-memory transformation: no
//! network, no files, no persisted state.
//!
//! ## Example
//!
//! ```rust,ignore
//! use bill_reconciler::*;
//!
//! let config = AnalyzerConfig::default();
//!
//! let purchase_bills: Vec<BillRecord> = purchase_extractions
//!     .iter()
//!     .map(|raw| classify_bill(raw, &config))
//!     .collect();
//! let sales_bills: Vec<BillRecord> = sales_extractions
//!     .iter()
//!     .map(|raw| classify_bill(raw, &config))
//!     .collect();
//!
//! let analysis = analyze_bills(&purchase_bills, &sales_bills);
//! for insight in &analysis.insights {
//!     println!("{insight}");
//! }
//! ```

pub mod analyzer;
pub mod classify;
pub mod dates;
pub mod error;
pub mod repair;
pub mod schema;
pub mod validation;

pub use analyzer::{normalize_item_name, InventoryAnalyzer};
pub use classify::{
    classify_bill, classify_line, detect_bill_type, ClassifiedLine, DEFAULT_CHARGE_KEYWORDS,
    UNKNOWN_ITEM,
};
pub use dates::{collect_range, normalize as normalize_date, validate_ranges, DateRange};
pub use error::{ReconcileError, Result};
pub use repair::repair_numeric_text;
pub use schema::*;
pub use validation::{validate_bill, ValidationResult};

use log::{debug, info};

pub struct BillReconciler;

impl BillReconciler {
    /// Reconciles two classified bill sets with the default configuration.
    /// This path is total: there is no failure mode.
    pub fn analyze(
        purchase_bills: &[BillRecord],
        sales_bills: &[BillRecord],
    ) -> InventoryAnalysis {
        info!(
            "Reconciling {} purchase bills against {} sales bills",
            purchase_bills.len(),
            sales_bills.len()
        );

        InventoryAnalyzer::default().analyze(purchase_bills, sales_bills)
    }

    /// Reconciles with an injected configuration, validating its integrity
    /// first. The only error paths in the crate live here.
    pub fn analyze_with_config(
        purchase_bills: &[BillRecord],
        sales_bills: &[BillRecord],
        config: AnalyzerConfig,
    ) -> Result<InventoryAnalysis> {
        validate_config_integrity(&config)?;

        info!(
            "Reconciling {} purchase bills against {} sales bills \
             (low-stock threshold {})",
            purchase_bills.len(),
            sales_bills.len(),
            config.low_stock_threshold
        );

        let analysis = InventoryAnalyzer::new(config).analyze(purchase_bills, sales_bills);
        debug!(
            "Tracked {} unique items ({} surplus, {} deficit, {} low stock)",
            analysis.items.len(),
            analysis.surplus_items.len(),
            analysis.deficit_items.len(),
            analysis.low_stock_items.len()
        );

        Ok(analysis)
    }
}

pub fn analyze_bills(
    purchase_bills: &[BillRecord],
    sales_bills: &[BillRecord],
) -> InventoryAnalysis {
    BillReconciler::analyze(purchase_bills, sales_bills)
}

pub fn analyze_bills_with_config(
    purchase_bills: &[BillRecord],
    sales_bills: &[BillRecord],
    config: AnalyzerConfig,
) -> Result<InventoryAnalysis> {
    BillReconciler::analyze_with_config(purchase_bills, sales_bills, config)
}

fn validate_config_integrity(config: &AnalyzerConfig) -> Result<()> {
    if !config.low_stock_threshold.is_finite() || config.low_stock_threshold < 0.0 {
        return Err(ReconcileError::InvalidThreshold(config.low_stock_threshold));
    }

    if !config.discount_tolerance.is_finite() || config.discount_tolerance < 0.0 {
        return Err(ReconcileError::InvalidTolerance(config.discount_tolerance));
    }

    if config.charge_keywords.is_empty() {
        return Err(ReconcileError::EmptyChargeKeywords);
    }

    Ok(())
}
