use std::cmp::Ordering;

use indexmap::IndexMap;
use log::debug;

use crate::classify::UNKNOWN_ITEM;
use crate::dates;
use crate::schema::{
    AnalyzerConfig, BillRecord, InventoryAnalysis, InventoryItem, StockStatus,
};

/// Stateless reconciliation engine. One `analyze` call folds one batch of
/// classified bills to completion; nothing is shared between calls.
pub struct InventoryAnalyzer {
    config: AnalyzerConfig,
}

impl Default for InventoryAnalyzer {
    fn default() -> Self {
        Self::new(AnalyzerConfig::default())
    }
}

/// Aggregation key: case-folded, whitespace-collapsed item name. Names that
/// differ in wording stay distinct items; there is no fuzzy matching.
pub fn normalize_item_name(name: &str) -> String {
    let collapsed = name
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");

    if collapsed.is_empty() {
        UNKNOWN_ITEM.to_string()
    } else {
        collapsed
    }
}

impl InventoryAnalyzer {
    /// The configuration is taken as given here; the crate facade validates
    /// integrity before constructing an analyzer.
    pub fn new(config: AnalyzerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Reconciles the purchase set against the sales set.
    ///
    /// Bills fold into the aggregate in the order supplied. Items are
    /// created on first encounter in either set and finalized only after
    /// every bill is processed. There is no failure path: empty sets,
    /// dateless bills and sales-only items are all valid input.
    pub fn analyze(
        &self,
        purchase_bills: &[BillRecord],
        sales_bills: &[BillRecord],
    ) -> InventoryAnalysis {
        debug!(
            "Reconciling {} purchase bills against {} sales bills",
            purchase_bills.len(),
            sales_bills.len()
        );

        let purchase_date_range = collect_bill_dates(purchase_bills);
        let sales_date_range = collect_bill_dates(sales_bills);
        let date_mismatch_warning =
            dates::validate_ranges(purchase_date_range.as_ref(), sales_date_range.as_ref());

        let mut item_map: IndexMap<String, InventoryItem> = IndexMap::new();
        let mut total_purchase_value = 0.0;
        let mut total_sales_value = 0.0;

        for bill in purchase_bills {
            for line in &bill.line_items {
                let name = normalize_item_name(&line.name);
                let item = item_map
                    .entry(name.clone())
                    .or_insert_with(|| InventoryItem::new(name));

                item.purchased_qty += line.quantity;
                if line.amount > 0.0 {
                    item.purchased_value += line.amount;
                    total_purchase_value += line.amount;
                }
            }
        }

        for bill in sales_bills {
            for line in &bill.line_items {
                let name = normalize_item_name(&line.name);
                let item = item_map
                    .entry(name.clone())
                    .or_insert_with(|| InventoryItem::new(name));

                item.sold_qty += line.quantity;
                if line.amount > 0.0 {
                    item.sold_value += line.amount;
                    total_sales_value += line.amount;
                }
            }
        }

        let mut surplus_items = Vec::new();
        let mut deficit_items = Vec::new();
        let mut low_stock_items = Vec::new();

        for item in item_map.values_mut() {
            item.surplus_deficit = item.purchased_qty - item.sold_qty;

            if item.surplus_deficit > 0.0 {
                if item.surplus_deficit < self.config.low_stock_threshold {
                    item.status = StockStatus::LowStock;
                    low_stock_items.push(item.name.clone());
                } else {
                    item.status = StockStatus::Surplus;
                    surplus_items.push(item.name.clone());
                }
            } else if item.surplus_deficit < 0.0 {
                item.status = StockStatus::Deficit;
                deficit_items.push(item.name.clone());
            } else {
                item.status = StockStatus::Balanced;
            }
        }

        // Stable descending sort keeps first-seen order on equal quantities.
        let mut ranked: Vec<&InventoryItem> = item_map.values().collect();
        ranked.sort_by(|a, b| {
            b.sold_qty
                .partial_cmp(&a.sold_qty)
                .unwrap_or(Ordering::Equal)
        });
        let top_selling_items: Vec<String> = ranked
            .iter()
            .take(self.config.top_seller_count)
            .map(|item| item.name.clone())
            .collect();

        let mut analysis = InventoryAnalysis {
            items: item_map.into_values().collect(),
            surplus_items,
            deficit_items,
            low_stock_items,
            top_selling_items,
            insights: Vec::new(),
            purchase_bill_count: purchase_bills.len(),
            sales_bill_count: sales_bills.len(),
            total_purchase_value,
            total_sales_value,
            purchase_date_range,
            sales_date_range,
            date_mismatch_warning,
        };

        analysis.insights = self.generate_insights(&analysis);
        analysis
    }

    /// Rule-based insight lines, in fixed order: CRITICAL, ALERT, GOOD,
    /// TOP, then the unconditional SUMMARY. Callers must not reorder.
    fn generate_insights(&self, analysis: &InventoryAnalysis) -> Vec<String> {
        let mut insights = Vec::new();

        if !analysis.deficit_items.is_empty() {
            insights.push(format!(
                "[CRITICAL] Stock Deficit: {} items have been sold more than purchased. \
                 Immediate action needed! See Deficit Items below.",
                analysis.deficit_items.len()
            ));
        }

        if !analysis.low_stock_items.is_empty() {
            insights.push(format!(
                "[ALERT] Low Stock: {} items have less than {} units remaining. \
                 Consider reordering soon!",
                analysis.low_stock_items.len(),
                self.config.low_stock_threshold
            ));
        }

        if !analysis.surplus_items.is_empty() {
            insights.push(format!(
                "[GOOD] Surplus Stock: {} items have healthy excess inventory. \
                 Good stock levels maintained.",
                analysis.surplus_items.len()
            ));
        }

        if !analysis.top_selling_items.is_empty() {
            insights.push(format!(
                "[TOP] Bestsellers: {} top performing items identified. \
                 See Top Selling Items below.",
                analysis.top_selling_items.len()
            ));
        }

        insights.push(format!(
            "[SUMMARY] Analyzed {} purchase bills + {} sales bills = {} unique items tracked.",
            analysis.purchase_bill_count,
            analysis.sales_bill_count,
            analysis.items.len()
        ));

        insights
    }
}

fn collect_bill_dates(bills: &[BillRecord]) -> Option<dates::DateRange> {
    let raw_dates: Vec<&str> = bills.iter().filter_map(|b| b.date.as_deref()).collect();
    dates::collect_range(&raw_dates)
}
