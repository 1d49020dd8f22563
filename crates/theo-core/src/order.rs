//! # Variant Order Builder
//!
//! Manages the multi-variant sales order form: an ordered, mutable set of
//! variant lines against a read-only product catalog, with running totals.
//!
//! ## Order Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                   Order Builder Operations                              │
//! │                                                                         │
//! │  Form Action              Builder Call            State Change          │
//! │  ───────────              ────────────            ────────────          │
//! │                                                                         │
//! │  Add Variant ───────────► add_line() ───────────► lines.push(line)     │
//! │                                                                         │
//! │  Pick Product ──────────► select_product() ─────► line.unit_price = …  │
//! │                                                                         │
//! │  Type Item Numbers ─────► set_item_expression() ► line.expression = …  │
//! │                                                                         │
//! │  Remove Variant ────────► remove_line() ────────► lines.remove(i)      │
//! │                                                                         │
//! │  Read Totals ───────────► totals() ─────────────► (read only)          │
//! │                                                                         │
//! │  NOTE: totals() recomputes from scratch over all current lines on       │
//! │        every call. Nothing is cached across mutations, so removed       │
//! │        lines can never leave a residual contribution.                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All state lives on the builder instance (no ambient counters or view
//! flags), so multiple builders can coexist and be tested in isolation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::catalog::{Catalog, Product};
use crate::error::{CoreError, CoreResult};
use crate::items::parse_item_count;
use crate::money::Money;

// =============================================================================
// Variant Line
// =============================================================================

/// One row in a sales order.
///
/// ## Design Notes
/// - `id`: sequence number allocated by the builder, monotonic, never reused
/// - `unit_price` and the size/color annotations are frozen copies taken
///   from the catalog when the product is selected, so the form displays
///   consistent data even if the host swaps the catalog later
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct VariantLine {
    /// Sequence id within the builder.
    pub id: u64,

    /// Selected product id, if any.
    pub product_id: Option<String>,

    /// Unit price copied from the catalog entry.
    pub unit_price: Money,

    /// Product's default size (annotation shown next to the override picker).
    pub product_size: Option<String>,

    /// Product's default color.
    pub product_color: Option<String>,

    /// Per-line size override; `None` means "use product size".
    pub size_override: Option<String>,

    /// Per-line color override; `None` means "use product color".
    pub color_override: Option<String>,

    /// Free-form item expression, e.g. `"40"` or `"1-5,10"`.
    pub item_expression: String,

    /// When this line was added to the order.
    #[ts(as = "String")]
    pub added_at: DateTime<Utc>,
}

impl VariantLine {
    fn new(id: u64) -> Self {
        VariantLine {
            id,
            product_id: None,
            unit_price: Money::zero(),
            product_size: None,
            product_color: None,
            size_override: None,
            color_override: None,
            item_expression: String::new(),
            added_at: Utc::now(),
        }
    }

    /// Item count parsed from the current expression.
    pub fn item_count(&self) -> u64 {
        parse_item_count(&self.item_expression)
    }

    /// Line total: current unit price × current parse of the expression.
    ///
    /// Derived on demand, never stored, so it can never go stale.
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply_count(self.item_count())
    }

    /// The size this line sells: the override, or the product default.
    pub fn effective_size(&self) -> Option<&str> {
        self.size_override.as_deref().or(self.product_size.as_deref())
    }

    /// The color this line sells: the override, or the product default.
    pub fn effective_color(&self) -> Option<&str> {
        self.color_override.as_deref().or(self.product_color.as_deref())
    }
}

// =============================================================================
// Order Totals
// =============================================================================

/// Aggregate totals over all current lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderTotals {
    /// Σ item counts across lines.
    pub total_items: u64,

    /// Σ line totals (before delivery).
    pub product_total: Money,

    /// Externally supplied delivery charge.
    pub delivery_charge: Money,

    /// `product_total + delivery_charge`.
    pub grand_total: Money,
}

// =============================================================================
// View Mode
// =============================================================================

/// Presentation mode for the variant form.
///
/// Purely presentational: switching modes never alters the underlying
/// line data or totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// Original single-table layout.
    Classic,
    /// Card-per-variant layout with its own product search.
    Enhanced,
}

// =============================================================================
// Order Builder
// =============================================================================

/// Builds a multi-variant sales order against a read-only catalog.
///
/// ## Invariants
/// - Line ids are monotonic and never reused within a builder
/// - `totals()` always equals a from-scratch recomputation over current lines
/// - The catalog is never mutated
#[derive(Debug, Clone)]
pub struct OrderBuilder {
    /// Read-only product data supplied by the host.
    catalog: Catalog,

    /// Current lines, in insertion order.
    lines: Vec<VariantLine>,

    /// Next line id to allocate.
    next_line_id: u64,

    /// Delivery charge added on top of the product total.
    delivery_charge: Money,

    /// Current presentation mode.
    view: ViewMode,

    /// Product search text for the enhanced view.
    enhanced_filter: String,

    /// Product search text for the classic table.
    classic_filter: String,
}

impl OrderBuilder {
    /// Creates a builder over the given catalog.
    ///
    /// Starts in the enhanced view with no lines; the first `add_line`
    /// clears the empty-state notice the host shows.
    pub fn new(catalog: Catalog) -> Self {
        OrderBuilder {
            catalog,
            lines: Vec::new(),
            next_line_id: 0,
            delivery_charge: Money::zero(),
            view: ViewMode::Enhanced,
            enhanced_filter: String::new(),
            classic_filter: String::new(),
        }
    }

    // -------------------------------------------------------------------------
    // Line mutation
    // -------------------------------------------------------------------------

    /// Adds a new empty line and returns its id.
    pub fn add_line(&mut self) -> u64 {
        self.next_line_id += 1;
        let id = self.next_line_id;
        self.lines.push(VariantLine::new(id));
        id
    }

    /// Removes the line with the given id.
    ///
    /// When the last line is removed the builder is empty again and the
    /// host restores its empty-state notice (driven by [`is_empty`]).
    ///
    /// [`is_empty`]: OrderBuilder::is_empty
    pub fn remove_line(&mut self, id: u64) -> CoreResult<()> {
        let index = self
            .lines
            .iter()
            .position(|line| line.id == id)
            .ok_or(CoreError::LineNotFound(id))?;
        self.lines.remove(index);
        Ok(())
    }

    /// Selects a product for a line, copying its price and default
    /// size/color annotations from the catalog.
    pub fn select_product(&mut self, line_id: u64, product_id: &str) -> CoreResult<()> {
        let product = self
            .catalog
            .product(product_id)
            .ok_or_else(|| CoreError::ProductNotFound(product_id.to_string()))?
            .clone();

        let line = self.line_mut(line_id)?;
        line.product_id = Some(product.id);
        line.unit_price = product.price;
        line.product_size = Some(product.size);
        line.product_color = Some(product.color);
        Ok(())
    }

    /// Stores the raw item expression for a line.
    ///
    /// The count and line total are derived from it on every read, so this
    /// is the whole recomputation.
    pub fn set_item_expression(&mut self, line_id: u64, text: &str) -> CoreResult<()> {
        self.line_mut(line_id)?.item_expression = text.to_string();
        Ok(())
    }

    /// Sets or clears the per-line size override.
    pub fn set_size_override(&mut self, line_id: u64, size: Option<String>) -> CoreResult<()> {
        self.line_mut(line_id)?.size_override = size;
        Ok(())
    }

    /// Sets or clears the per-line color override.
    pub fn set_color_override(&mut self, line_id: u64, color: Option<String>) -> CoreResult<()> {
        self.line_mut(line_id)?.color_override = color;
        Ok(())
    }

    /// Sets the delivery charge added to the grand total.
    pub fn set_delivery_charge(&mut self, amount: Money) {
        self.delivery_charge = amount;
    }

    // -------------------------------------------------------------------------
    // Reads
    // -------------------------------------------------------------------------

    /// Current lines in insertion order.
    pub fn lines(&self) -> &[VariantLine] {
        &self.lines
    }

    /// Looks up a line by id.
    pub fn line(&self, id: u64) -> Option<&VariantLine> {
        self.lines.iter().find(|line| line.id == id)
    }

    /// True when no lines remain (the host shows its empty-state notice).
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The catalog this builder was initialized with.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Current delivery charge.
    pub fn delivery_charge(&self) -> Money {
        self.delivery_charge
    }

    /// Recomputes aggregate totals from scratch over all current lines.
    ///
    /// Both sums saturate, like the per-line counts they are built from.
    pub fn totals(&self) -> OrderTotals {
        let total_items = self
            .lines
            .iter()
            .map(VariantLine::item_count)
            .fold(0u64, u64::saturating_add);
        let product_total = self
            .lines
            .iter()
            .map(VariantLine::line_total)
            .fold(Money::zero(), Money::saturating_add);

        OrderTotals {
            total_items,
            product_total,
            delivery_charge: self.delivery_charge,
            grand_total: product_total.saturating_add(self.delivery_charge),
        }
    }

    // -------------------------------------------------------------------------
    // View mode
    // -------------------------------------------------------------------------

    /// Current presentation mode.
    pub fn view(&self) -> ViewMode {
        self.view
    }

    /// Switches presentation mode.
    ///
    /// Entering the enhanced view with zero lines auto-creates one empty
    /// line; each switch clears the other view's search filter. Line data
    /// and totals are never touched.
    pub fn set_view(&mut self, view: ViewMode) {
        self.view = view;
        match view {
            ViewMode::Enhanced => {
                if self.lines.is_empty() {
                    self.add_line();
                }
                self.classic_filter.clear();
            }
            ViewMode::Classic => {
                self.enhanced_filter.clear();
            }
        }
    }

    /// Flips between classic and enhanced views.
    pub fn toggle_view(&mut self) {
        let next = match self.view {
            ViewMode::Classic => ViewMode::Enhanced,
            ViewMode::Enhanced => ViewMode::Classic,
        };
        self.set_view(next);
    }

    /// Sets the enhanced-view product search text.
    pub fn set_enhanced_filter(&mut self, text: &str) {
        self.enhanced_filter = text.to_string();
    }

    /// Current enhanced-view product search text.
    pub fn enhanced_filter(&self) -> &str {
        &self.enhanced_filter
    }

    /// Sets the classic-table product search text.
    pub fn set_classic_filter(&mut self, text: &str) {
        self.classic_filter = text.to_string();
    }

    /// Current classic-table product search text.
    pub fn classic_filter(&self) -> &str {
        &self.classic_filter
    }

    /// Catalog products matching the enhanced filter (case-insensitive on
    /// name and category). Empty filter matches everything.
    pub fn filtered_products(&self) -> Vec<&Product> {
        let needle = self.enhanced_filter.trim().to_lowercase();
        self.catalog
            .products
            .iter()
            .filter(|p| {
                needle.is_empty()
                    || p.name.to_lowercase().contains(&needle)
                    || p.category.to_lowercase().contains(&needle)
            })
            .collect()
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    fn line_mut(&mut self, id: u64) -> CoreResult<&mut VariantLine> {
        self.lines
            .iter_mut()
            .find(|line| line.id == id)
            .ok_or(CoreError::LineNotFound(id))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ColorOption, SizeOption};

    fn catalog() -> Catalog {
        Catalog::new(
            vec![
                Product {
                    id: "p1".to_string(),
                    name: "Classic Panjabi".to_string(),
                    category: "Panjabi".to_string(),
                    price: Money::from_minor(125000),
                    size: "L".to_string(),
                    color: "White".to_string(),
                },
                Product {
                    id: "p2".to_string(),
                    name: "Silk Saree".to_string(),
                    category: "Saree".to_string(),
                    price: Money::from_minor(450000),
                    size: "Free".to_string(),
                    color: "Red".to_string(),
                },
            ],
            vec![SizeOption { name: "M".to_string() }, SizeOption { name: "L".to_string() }],
            vec![ColorOption { name: "Navy".to_string() }],
        )
    }

    #[test]
    fn test_line_ids_monotonic_never_reused() {
        let mut builder = OrderBuilder::new(catalog());
        let a = builder.add_line();
        let b = builder.add_line();
        assert!(b > a);

        builder.remove_line(b).unwrap();
        let c = builder.add_line();
        assert!(c > b, "removed ids must not be reused");
    }

    #[test]
    fn test_select_product_copies_price_and_defaults() {
        let mut builder = OrderBuilder::new(catalog());
        let id = builder.add_line();
        builder.select_product(id, "p1").unwrap();

        let line = builder.line(id).unwrap();
        assert_eq!(line.unit_price, Money::from_minor(125000));
        assert_eq!(line.effective_size(), Some("L"));
        assert_eq!(line.effective_color(), Some("White"));
    }

    #[test]
    fn test_overrides_win_over_product_defaults() {
        let mut builder = OrderBuilder::new(catalog());
        let id = builder.add_line();
        builder.select_product(id, "p1").unwrap();
        builder.set_size_override(id, Some("M".to_string())).unwrap();

        let line = builder.line(id).unwrap();
        assert_eq!(line.effective_size(), Some("M"));
        assert_eq!(line.effective_color(), Some("White"));
    }

    #[test]
    fn test_unknown_ids_are_errors() {
        let mut builder = OrderBuilder::new(catalog());
        assert!(matches!(
            builder.remove_line(99),
            Err(CoreError::LineNotFound(99))
        ));

        let id = builder.add_line();
        assert!(matches!(
            builder.select_product(id, "nope"),
            Err(CoreError::ProductNotFound(_))
        ));
    }

    #[test]
    fn test_line_total_tracks_current_inputs() {
        let mut builder = OrderBuilder::new(catalog());
        let id = builder.add_line();
        builder.select_product(id, "p1").unwrap();
        builder.set_item_expression(id, "1-3").unwrap();
        assert_eq!(builder.line(id).unwrap().line_total(), Money::from_minor(375000));

        // Editing either input changes the derived total immediately.
        builder.set_item_expression(id, "2").unwrap();
        assert_eq!(builder.line(id).unwrap().line_total(), Money::from_minor(250000));

        builder.select_product(id, "p2").unwrap();
        assert_eq!(builder.line(id).unwrap().line_total(), Money::from_minor(900000));
    }

    #[test]
    fn test_totals_recomputed_over_current_lines() {
        let mut builder = OrderBuilder::new(catalog());

        let a = builder.add_line();
        builder.select_product(a, "p1").unwrap();
        builder.set_item_expression(a, "1-5").unwrap(); // 5 × ৳1250

        let b = builder.add_line();
        builder.select_product(b, "p2").unwrap();
        builder.set_item_expression(b, "2").unwrap(); // 2 × ৳4500

        let totals = builder.totals();
        assert_eq!(totals.total_items, 7);
        assert_eq!(totals.product_total, Money::from_minor(5 * 125000 + 2 * 450000));

        // Removed lines leave no residual contribution.
        builder.remove_line(a).unwrap();
        let totals = builder.totals();
        assert_eq!(totals.total_items, 2);
        assert_eq!(totals.product_total, Money::from_minor(900000));
    }

    #[test]
    fn test_delivery_charge_only_affects_grand_total() {
        let mut builder = OrderBuilder::new(catalog());
        let id = builder.add_line();
        builder.select_product(id, "p1").unwrap();
        builder.set_item_expression(id, "4").unwrap();

        let before = builder.totals();
        builder.set_delivery_charge(Money::from_minor(10000));
        let after = builder.totals();

        assert_eq!(after.product_total, before.product_total);
        assert_eq!(after.grand_total, after.product_total + Money::from_minor(10000));
    }

    #[test]
    fn test_unparseable_expression_contributes_zero() {
        let mut builder = OrderBuilder::new(catalog());
        let id = builder.add_line();
        builder.select_product(id, "p1").unwrap();
        builder.set_item_expression(id, "abc").unwrap();

        assert_eq!(builder.line(id).unwrap().line_total(), Money::zero());
        assert_eq!(builder.totals().total_items, 0);
    }

    #[test]
    fn test_absurd_expressions_never_panic_totals() {
        let mut builder = OrderBuilder::new(catalog());

        let a = builder.add_line();
        builder.select_product(a, "p1").unwrap();
        builder.set_item_expression(a, "0-18446744073709551615").unwrap();

        let b = builder.add_line();
        builder.select_product(b, "p2").unwrap();
        builder
            .set_item_expression(b, "18446744073709551615,18446744073709551615")
            .unwrap();

        builder.set_delivery_charge(Money::from_minor(10000));

        // Everything caps instead of wrapping or panicking.
        let totals = builder.totals();
        assert_eq!(totals.total_items, u64::MAX);
        assert_eq!(totals.product_total, Money::from_minor(i64::MAX));
        assert_eq!(totals.grand_total, Money::from_minor(i64::MAX));
    }

    #[test]
    fn test_empty_state_round_trip() {
        let mut builder = OrderBuilder::new(catalog());
        assert!(builder.is_empty());

        let id = builder.add_line();
        assert!(!builder.is_empty());

        builder.remove_line(id).unwrap();
        assert!(builder.is_empty());
        assert_eq!(builder.totals().total_items, 0);
        assert_eq!(builder.totals().product_total, Money::zero());
    }

    #[test]
    fn test_enhanced_view_auto_creates_first_line() {
        let mut builder = OrderBuilder::new(catalog());
        builder.set_view(ViewMode::Classic);
        assert!(builder.is_empty());

        builder.toggle_view();
        assert_eq!(builder.view(), ViewMode::Enhanced);
        assert_eq!(builder.lines().len(), 1);

        // Toggling again must not touch line data.
        builder.toggle_view();
        assert_eq!(builder.lines().len(), 1);
    }

    #[test]
    fn test_view_toggle_clears_other_filter() {
        let mut builder = OrderBuilder::new(catalog());
        builder.set_enhanced_filter("saree");
        builder.set_view(ViewMode::Classic);
        assert_eq!(builder.enhanced_filter(), "");

        builder.set_classic_filter("panjabi");
        builder.set_view(ViewMode::Enhanced);
        assert_eq!(builder.classic_filter(), "");
    }

    #[test]
    fn test_view_toggle_preserves_totals() {
        let mut builder = OrderBuilder::new(catalog());
        let id = builder.add_line();
        builder.select_product(id, "p2").unwrap();
        builder.set_item_expression(id, "1,2,3").unwrap();

        let before = builder.totals();
        builder.toggle_view();
        builder.toggle_view();
        assert_eq!(builder.totals(), before);
    }

    #[test]
    fn test_filtered_products() {
        let mut builder = OrderBuilder::new(catalog());
        assert_eq!(builder.filtered_products().len(), 2);

        builder.set_enhanced_filter("saree");
        let matches = builder.filtered_products();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].id, "p2");

        builder.set_enhanced_filter("no such thing");
        assert!(builder.filtered_products().is_empty());
    }
}
