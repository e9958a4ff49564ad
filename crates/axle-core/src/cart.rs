//! # Cart / Pricing Engine
//!
//! A draft transaction (POS or online) before commitment.
//!
//! ## Design
//! The cart is an explicit value object passed into and returned from pure
//! operations. The owning service holds the only mutable reference; nothing
//! here touches the inventory ledger or any other shared state, so cart math
//! can run concurrently and repeatedly without side effects.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Cart Operations                                     │
//! │                                                                         │
//! │  Caller Action             Operation               Cart Change          │
//! │  ─────────────             ─────────               ───────────          │
//! │                                                                         │
//! │  Pick product ───────────► add_line() ───────────► merge or append      │
//! │                                                                         │
//! │  Change quantity ────────► set_line_quantity() ──► update / remove      │
//! │                                                                         │
//! │  Enter discount ─────────► apply_discount() ─────► discount set         │
//! │                                                                         │
//! │  Show totals ────────────► totals() ─────────────► (pure, no change)    │
//! │                                                                         │
//! │  Stock validation here uses the snapshot taken when the line was        │
//! │  added. Sale creation revalidates against live ledger stock and is      │
//! │  authoritative.                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::Product;
use crate::validation::{validate_discount, validate_quantity};

// =============================================================================
// Cart Line
// =============================================================================

/// A line in a draft cart.
///
/// ## Snapshot Pattern
/// `unit_price` and `stock_at_add` are frozen copies of product data at the
/// moment the line was added. The cart keeps displaying (and validating
/// against) consistent data even if the product row changes underneath it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLine {
    /// Product ID (UUID)
    pub product_id: String,

    /// SKU at time of adding (frozen)
    pub sku: String,

    /// Product name at time of adding (frozen)
    pub name: String,

    /// Unit price at time of adding (frozen).
    /// Critical: the price is locked in when added to cart.
    pub unit_price: Money,

    /// Stock level at time of adding (frozen). Used for in-cart validation;
    /// commit-time revalidation against the ledger is authoritative.
    pub stock_at_add: i64,

    /// Quantity in cart (always >= 1).
    pub quantity: i64,

    /// Discount applied to this line.
    pub line_discount: Money,
}

impl CartLine {
    fn from_product(product: &Product, quantity: i64) -> Self {
        CartLine {
            product_id: product.id.clone(),
            sku: product.sku.clone(),
            name: product.name.clone(),
            unit_price: product.selling_price,
            stock_at_add: product.stock_quantity,
            quantity,
            line_discount: Money::zero(),
        }
    }

    /// Line total after the line discount, floored at zero.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price
            .multiply_quantity(self.quantity)
            .saturating_sub_floor_zero(self.line_discount)
    }
}

// =============================================================================
// Discount
// =============================================================================

/// An order-level discount, validated on application and resolved to an
/// amount by [`Cart::totals`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type", content = "value")]
pub enum Discount {
    /// A literal currency amount.
    Fixed(Money),
    /// A percentage of the subtotal, in basis points (1000 = 10%).
    Percentage(u32),
}

// =============================================================================
// Cart
// =============================================================================

/// Totals for a draft cart. Pure snapshot; recomputable at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartTotals {
    /// Σ line totals.
    pub subtotal: Money,
    /// The order discount resolved to an amount (capped at the subtotal).
    pub discount: Money,
    /// `max(0, subtotal - discount)`. Never negative.
    pub total: Money,
}

/// The draft cart.
///
/// ## Invariants
/// - Lines are unique by `product_id` (adding the same product merges)
/// - Quantity is always >= 1 (setting it to zero removes the line)
/// - Quantity never exceeds the product's stock snapshot
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cart {
    /// Lines in the cart.
    pub lines: Vec<CartLine>,

    /// Order-level discount, if one has been applied.
    pub discount: Option<Discount>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart::default()
    }

    /// Adds a product to the cart, merging into an existing line.
    ///
    /// ## Behavior
    /// - Product already in cart: quantity incremented on the existing line
    /// - Otherwise: new line appended with price/stock snapshotted
    ///
    /// ## Errors
    /// `InsufficientStock` when existing + requested quantity exceeds the
    /// product's stock. The cart is unchanged on failure.
    pub fn add_line(&mut self, product: &Product, quantity: i64) -> CoreResult<()> {
        validate_quantity(quantity)?;

        if let Some(line) = self.lines.iter_mut().find(|l| l.product_id == product.id) {
            let requested = line.quantity + quantity;
            if requested > product.stock_quantity {
                return Err(CoreError::InsufficientStock {
                    sku: product.sku.clone(),
                    available: product.stock_quantity,
                    requested,
                });
            }
            line.quantity = requested;
            return Ok(());
        }

        if quantity > product.stock_quantity {
            return Err(CoreError::InsufficientStock {
                sku: product.sku.clone(),
                available: product.stock_quantity,
                requested: quantity,
            });
        }

        self.lines.push(CartLine::from_product(product, quantity));
        Ok(())
    }

    /// Sets the quantity of an existing line.
    ///
    /// ## Behavior
    /// - `quantity <= 0`: removes the line
    /// - Quantity above the stock snapshot: `InsufficientStock`
    /// - Otherwise: updated in place
    pub fn set_line_quantity(&mut self, product_id: &str, quantity: i64) -> CoreResult<()> {
        if quantity <= 0 {
            return self.remove_line(product_id);
        }

        let line = self
            .lines
            .iter_mut()
            .find(|l| l.product_id == product_id)
            .ok_or_else(|| CoreError::LineNotFound(product_id.to_string()))?;

        if quantity > line.stock_at_add {
            return Err(CoreError::InsufficientStock {
                sku: line.sku.clone(),
                available: line.stock_at_add,
                requested: quantity,
            });
        }

        line.quantity = quantity;
        Ok(())
    }

    /// Removes a line from the cart by product ID.
    pub fn remove_line(&mut self, product_id: &str) -> CoreResult<()> {
        let initial_len = self.lines.len();
        self.lines.retain(|l| l.product_id != product_id);

        if self.lines.len() == initial_len {
            Err(CoreError::LineNotFound(product_id.to_string()))
        } else {
            Ok(())
        }
    }

    /// Applies an order-level discount.
    ///
    /// Negative fixed amounts and percentages above 100% are rejected with
    /// `InvalidDiscount`. The resolved amount is clamped by [`Cart::totals`]
    /// so the total never goes negative.
    pub fn apply_discount(&mut self, discount: Discount) -> CoreResult<()> {
        validate_discount(&discount)?;
        self.discount = Some(discount);
        Ok(())
    }

    /// Removes any order-level discount.
    pub fn clear_discount(&mut self) {
        self.discount = None;
    }

    /// Computes `{subtotal, discount, total}` for the cart.
    ///
    /// Pure function: deterministic, no side effects, callable idempotently
    /// at any time before commit.
    pub fn totals(&self) -> CartTotals {
        let subtotal = self
            .lines
            .iter()
            .fold(Money::zero(), |acc, line| acc + line.line_total());

        let raw_discount = match self.discount {
            None => Money::zero(),
            Some(Discount::Fixed(amount)) => amount,
            Some(Discount::Percentage(bps)) => subtotal.percentage(bps),
        };

        // Clamp so the total is floored at zero and the reported discount
        // matches what was actually taken off.
        let total = subtotal.saturating_sub_floor_zero(raw_discount);
        let discount = subtotal - total;

        CartTotals {
            subtotal,
            discount,
            total,
        }
    }

    /// Clears all lines and the discount.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.discount = None;
    }

    /// Returns the number of unique lines in the cart.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Returns the total quantity across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn test_product(id: &str, price_rupees: i64, stock: i64) -> Product {
        Product {
            id: id.to_string(),
            sku: format!("SKU-{}", id),
            name: format!("Product {}", id),
            purchase_price: Money::from_rupees(price_rupees / 2),
            selling_price: Money::from_rupees(price_rupees),
            stock_quantity: stock,
            reorder_level: 2,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_add_line_snapshots_price() {
        let mut cart = Cart::new();
        let product = test_product("1", 500, 10);

        cart.add_line(&product, 2).unwrap();

        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.lines[0].unit_price, Money::from_rupees(500));
        assert_eq!(cart.lines[0].stock_at_add, 10);
        assert_eq!(cart.totals().subtotal, Money::from_rupees(1000));
    }

    #[test]
    fn test_add_same_product_merges() {
        // Stock 10: 3 + 3 merges into one line of 6; a further 5 would
        // need 11 and must fail.
        let mut cart = Cart::new();
        let product = test_product("1", 100, 10);

        cart.add_line(&product, 3).unwrap();
        cart.add_line(&product, 3).unwrap();

        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.lines[0].quantity, 6);

        let err = cart.add_line(&product, 5).unwrap_err();
        match err {
            CoreError::InsufficientStock {
                available,
                requested,
                ..
            } => {
                assert_eq!(available, 10);
                assert_eq!(requested, 11);
            }
            other => panic!("expected InsufficientStock, got {other}"),
        }
        // Cart unchanged on failure.
        assert_eq!(cart.lines[0].quantity, 6);
    }

    #[test]
    fn test_add_rejects_invalid_quantity() {
        let mut cart = Cart::new();
        let product = test_product("1", 100, 10);

        assert!(cart.add_line(&product, 0).is_err());
        assert!(cart.add_line(&product, -3).is_err());
        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_line_quantity() {
        let mut cart = Cart::new();
        let product = test_product("1", 100, 10);
        cart.add_line(&product, 2).unwrap();

        cart.set_line_quantity(&product.id, 8).unwrap();
        assert_eq!(cart.lines[0].quantity, 8);

        // Above the stock snapshot fails.
        assert!(cart.set_line_quantity(&product.id, 11).is_err());
        assert_eq!(cart.lines[0].quantity, 8);

        // Zero (or below) removes the line.
        cart.set_line_quantity(&product.id, 0).unwrap();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_quantity_unknown_product() {
        let mut cart = Cart::new();
        assert!(matches!(
            cart.set_line_quantity("nope", 3),
            Err(CoreError::LineNotFound(_))
        ));
    }

    #[test]
    fn test_totals_without_discount() {
        let mut cart = Cart::new();
        cart.add_line(&test_product("1", 300, 10), 2).unwrap();
        cart.add_line(&test_product("2", 400, 10), 1).unwrap();

        let totals = cart.totals();
        assert_eq!(totals.subtotal, Money::from_rupees(1000));
        assert_eq!(totals.discount, Money::zero());
        // No discount: total == subtotal.
        assert_eq!(totals.total, totals.subtotal);
    }

    #[test]
    fn test_percentage_discount() {
        let mut cart = Cart::new();
        cart.add_line(&test_product("1", 1000, 10), 1).unwrap();

        cart.apply_discount(Discount::Percentage(1000)).unwrap(); // 10%

        let totals = cart.totals();
        assert_eq!(totals.discount, Money::from_rupees(100));
        assert_eq!(totals.total, Money::from_rupees(900));
    }

    #[test]
    fn test_hundred_percent_discount_zeroes_total() {
        let mut cart = Cart::new();
        cart.add_line(&test_product("1", 1000, 10), 1).unwrap();

        cart.apply_discount(Discount::Percentage(10_000)).unwrap();
        assert_eq!(cart.totals().total, Money::zero());
    }

    #[test]
    fn test_fixed_discount_clamped_at_subtotal() {
        let mut cart = Cart::new();
        cart.add_line(&test_product("1", 1000, 10), 1).unwrap();

        let over = Money::from_rupees(1100);
        cart.apply_discount(Discount::Fixed(over)).unwrap();

        let totals = cart.totals();
        assert_eq!(totals.total, Money::zero());
        // Reported discount is what was actually taken off.
        assert_eq!(totals.discount, totals.subtotal);
    }

    #[test]
    fn test_invalid_discounts_rejected() {
        let mut cart = Cart::new();
        cart.add_line(&test_product("1", 1000, 10), 1).unwrap();

        assert!(cart
            .apply_discount(Discount::Fixed(Money::from_paisa(-1)))
            .is_err());
        assert!(cart.apply_discount(Discount::Percentage(10_001)).is_err());
        assert!(cart.discount.is_none());
    }

    #[test]
    fn test_totals_is_idempotent() {
        let mut cart = Cart::new();
        cart.add_line(&test_product("1", 250, 10), 4).unwrap();
        cart.apply_discount(Discount::Percentage(500)).unwrap();

        let first = cart.totals();
        let second = cart.totals();
        assert_eq!(first, second);
    }
}
