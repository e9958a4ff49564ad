//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  In many retail systems:                                                │
//! │    Rs.10.00 / 3 = Rs.3.33 (×3 = Rs.9.99)  → Lost Rs.0.01!               │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Paisa                                            │
//! │    1000 paisa / 3 = 333 paisa (×3 = 999 paisa)                          │
//! │    We KNOW we lost 1 paisa, and handle it explicitly                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use axle_core::money::Money;
//!
//! // Create from paisa (preferred)
//! let price = Money::from_paisa(109_900); // Rs.1,099.00
//!
//! // Arithmetic operations
//! let doubled = price * 2;
//! let total = price + Money::from_paisa(50_000);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in paisa (the smallest PKR unit).
///
/// ## Design Decisions
/// - **i64 (signed)**: Allows negative values for refunds and adjustments
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Derives**: Full serde support for JSON serialization
///
/// Every monetary value in the system flows through this type:
/// product prices, line totals, discounts, order totals, batch unit costs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from paisa (the smallest currency unit).
    ///
    /// ## Why Paisa?
    /// Using the smallest unit eliminates all floating-point concerns.
    /// Storage, calculations, and the API all use paisa. Only the UI
    /// converts to rupees for display.
    #[inline]
    pub const fn from_paisa(paisa: i64) -> Self {
        Money(paisa)
    }

    /// Creates a Money value from whole rupees.
    ///
    /// ## Example
    /// ```rust
    /// use axle_core::money::Money;
    ///
    /// let price = Money::from_rupees(1000); // Rs.1,000.00
    /// assert_eq!(price.paisa(), 100_000);
    /// ```
    #[inline]
    pub const fn from_rupees(rupees: i64) -> Self {
        Money(rupees * 100)
    }

    /// Returns the value in paisa (smallest currency unit).
    #[inline]
    pub const fn paisa(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (rupees) portion.
    #[inline]
    pub const fn rupees(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit (paisa) portion (always 0-99).
    #[inline]
    pub const fn paisa_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use axle_core::money::Money;
    ///
    /// let unit_price = Money::from_paisa(29_900); // Rs.299.00
    /// let line_total = unit_price.multiply_quantity(3);
    /// assert_eq!(line_total.paisa(), 89_700); // Rs.897.00
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Calculates a percentage of this amount, given in basis points.
    ///
    /// ## Why Basis Points?
    /// 1 basis point = 0.01% = 1/10000. 1000 bps = 10%. Integer bps avoid
    /// float percentages entirely.
    ///
    /// ## Rounding
    /// Uses integer math with half-up rounding:
    /// `(amount * bps + 5000) / 10000`. i128 intermediate prevents overflow
    /// on large amounts.
    ///
    /// ## Example
    /// ```rust
    /// use axle_core::money::Money;
    ///
    /// let subtotal = Money::from_paisa(100_000); // Rs.1,000.00
    /// let discount = subtotal.percentage(1000);  // 10%
    /// assert_eq!(discount.paisa(), 10_000);      // Rs.100.00
    /// ```
    pub fn percentage(&self, bps: u32) -> Money {
        let part = (self.0 as i128 * bps as i128 + 5000) / 10000;
        Money::from_paisa(part as i64)
    }

    /// Subtracts `other`, flooring the result at zero.
    ///
    /// Used for order totals: a discount can never push a total negative.
    ///
    /// ## Example
    /// ```rust
    /// use axle_core::money::Money;
    ///
    /// let subtotal = Money::from_paisa(500);
    /// let discount = Money::from_paisa(600);
    /// assert_eq!(subtotal.saturating_sub_floor_zero(discount), Money::zero());
    /// ```
    #[inline]
    pub fn saturating_sub_floor_zero(&self, other: Money) -> Money {
        Money((self.0 - other.0).max(0))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money in a human-readable format.
///
/// ## Note
/// This is for debugging and logs. The UI layer owns localized formatting.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}Rs.{}.{:02}", sign, self.rupees().abs(), self.paisa_part())
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Multiplication by integer (for quantity calculations).
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
