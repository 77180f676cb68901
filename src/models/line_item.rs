//! Line item model
//!
//! A line item is one row of a planned- or actual-expense record. Its value is
//! distributed over expense objects through per-object allocation inputs,
//! which may be entered as a percentage, as quantity x unit price, or as an
//! explicit amount.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::ids::{ExpenseObjectId, LineItemId};
use super::lenient;
use super::money::Money;

/// Raw allocation inputs for one (line item, expense object) pair
///
/// Every field defaults to zero when missing or malformed; a zero field is
/// treated as "not entered".
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AllocationInput {
    /// Share of the line total, in percent
    #[serde(default, deserialize_with = "lenient::number")]
    pub percentage: f64,

    /// Quantity charged to this expense object
    #[serde(default, deserialize_with = "lenient::number")]
    pub quantity: f64,

    /// Unit price for `quantity`
    #[serde(default, alias = "unitPrice", with = "lenient::money")]
    pub unit_price: Money,

    /// Explicit amount
    #[serde(default, with = "lenient::money")]
    pub amount: Money,
}

impl AllocationInput {
    /// Allocate a percentage of the line total
    pub fn percentage(percentage: f64) -> Self {
        Self {
            percentage,
            ..Self::default()
        }
    }

    /// Allocate `quantity` units at `unit_price`
    pub fn quantity_price(quantity: f64, unit_price: Money) -> Self {
        Self {
            quantity,
            unit_price,
            ..Self::default()
        }
    }

    /// Allocate an explicit amount
    pub fn amount(amount: Money) -> Self {
        Self {
            amount,
            ..Self::default()
        }
    }

    /// Whether nothing was entered
    pub fn is_empty(&self) -> bool {
        self.percentage == 0.0
            && self.quantity == 0.0
            && self.unit_price.is_zero()
            && self.amount.is_zero()
    }
}

/// One priced row of an expense record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Row identifier (generated when the record has none)
    #[serde(default)]
    pub id: LineItemId,

    /// Product or service name
    #[serde(alias = "productName")]
    pub product_name: String,

    /// Free-text description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Price per unit
    #[serde(default, alias = "unitPrice", with = "lenient::money")]
    pub unit_price: Money,

    /// Number of units
    #[serde(default, deserialize_with = "lenient::number")]
    pub quantity: f64,

    /// Unit of measure (e.g. "kg", "pcs")
    #[serde(default)]
    pub unit: String,

    /// Total value of the row as recorded
    #[serde(default, alias = "lineTotal", with = "lenient::money")]
    pub line_total: Money,

    /// Allocation inputs keyed by expense object
    #[serde(default)]
    pub allocations: BTreeMap<ExpenseObjectId, AllocationInput>,
}

impl LineItem {
    /// Create a line item with a recorded total and no allocations
    pub fn new(product_name: impl Into<String>, line_total: Money) -> Self {
        Self {
            id: LineItemId::new(),
            product_name: product_name.into(),
            description: None,
            unit_price: Money::zero(),
            quantity: 0.0,
            unit: String::new(),
            line_total,
            allocations: BTreeMap::new(),
        }
    }

    /// Set unit price, quantity and unit of measure
    pub fn with_pricing(mut self, unit_price: Money, quantity: f64, unit: impl Into<String>) -> Self {
        self.unit_price = unit_price;
        self.quantity = quantity;
        self.unit = unit.into();
        self
    }

    /// Add or replace the allocation input for `expense_object_id`
    pub fn allocate(
        mut self,
        expense_object_id: impl Into<ExpenseObjectId>,
        input: AllocationInput,
    ) -> Self {
        self.allocations.insert(expense_object_id.into(), input);
        self
    }
}
