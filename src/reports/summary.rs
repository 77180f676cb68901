//! Financial Summary
//!
//! Derives revenue, cost, profit and margin from caller-supplied revenue
//! figures and the rolled-up cost, then classifies the margin into
//! Safe/Warning/Danger bands.
//!
//! Revenue is resolved through an explicit ordered list of sources
//! ([`RevenuePrecedence`]); the first source with a positive value wins.

use serde::{Deserialize, Serialize};
use std::fmt;

use tracing::{debug, warn};

use crate::models::{LineItem, Money};

/// Where a revenue figure comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevenueSource {
    /// Authoritative external total, such as a quote
    QuoteTotal,
    /// Sum of every line item's total
    LineItemSum,
    /// Raw fallback amount supplied by the caller
    RawAmount,
}

impl fmt::Display for RevenueSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::QuoteTotal => write!(f, "quote total"),
            Self::LineItemSum => write!(f, "line item sum"),
            Self::RawAmount => write!(f, "raw amount"),
        }
    }
}

/// Candidate revenue figures, one per source
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevenueInputs {
    pub quote_total: Option<Money>,
    pub line_item_sum: Money,
    pub raw_amount: Option<Money>,
}

impl RevenueInputs {
    /// Collect revenue candidates, summing line totals from `items`
    pub fn from_line_items(
        items: &[LineItem],
        quote_total: Option<Money>,
        raw_amount: Option<Money>,
    ) -> Self {
        Self {
            quote_total,
            line_item_sum: items.iter().map(|item| item.line_total).sum(),
            raw_amount,
        }
    }

    /// The candidate value for `source`, if one was supplied
    pub fn value_of(&self, source: RevenueSource) -> Option<Money> {
        match source {
            RevenueSource::QuoteTotal => self.quote_total,
            RevenueSource::LineItemSum => Some(self.line_item_sum),
            RevenueSource::RawAmount => self.raw_amount,
        }
    }
}

/// Ordered list of revenue sources, highest priority first
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RevenuePrecedence(Vec<RevenueSource>);

impl Default for RevenuePrecedence {
    fn default() -> Self {
        Self(vec![
            RevenueSource::QuoteTotal,
            RevenueSource::LineItemSum,
            RevenueSource::RawAmount,
        ])
    }
}

impl RevenuePrecedence {
    pub fn new(sources: Vec<RevenueSource>) -> Self {
        Self(sources)
    }

    pub fn sources(&self) -> &[RevenueSource] {
        &self.0
    }

    /// First source whose value is present and positive
    pub fn resolve(&self, inputs: &RevenueInputs) -> Option<(RevenueSource, Money)> {
        self.0.iter().find_map(|source| {
            inputs
                .value_of(*source)
                .filter(Money::is_positive)
                .map(|value| (*source, value))
        })
    }
}

/// Three-tier margin status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarginStatus {
    Safe,
    Warning,
    Danger,
}

impl MarginStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Safe => "Safe",
            Self::Warning => "Warning",
            Self::Danger => "Danger",
        }
    }

    /// Neutral color name for renderers
    pub fn color_token(&self) -> &'static str {
        match self {
            Self::Safe => "green",
            Self::Warning => "yellow",
            Self::Danger => "red",
        }
    }
}

impl fmt::Display for MarginStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Lower bounds (inclusive, in percent) of the Safe and Warning bands
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarginThresholds {
    pub safe: f64,
    pub warning: f64,
}

impl Default for MarginThresholds {
    fn default() -> Self {
        Self {
            safe: 30.0,
            warning: 15.0,
        }
    }
}

/// Result of [`classify`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarginClassification {
    pub status: MarginStatus,
    pub label: String,
    pub color_token: String,
}

/// Classify a margin percentage. A NaN margin falls into Danger.
pub fn classify(margin_pct: f64, thresholds: &MarginThresholds) -> MarginClassification {
    let status = if margin_pct >= thresholds.safe {
        MarginStatus::Safe
    } else if margin_pct >= thresholds.warning {
        MarginStatus::Warning
    } else {
        MarginStatus::Danger
    };

    MarginClassification {
        status,
        label: status.label().to_string(),
        color_token: status.color_token().to_string(),
    }
}

/// Margin in percent of revenue; zero when revenue is not positive
pub fn margin_pct(revenue: Money, profit: Money) -> f64 {
    if !revenue.is_positive() {
        return 0.0;
    }
    (profit.minor() as f64 * 100.0) / revenue.minor() as f64
}

/// Planned cost derived as a flat share of a budget
pub fn legacy_planned_cost(budget: Money, ratio: f64) -> Money {
    budget.scale(ratio)
}

/// Comparison between the flat-ratio planned cost and the allocated cost.
///
/// The two figures come from unrelated computations; a non-zero delta is a
/// data inconsistency to review, not an engine error.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LegacyCostCheck {
    pub budget: Money,
    pub ratio: f64,
    pub planned_cost: Money,
    pub allocated_cost: Money,
    /// `allocated_cost - planned_cost`
    pub delta: Money,
}

impl LegacyCostCheck {
    pub fn new(budget: Money, ratio: f64, allocated_cost: Money) -> Self {
        let planned_cost = legacy_planned_cost(budget, ratio);
        Self {
            budget,
            ratio,
            planned_cost,
            allocated_cost,
            delta: allocated_cost - planned_cost,
        }
    }

    pub fn is_consistent(&self) -> bool {
        self.delta.is_zero()
    }
}

/// Revenue, cost, profit and margin for one computation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialSummary {
    pub revenue: Money,
    /// `None` when no source had a positive value
    pub revenue_source: Option<RevenueSource>,
    pub cost: Money,
    pub profit: Money,
    pub margin_pct: f64,
    pub status: MarginStatus,
    pub classification: MarginClassification,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legacy_cost_check: Option<LegacyCostCheck>,
}

impl FinancialSummary {
    /// Format the summary for terminal display
    pub fn format_terminal(&self) -> String {
        let mut output = String::new();

        output.push_str("Financial Summary\n");
        output.push_str(&"=".repeat(40));
        output.push('\n');

        let source = self
            .revenue_source
            .map(|s| format!(" ({})", s))
            .unwrap_or_else(|| " (no source)".to_string());
        output.push_str(&format!("{:<12} {:>14}{}\n", "Revenue:", self.revenue, source));
        output.push_str(&format!("{:<12} {:>14}\n", "Cost:", self.cost));
        output.push_str(&format!("{:<12} {:>14}\n", "Profit:", self.profit));
        output.push_str(&format!("{:<12} {:>13.2}%\n", "Margin:", self.margin_pct));
        output.push_str(&format!("{:<12} {:>14}\n", "Status:", self.status));

        if let Some(check) = &self.legacy_cost_check {
            output.push('\n');
            output.push_str(&format!(
                "Legacy planned cost ({:.0}% of budget {}): {}\n",
                check.ratio * 100.0,
                check.budget,
                check.planned_cost
            ));
            if !check.is_consistent() {
                output.push_str(&format!(
                    "  ! differs from allocated cost by {} (review)\n",
                    check.delta
                ));
            }
        }

        output
    }
}

/// Pure derivation of a [`FinancialSummary`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FinancialSummaryCalculator {
    pub precedence: RevenuePrecedence,
    pub thresholds: MarginThresholds,
    pub legacy_budget_cost_ratio: Option<f64>,
}

impl FinancialSummaryCalculator {
    pub fn new(
        precedence: RevenuePrecedence,
        thresholds: MarginThresholds,
        legacy_budget_cost_ratio: Option<f64>,
    ) -> Self {
        Self {
            precedence,
            thresholds,
            legacy_budget_cost_ratio,
        }
    }

    /// Compute the summary from revenue candidates and the rolled-up cost.
    ///
    /// A non-positive `rolled_up_cost` counts as zero. The legacy cost check
    /// is attached only when both a ratio is configured and `budget` is given.
    pub fn calculate(
        &self,
        inputs: &RevenueInputs,
        rolled_up_cost: Money,
        budget: Option<Money>,
    ) -> FinancialSummary {
        let (revenue_source, revenue) = match self.precedence.resolve(inputs) {
            Some((source, value)) => (Some(source), value),
            None => (None, Money::zero()),
        };
        let cost = if rolled_up_cost.is_positive() {
            rolled_up_cost
        } else {
            Money::zero()
        };
        let profit = revenue - cost;
        let margin_pct = margin_pct(revenue, profit);
        let classification = classify(margin_pct, &self.thresholds);

        let legacy_cost_check = match (self.legacy_budget_cost_ratio, budget) {
            (Some(ratio), Some(budget)) => {
                let check = LegacyCostCheck::new(budget, ratio, cost);
                if !check.is_consistent() {
                    warn!(
                        planned = %check.planned_cost,
                        allocated = %check.allocated_cost,
                        delta = %check.delta,
                        "legacy flat-ratio planned cost disagrees with allocated cost"
                    );
                }
                Some(check)
            }
            _ => None,
        };

        debug!(
            revenue = %revenue,
            source = ?revenue_source,
            cost = %cost,
            margin_pct,
            status = %classification.status,
            "computed financial summary"
        );

        FinancialSummary {
            revenue,
            revenue_source,
            cost,
            profit,
            margin_pct,
            status: classification.status,
            classification,
            legacy_cost_check,
        }
    }
}
