//! Engine settings for costroll
//!
//! Settings choose between behaviours the engine cannot decide on its own:
//! the order in which revenue sources are consulted, the margin bands, how
//! much allocation drift still counts as reconciled, and whether the legacy
//! flat-ratio planned cost is computed for comparison.

use serde::{Deserialize, Serialize};

use super::paths::CostrollPaths;
use crate::error::CostrollError;
use crate::models::Money;
use crate::reports::summary::{FinancialSummaryCalculator, MarginThresholds, RevenuePrecedence};
use crate::services::AllocationEngine;

/// Persisted engine settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Revenue sources, highest priority first
    #[serde(default)]
    pub revenue_precedence: RevenuePrecedence,

    /// Lower bounds of the Safe and Warning margin bands
    #[serde(default)]
    pub margin_thresholds: MarginThresholds,

    /// Largest absolute allocation delta still reported as reconciled
    #[serde(default)]
    pub reconciliation_tolerance: Money,

    /// Share of a budget used as the legacy planned cost; `null` disables it
    #[serde(default = "default_legacy_ratio")]
    pub legacy_budget_cost_ratio: Option<f64>,
}

fn default_schema_version() -> u32 {
    1
}

fn default_legacy_ratio() -> Option<f64> {
    Some(0.70)
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            revenue_precedence: RevenuePrecedence::default(),
            margin_thresholds: MarginThresholds::default(),
            reconciliation_tolerance: Money::zero(),
            legacy_budget_cost_ratio: default_legacy_ratio(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or use defaults if the file doesn't exist
    pub fn load_or_create(paths: &CostrollPaths) -> Result<Self, CostrollError> {
        let settings_path = paths.settings_file();

        if !settings_path.exists() {
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(&settings_path)
            .map_err(|e| CostrollError::Io(format!("Failed to read settings file: {}", e)))?;

        let settings: Settings = serde_json::from_str(&contents)
            .map_err(|e| CostrollError::Config(format!("Failed to parse settings file: {}", e)))?;

        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to disk
    pub fn save(&self, paths: &CostrollPaths) -> Result<(), CostrollError> {
        self.validate()?;
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| CostrollError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| CostrollError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }

    /// Reject settings the engine cannot use
    pub fn validate(&self) -> Result<(), CostrollError> {
        let t = &self.margin_thresholds;
        if !t.safe.is_finite() || !t.warning.is_finite() {
            return Err(CostrollError::Config(
                "Margin thresholds must be finite numbers".into(),
            ));
        }
        if t.warning > t.safe {
            return Err(CostrollError::Config(format!(
                "Warning threshold ({}) must not exceed safe threshold ({})",
                t.warning, t.safe
            )));
        }

        let sources = self.revenue_precedence.sources();
        for (i, source) in sources.iter().enumerate() {
            if sources[..i].contains(source) {
                return Err(CostrollError::Config(format!(
                    "Revenue source '{}' listed more than once",
                    source
                )));
            }
        }

        if self.reconciliation_tolerance.is_negative() {
            return Err(CostrollError::Config(
                "Reconciliation tolerance must not be negative".into(),
            ));
        }

        if let Some(ratio) = self.legacy_budget_cost_ratio {
            if !ratio.is_finite() || ratio < 0.0 {
                return Err(CostrollError::Config(format!(
                    "Legacy budget cost ratio must be a non-negative number, got {}",
                    ratio
                )));
            }
        }

        Ok(())
    }

    /// Allocation engine configured with the reconciliation tolerance
    pub fn allocation_engine(&self) -> AllocationEngine {
        AllocationEngine::new(self.reconciliation_tolerance)
    }

    /// Summary calculator configured with precedence, bands and legacy ratio
    pub fn summary_calculator(&self) -> FinancialSummaryCalculator {
        FinancialSummaryCalculator::new(
            self.revenue_precedence.clone(),
            self.margin_thresholds,
            self.legacy_budget_cost_ratio,
        )
    }
}
