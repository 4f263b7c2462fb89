//! Service settings, loadable from TOML.
//!
//! Every field has a default, so a file only needs the values it changes:
//!
//! ```toml
//! log_level = "debug"
//!
//! [bootstrap]
//! accuracy = 1e-10
//!
//! [sampling]
//! display_decimals = 2
//! ```

use ck_core::errors::{Error, Result};
use ck_core::{Real, Size};
use ck_termstructures::BootstrapOptions;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level settings of a [`CurveService`](crate::CurveService).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceSettings {
    /// Default filter for [`init_tracing`](crate::init_tracing) when
    /// `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Numerical settings of every bootstrap.
    #[serde(default)]
    pub bootstrap: BootstrapSettings,

    /// Output precision and sampling horizons.
    #[serde(default)]
    pub sampling: SamplingSettings,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            bootstrap: BootstrapSettings::default(),
            sampling: SamplingSettings::default(),
        }
    }
}

/// Bootstrap accuracy, iteration caps and the initial rate bracket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BootstrapSettings {
    /// Absolute accuracy of the root finder.
    #[serde(default = "default_accuracy")]
    pub accuracy: Real,
    /// Objective evaluations per pillar.
    #[serde(default = "default_max_evaluations")]
    pub max_evaluations: Size,
    /// Full sweeps for cubic interpolations.
    #[serde(default = "default_max_passes")]
    pub max_passes: Size,
    /// Lower end of the zero-rate bracket (decimal).
    #[serde(default = "default_min_rate")]
    pub min_rate: Real,
    /// Upper end of the zero-rate bracket (decimal).
    #[serde(default = "default_max_rate")]
    pub max_rate: Real,
    /// Bracket widenings before giving up.
    #[serde(default = "default_max_bracket_expansions")]
    pub max_bracket_expansions: Size,
}

impl Default for BootstrapSettings {
    fn default() -> Self {
        Self {
            accuracy: default_accuracy(),
            max_evaluations: default_max_evaluations(),
            max_passes: default_max_passes(),
            min_rate: default_min_rate(),
            max_rate: default_max_rate(),
            max_bracket_expansions: default_max_bracket_expansions(),
        }
    }
}

/// Precision of reported values and the extent of sampled series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplingSettings {
    /// Decimals kept on rates in percent.
    #[serde(default = "default_display_decimals")]
    pub display_decimals: i32,
    /// Monthly samples of the custom curve, in years.
    #[serde(default = "default_custom_curve_years")]
    pub custom_curve_years: u32,
    /// Quarterly samples of the treasury curve, in years.
    #[serde(default = "default_treasury_years")]
    pub treasury_years: u32,
    /// Monthly samples of the spreaded curve, in years.
    #[serde(default = "default_spreaded_curve_years")]
    pub spreaded_curve_years: u32,
    /// Zero-rate samples of the sensitivity service span `[0, years]`.
    #[serde(default = "default_sensitivity_years")]
    pub sensitivity_years: Real,
    /// Number of sensitivity samples.
    #[serde(default = "default_sensitivity_points")]
    pub sensitivity_points: usize,
    /// Forward samples of the glitch service span `[0, years]`.
    #[serde(default = "default_glitch_years")]
    pub glitch_years: Real,
    /// Number of glitch samples.
    #[serde(default = "default_glitch_points")]
    pub glitch_points: usize,
    /// Daily day-count samples stop this many years after the start date.
    #[serde(default = "default_day_count_years")]
    pub day_count_years: u32,
    /// Calendar days of daily overnight forwards on the EONIA curve.
    #[serde(default = "default_overnight_forward_days")]
    pub overnight_forward_days: u32,
    /// Longest curve horizon a request may ask for, in years.
    #[serde(default = "default_max_curve_years")]
    pub max_curve_years: u32,
}

impl Default for SamplingSettings {
    fn default() -> Self {
        Self {
            display_decimals: default_display_decimals(),
            custom_curve_years: default_custom_curve_years(),
            treasury_years: default_treasury_years(),
            spreaded_curve_years: default_spreaded_curve_years(),
            sensitivity_years: default_sensitivity_years(),
            sensitivity_points: default_sensitivity_points(),
            glitch_years: default_glitch_years(),
            glitch_points: default_glitch_points(),
            day_count_years: default_day_count_years(),
            overnight_forward_days: default_overnight_forward_days(),
            max_curve_years: default_max_curve_years(),
        }
    }
}

impl ServiceSettings {
    /// Parse settings from TOML text; missing keys take their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let settings: Self = toml::from_str(text)
            .map_err(|e| Error::InvalidArgument(format!("invalid settings: {e}")))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read settings from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::Runtime(format!("cannot read {}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    /// Serialize back to TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| Error::Runtime(format!("cannot write settings: {e}")))
    }

    /// Reject settings no service could run with.
    pub fn validate(&self) -> Result<()> {
        let b = &self.bootstrap;
        ck_core::ensure!(b.accuracy > 0.0, "bootstrap accuracy must be positive, got {}", b.accuracy);
        ck_core::ensure!(b.max_evaluations > 0, "bootstrap needs at least one evaluation");
        ck_core::ensure!(b.max_passes > 0, "bootstrap needs at least one pass");
        ck_core::ensure!(
            b.min_rate < b.max_rate,
            "invalid rate bracket [{}, {}]",
            b.min_rate,
            b.max_rate
        );
        let s = &self.sampling;
        ck_core::ensure!(
            (0..=12).contains(&s.display_decimals),
            "display decimals must lie in 0..=12, got {}",
            s.display_decimals
        );
        ck_core::ensure!(s.sensitivity_points >= 2, "sensitivity series needs two points");
        ck_core::ensure!(s.glitch_points >= 2, "glitch series needs two points");
        ck_core::ensure!(s.sensitivity_years > 0.0 && s.glitch_years > 0.0, "horizons must be positive");
        ck_core::ensure!(s.max_curve_years > 0, "maximum curve horizon must be positive");
        Ok(())
    }

    /// Numerical options handed to every bootstrap.
    pub fn to_bootstrap_options(&self) -> BootstrapOptions {
        let b = &self.bootstrap;
        BootstrapOptions {
            accuracy: b.accuracy,
            max_evaluations: b.max_evaluations,
            max_passes: b.max_passes,
            min_rate: b.min_rate,
            max_rate: b.max_rate,
            max_bracket_expansions: b.max_bracket_expansions,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_accuracy() -> Real {
    BootstrapOptions::default().accuracy
}

fn default_max_evaluations() -> Size {
    BootstrapOptions::default().max_evaluations
}

fn default_max_passes() -> Size {
    BootstrapOptions::default().max_passes
}

fn default_min_rate() -> Real {
    BootstrapOptions::default().min_rate
}

fn default_max_rate() -> Real {
    BootstrapOptions::default().max_rate
}

fn default_max_bracket_expansions() -> Size {
    BootstrapOptions::default().max_bracket_expansions
}

fn default_display_decimals() -> i32 {
    4
}

fn default_custom_curve_years() -> u32 {
    10
}

fn default_treasury_years() -> u32 {
    5
}

fn default_spreaded_curve_years() -> u32 {
    20
}

fn default_sensitivity_years() -> Real {
    15.0
}

fn default_sensitivity_points() -> usize {
    100
}

fn default_glitch_years() -> Real {
    20.0
}

fn default_glitch_points() -> usize {
    401
}

fn default_day_count_years() -> u32 {
    10
}

fn default_overnight_forward_days() -> u32 {
    730
}

fn default_max_curve_years() -> u32 {
    30
}
