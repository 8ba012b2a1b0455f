//! Tunables for inspection and repair

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::element::ElementKind;
use crate::error::{ConfigError, LoadError};
use crate::geometry::Canvas;
use crate::lint::IssueKind;

/// Configuration options for inspection and repair
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Options {
    /// Minimum distance between any element and the canvas edges
    pub margin_min: f64,

    /// Overlap ratios above this are reported; at or below are tolerated
    pub overlap_ratio_threshold: f64,

    /// Minimum gap between elements sharing a row or column band
    pub spacing_min: f64,

    /// Upper bound on repair passes
    pub max_iterations: usize,

    /// Kinds skipped by the overlap and spacing checks
    pub exempt_kinds: BTreeSet<ElementKind>,

    /// Also skip elements covering most of the canvas (backgrounds)
    pub exempt_full_bleed: bool,

    /// Issue kinds repair is allowed to fix; `InvalidElement` is never fixed
    pub fix_kinds: BTreeSet<IssueKind>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            margin_min: 0.0,
            overlap_ratio_threshold: 0.05,
            spacing_min: 0.25,
            max_iterations: 10,
            exempt_kinds: BTreeSet::new(),
            exempt_full_bleed: false,
            fix_kinds: IssueKind::ALL
                .into_iter()
                .filter(IssueKind::is_actionable)
                .collect(),
        }
    }
}

/// TOML structure for deserializing options; every key is optional
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlOptions {
    margin_min: Option<f64>,
    overlap_ratio_threshold: Option<f64>,
    spacing_min: Option<f64>,
    max_iterations: Option<usize>,
    exempt_kinds: Option<Vec<ElementKind>>,
    exempt_full_bleed: Option<bool>,
    fix_kinds: Option<Vec<IssueKind>>,
}

impl Options {
    /// Create options with the canonical defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the canvas edge margin
    pub fn with_margin(mut self, margin: f64) -> Self {
        self.margin_min = margin;
        self
    }

    /// Set the overlap ratio threshold
    pub fn with_overlap_threshold(mut self, threshold: f64) -> Self {
        self.overlap_ratio_threshold = threshold;
        self
    }

    /// Set the minimum spacing between neighbours
    pub fn with_spacing(mut self, spacing: f64) -> Self {
        self.spacing_min = spacing;
        self
    }

    /// Set the repair iteration budget
    pub fn with_max_iterations(mut self, iterations: usize) -> Self {
        self.max_iterations = iterations;
        self
    }

    /// Exempt an element kind from overlap and spacing checks
    pub fn with_exempt_kind(mut self, kind: ElementKind) -> Self {
        self.exempt_kinds.insert(kind);
        self
    }

    /// Exempt full-bleed backgrounds from overlap and spacing checks
    pub fn with_full_bleed_exempt(mut self, exempt: bool) -> Self {
        self.exempt_full_bleed = exempt;
        self
    }

    /// Restrict repair to the given issue kinds
    pub fn with_fix_kinds(mut self, kinds: impl IntoIterator<Item = IssueKind>) -> Self {
        self.fix_kinds = kinds.into_iter().collect();
        self
    }

    /// Reject negative or non-finite thresholds and an empty iteration budget
    pub fn validate(&self) -> Result<(), ConfigError> {
        let thresholds = [
            ("margin_min", self.margin_min),
            ("overlap_ratio_threshold", self.overlap_ratio_threshold),
            ("spacing_min", self.spacing_min),
        ];
        for (name, value) in thresholds {
            if !value.is_finite() {
                return Err(ConfigError::non_finite(name, value));
            }
            if value < 0.0 {
                return Err(ConfigError::negative(name, value));
            }
        }
        if self.max_iterations == 0 {
            return Err(ConfigError::ZeroIterations);
        }
        Ok(())
    }

    /// Load options from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, LoadError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Load options from a TOML string, filling gaps with defaults
    pub fn from_toml_str(content: &str) -> Result<Self, LoadError> {
        let parsed: TomlOptions = toml::from_str(content)?;
        let defaults = Self::default();

        let options = Options {
            margin_min: parsed.margin_min.unwrap_or(defaults.margin_min),
            overlap_ratio_threshold: parsed
                .overlap_ratio_threshold
                .unwrap_or(defaults.overlap_ratio_threshold),
            spacing_min: parsed.spacing_min.unwrap_or(defaults.spacing_min),
            max_iterations: parsed.max_iterations.unwrap_or(defaults.max_iterations),
            exempt_kinds: parsed
                .exempt_kinds
                .map(|kinds| kinds.into_iter().collect())
                .unwrap_or(defaults.exempt_kinds),
            exempt_full_bleed: parsed.exempt_full_bleed.unwrap_or(defaults.exempt_full_bleed),
            fix_kinds: parsed
                .fix_kinds
                .map(|kinds| kinds.into_iter().collect())
                .unwrap_or(defaults.fix_kinds),
        };
        options.validate()?;
        Ok(options)
    }

    /// Validate the options along with the canvas they will be applied to
    pub(crate) fn validate_for(&self, canvas: &Canvas) -> Result<(), ConfigError> {
        if !canvas.is_valid() {
            return Err(ConfigError::invalid_canvas(canvas.width, canvas.height));
        }
        self.validate()?;
        if 2.0 * self.margin_min >= canvas.width.min(canvas.height) {
            return Err(ConfigError::margin_too_large(self.margin_min, canvas));
        }
        Ok(())
    }

    /// Whether repair acts on issues of this kind
    pub(crate) fn fixes(&self, kind: IssueKind) -> bool {
        kind.is_actionable() && self.fix_kinds.contains(&kind)
    }

    pub(crate) fn is_exempt_kind(&self, kind: ElementKind) -> bool {
        self.exempt_kinds.contains(&kind)
    }
}
