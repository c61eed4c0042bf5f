// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Engine configuration

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Behavior when two intersecting 3D surfaces that are not coplanar are subtracted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum NonCoplanarPolicy {
    /// Fail with [`crate::SetOpError::NonCoplanarSurfaces`]
    #[default]
    Reject,
    /// Keep the minuend triangle untouched and log a warning
    KeepMinuend,
}

impl FromStr for NonCoplanarPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reject" => Ok(Self::Reject),
            "keep-minuend" | "keep_minuend" => Ok(Self::KeepMinuend),
            other => Err(anyhow!("Unknown non-coplanar policy: {other}")),
        }
    }
}

/// Tuning and behavior switches for the set-operation engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Box count below which the sweep stops partitioning and scans
    pub sweep_cutoff: usize,
    /// Drop result primitives covered by other result primitives
    pub filter_covered: bool,
    /// Merge coplanar facets when a volume is turned back into a solid
    pub merge_facets: bool,
    /// What to do with non-coplanar 3D surface differences
    pub non_coplanar: NonCoplanarPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sweep_cutoff: 10,
            filter_covered: true,
            merge_facets: true,
            non_coplanar: NonCoplanarPolicy::Reject,
        }
    }
}

impl EngineConfig {
    /// Load configuration from file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        let config: EngineConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path.as_ref()))?;
        Ok(config)
    }

    /// Load `polyset.toml` from the working directory, then apply environment overrides
    pub fn load() -> Result<Self> {
        let mut config = if PathBuf::from("polyset.toml").exists() {
            Self::from_file("polyset.toml")?
        } else {
            Self::default()
        };
        config.apply_env()?;
        Ok(config)
    }

    /// Apply `POLYSET_*` environment variable overrides
    pub fn apply_env(&mut self) -> Result<()> {
        if let Ok(cutoff) = std::env::var("POLYSET_SWEEP_CUTOFF") {
            self.sweep_cutoff = cutoff
                .parse()
                .with_context(|| format!("Invalid POLYSET_SWEEP_CUTOFF: {cutoff}"))?;
        }

        if let Ok(filter) = std::env::var("POLYSET_FILTER_COVERED") {
            self.filter_covered = flag_override("POLYSET_FILTER_COVERED", &filter, self.filter_covered);
        }

        if let Ok(merge) = std::env::var("POLYSET_MERGE_FACETS") {
            self.merge_facets = flag_override("POLYSET_MERGE_FACETS", &merge, self.merge_facets);
        }

        if let Ok(policy) = std::env::var("POLYSET_NON_COPLANAR") {
            self.non_coplanar = policy.parse()?;
        }

        Ok(())
    }

    /// Save configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path.as_ref(), content)
            .with_context(|| format!("Failed to write config file: {:?}", path.as_ref()))?;
        Ok(())
    }

    /// Sweep cutoff, never below one box
    pub fn cutoff(&self) -> usize {
        self.sweep_cutoff.max(1)
    }
}

/// Boolean override from `variable`, keeping `current` when `value` is not a bool
fn flag_override(variable: &str, value: &str, current: bool) -> bool {
    match value.trim().parse() {
        Ok(flag) => flag,
        Err(_) => {
            tracing::warn!(variable, value, kept = current, "ignoring invalid boolean override");
            current
        }
    }
}
