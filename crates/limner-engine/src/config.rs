//! Launch configuration.
//!
//! Defaults suit an interactive window; `from_env` lets a host switch
//! backend, report verbosity and the headless frame cap without rebuilding.

use anyhow::{Context, Result};

use crate::device::GpuInit;
use crate::logging::{LoggingConfig, ReportLevel, ReportPolicy};

pub const ENV_BACKEND: &str = "LIMNER_BACKEND";
pub const ENV_REPORT: &str = "LIMNER_REPORT";
pub const ENV_FRAMES: &str = "LIMNER_FRAMES";

#[derive(Debug, Clone)]
pub struct LaunchConfig {
    /// Registry name of the backend to load.
    pub backend: String,
    /// Window title; ignored by headless backends.
    pub title: String,
    pub logging: LoggingConfig,
    pub report: ReportPolicy,
    /// Frames after which the headless loop stops. `None` runs until the
    /// sketch goes idle.
    pub headless_frames: Option<u64>,
    pub gpu: GpuInit,
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            backend: "window".to_string(),
            title: "limner".to_string(),
            logging: LoggingConfig::default(),
            report: ReportPolicy::default(),
            headless_frames: None,
            gpu: GpuInit::default(),
        }
    }
}

impl LaunchConfig {
    /// Defaults overridden by `LIMNER_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides from `lookup`. Unset or empty values keep the
    /// current setting.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(backend) = get(ENV_BACKEND) {
            self.backend = backend.trim().to_string();
        }
        if let Some(level) = get(ENV_REPORT) {
            self.report.min_level = level
                .parse::<ReportLevel>()
                .map_err(anyhow::Error::msg)
                .with_context(|| format!("invalid {ENV_REPORT}"))?;
        }
        if let Some(frames) = get(ENV_FRAMES) {
            let frames = frames
                .trim()
                .parse::<u64>()
                .with_context(|| format!("invalid {ENV_FRAMES}: {frames:?}"))?;
            self.headless_frames = Some(frames);
        }
        Ok(self)
    }

    pub fn with_backend(mut self, backend: impl Into<String>) -> Self {
        self.backend = backend.into();
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let c = LaunchConfig::default();
        assert_eq!(c.backend, "window");
        assert_eq!(c.title, "limner");
        assert_eq!(c.headless_frames, None);
        assert_eq!(c.report, ReportPolicy::default());
    }

    #[test]
    fn overrides_apply() {
        let c = LaunchConfig::default()
            .with_overrides(env(&[(ENV_BACKEND, " headless "), (ENV_REPORT, "warn"), (ENV_FRAMES, "12")]))
            .unwrap();
        assert_eq!(c.backend, "headless");
        assert_eq!(c.report.min_level, ReportLevel::Warning);
        assert_eq!(c.report.fatal_level, ReportLevel::Error);
        assert_eq!(c.headless_frames, Some(12));
    }

    #[test]
    fn empty_values_are_ignored() {
        let c = LaunchConfig::default()
            .with_overrides(env(&[(ENV_BACKEND, ""), (ENV_FRAMES, "  ")]))
            .unwrap();
        assert_eq!(c.backend, "window");
        assert_eq!(c.headless_frames, None);
    }

    #[test]
    fn bad_values_are_errors() {
        let err = LaunchConfig::default()
            .with_overrides(env(&[(ENV_FRAMES, "many")]))
            .unwrap_err();
        assert!(format!("{err:#}").contains(ENV_FRAMES));

        assert!(LaunchConfig::default()
            .with_overrides(env(&[(ENV_REPORT, "loud")]))
            .is_err());
    }
}
