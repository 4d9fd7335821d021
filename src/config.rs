use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::path::Path;

use crate::alert::AlertPolicy;
use crate::pipeline::DEFAULT_ZONE_ID;
use crate::roi::{parse_roi_csv, RegionOfInterest, RoiInput};
use crate::score::ScoringPolicy;

const DEFAULT_FPS: f64 = 5.0;

#[derive(Debug, Deserialize, Default)]
struct AuditConfigFile {
    fps: Option<f64>,
    zone_id: Option<String>,
    roi: Option<RoiInput>,
    early: Option<AlertPolicyFile>,
    standard: Option<AlertPolicyFile>,
    scoring: Option<ScoringConfigFile>,
}

#[derive(Debug, Deserialize, Default)]
struct AlertPolicyFile {
    occlusion_threshold_pct: Option<f64>,
    min_sustain_s: Option<f64>,
    dwell_floor_pct: Option<f64>,
    dwell_threshold_s: Option<f64>,
}

impl AlertPolicyFile {
    fn over(self, base: AlertPolicy) -> AlertPolicy {
        AlertPolicy {
            occlusion_threshold_pct: self
                .occlusion_threshold_pct
                .unwrap_or(base.occlusion_threshold_pct),
            min_sustain_s: self.min_sustain_s.unwrap_or(base.min_sustain_s),
            dwell_floor_pct: self.dwell_floor_pct.unwrap_or(base.dwell_floor_pct),
            dwell_threshold_s: self.dwell_threshold_s.unwrap_or(base.dwell_threshold_s),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
struct ScoringConfigFile {
    blur_cap: Option<f64>,
    reliable_cutoff: Option<u8>,
}

#[derive(Debug, Clone)]
pub struct AuditConfig {
    pub fps: f64,
    pub zone_id: String,
    pub roi: RegionOfInterest,
    pub early: AlertPolicy,
    pub standard: AlertPolicy,
    pub scoring: ScoringPolicy,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            fps: DEFAULT_FPS,
            zone_id: DEFAULT_ZONE_ID.to_string(),
            roi: RegionOfInterest::full_frame(),
            early: AlertPolicy::EARLY,
            standard: AlertPolicy::STANDARD,
            scoring: ScoringPolicy::default(),
        }
    }
}

impl AuditConfig {
    /// Load from `RELIABILITY_CONFIG` (if set), then apply env overrides.
    pub fn load() -> Result<Self> {
        let config_path = std::env::var("RELIABILITY_CONFIG").ok();
        Self::load_from(config_path.as_deref().map(Path::new))
    }

    /// Load from an explicit file (JSON, or TOML by extension), then apply env overrides.
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        let file_cfg = match path {
            Some(path) => Some(read_config_file(path)?),
            None => None,
        };
        let mut cfg = Self::from_file(file_cfg.unwrap_or_default())?;
        cfg.apply_env()?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn from_file(file: AuditConfigFile) -> Result<Self> {
        let defaults = Self::default();
        let roi = match file.roi {
            Some(roi) => roi.into_roi()?,
            None => defaults.roi,
        };
        let scoring = file
            .scoring
            .map(|s| ScoringPolicy {
                blur_cap: s.blur_cap.unwrap_or(defaults.scoring.blur_cap),
                reliable_cutoff: s
                    .reliable_cutoff
                    .unwrap_or(defaults.scoring.reliable_cutoff),
            })
            .unwrap_or(defaults.scoring);
        Ok(Self {
            fps: file.fps.unwrap_or(defaults.fps),
            zone_id: file.zone_id.unwrap_or(defaults.zone_id),
            roi,
            early: file
                .early
                .map_or(defaults.early, |p| p.over(defaults.early)),
            standard: file
                .standard
                .map_or(defaults.standard, |p| p.over(defaults.standard)),
            scoring,
        })
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(fps) = std::env::var("RELIABILITY_FPS") {
            if !fps.trim().is_empty() {
                self.fps = fps
                    .trim()
                    .parse()
                    .map_err(|_| anyhow!("RELIABILITY_FPS must be a number"))?;
            }
        }
        if let Ok(roi) = std::env::var("RELIABILITY_ROI") {
            if !roi.trim().is_empty() {
                self.roi = parse_roi_csv(&roi)
                    .map_err(|e| anyhow!("RELIABILITY_ROI: {}", e))?;
            }
        }
        if let Ok(zone_id) = std::env::var("RELIABILITY_ZONE_ID") {
            if !zone_id.trim().is_empty() {
                self.zone_id = zone_id.trim().to_string();
            }
        }
        Ok(())
    }

    fn validate(&mut self) -> Result<()> {
        crate::validate_zone_id(&self.zone_id)?;
        self.zone_id = self.zone_id.to_lowercase();

        if !self.fps.is_finite() || self.fps <= 0.0 {
            return Err(anyhow!("fps must be greater than zero"));
        }
        self.roi.validate()?;
        self.early
            .validate()
            .map_err(|e| anyhow!("early policy: {}", e))?;
        self.standard
            .validate()
            .map_err(|e| anyhow!("standard policy: {}", e))?;
        if !self.standard.is_stricter_than(&self.early) {
            log::warn!("standard alert policy is not stricter than the early policy");
        }
        self.scoring.validate()?;
        Ok(())
    }
}

fn read_config_file(path: &Path) -> Result<AuditConfigFile> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow!("failed to read config file {}: {}", path.display(), e))?;
    let is_toml = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
    let cfg = if is_toml {
        toml::from_str(&raw).map_err(|e| anyhow!("invalid config file {}: {}", path.display(), e))?
    } else {
        serde_json::from_str(&raw)
            .map_err(|e| anyhow!("invalid config file {}: {}", path.display(), e))?
    };
    Ok(cfg)
}
