//! Persisted chart settings (lives in the OS config directory).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{GanttError, Result};
use crate::interaction::DEFAULT_EASING_RATE;
use crate::model::ViewMode;

/// Pixel width of one unit column, per view mode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnitWidths {
    pub day: f64,
    pub week: f64,
    pub month: f64,
    pub quarter: f64,
    pub year: f64,
}

impl Default for UnitWidths {
    fn default() -> Self {
        Self {
            day: ViewMode::Day.default_unit_width(),
            week: ViewMode::Week.default_unit_width(),
            month: ViewMode::Month.default_unit_width(),
            quarter: ViewMode::Quarter.default_unit_width(),
            year: ViewMode::Year.default_unit_width(),
        }
    }
}

impl UnitWidths {
    pub fn get(&self, mode: ViewMode) -> f64 {
        match mode {
            ViewMode::Day => self.day,
            ViewMode::Week => self.week,
            ViewMode::Month => self.month,
            ViewMode::Quarter => self.quarter,
            ViewMode::Year => self.year,
        }
    }

    pub fn set(&mut self, mode: ViewMode, width: f64) {
        let slot = match mode {
            ViewMode::Day => &mut self.day,
            ViewMode::Week => &mut self.week,
            ViewMode::Month => &mut self.month,
            ViewMode::Quarter => &mut self.quarter,
            ViewMode::Year => &mut self.year,
        };
        *slot = width;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GanttSettings {
    pub view_mode: ViewMode,
    pub unit_widths: UnitWidths,
    /// Fraction of the remaining distance a dragged bar covers per frame.
    pub easing_rate: f64,
    pub easing_enabled: bool,
}

impl Default for GanttSettings {
    fn default() -> Self {
        Self {
            view_mode: ViewMode::default(),
            unit_widths: UnitWidths::default(),
            easing_rate: DEFAULT_EASING_RATE,
            easing_enabled: true,
        }
    }
}

impl GanttSettings {
    /// Where settings live: `<config dir>/settings.json`, or the working
    /// directory when no config dir can be resolved.
    pub fn config_path() -> PathBuf {
        match directories::ProjectDirs::from("", "", "GanttTimeline") {
            Some(dirs) => dirs.config_dir().join("settings.json"),
            None => PathBuf::from(".").join("settings.json"),
        }
    }

    /// Load from the default location, falling back to defaults on any error.
    pub fn load() -> Self {
        let path = Self::config_path();
        match Self::load_from(&path) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::debug!("using default settings: {e}");
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| GanttError::io(path, e))?;
        Ok(serde_json::from_str(&json)?)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| GanttError::io(parent, e))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|e| GanttError::io(path, e))
    }

    pub fn unit_width(&self) -> f64 {
        self.unit_widths.get(self.view_mode)
    }
}
