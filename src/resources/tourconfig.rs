//! Tour configuration resource.
//!
//! Settings come from an INI file. Sections are case-sensitive because each
//! step's side effects live in a section named after its bundle.
//!
//! # Configuration File Format
//!
//! ```ini
//! [tour]
//! steps = Scene1,Scene2,Scene3
//! bundles_dir = ./assets/bundles
//!
//! [Scene2]
//! free_camera = true
//! indicator = 1
//!
//! [fade]
//! duration = 1.0
//! max_ticks = 10000
//!
//! [indicator]
//! duration = 1.0
//!
//! [run]
//! tick_rate = 60
//! ```
//!
//! Every key is optional. A step without its own section gets the camera on
//! every step but the first, and indicator `i` on step `i`.

use std::path::PathBuf;

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use log::info;

use crate::components::fader::DEFAULT_FADE_DURATION;
use crate::error::TourError;
use crate::resources::tour::DEFAULT_BARRIER_MAX_TICKS;
use crate::resources::tourplan::{TourPlan, TourStep};

const DEFAULT_INDICATOR_DURATION: f32 = 1.0;
const DEFAULT_TICK_RATE: u32 = 60;
const DEFAULT_CONFIG_PATH: &str = "./scenetour.ini";

/// Tour configuration resource.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct TourConfig {
    /// Steps in tour order.
    pub steps: Vec<TourStep>,
    /// Directory searched for `<bundle>.json` manifests.
    pub bundles_dir: Option<PathBuf>,
    /// Seconds every fader takes to reach its target.
    pub fade_duration: f32,
    /// Cap on how many ticks a fade barrier waits.
    pub barrier_max_ticks: u32,
    /// Seconds an indicator takes to change colour.
    pub indicator_duration: f32,
    /// Host ticks per second.
    pub tick_rate: u32,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for TourConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl TourConfig {
    /// Configuration for the built-in three-step tour.
    pub fn new() -> Self {
        Self {
            steps: TourPlan::default().steps().to_vec(),
            bundles_dir: None,
            fade_duration: DEFAULT_FADE_DURATION,
            barrier_max_ticks: DEFAULT_BARRIER_MAX_TICKS,
            indicator_duration: DEFAULT_INDICATOR_DURATION,
            tick_rate: DEFAULT_TICK_RATE,
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Load configuration from `config_path`.
    ///
    /// Missing values keep their current values.
    pub fn load_from_file(&mut self) -> Result<(), TourError> {
        let mut ini = Ini::new_cs();
        ini.load(&self.config_path).map_err(|e| {
            TourError::Config(format!(
                "failed to load {}: {}",
                self.config_path.display(),
                e
            ))
        })?;
        self.apply(&ini)?;
        info!(
            "Loaded config from {}: {} steps, fade={}s, max_ticks={}, tick_rate={}",
            self.config_path.display(),
            self.steps.len(),
            self.fade_duration,
            self.barrier_max_ticks,
            self.tick_rate
        );
        Ok(())
    }

    /// Load configuration from INI text.
    pub fn load_from_str(&mut self, text: &str) -> Result<(), TourError> {
        let mut ini = Ini::new_cs();
        ini.read(text.to_string())
            .map_err(|e| TourError::Config(format!("failed to parse config: {}", e)))?;
        self.apply(&ini)
    }

    fn apply(&mut self, ini: &Ini) -> Result<(), TourError> {
        // [tour] section
        if let Some(steps) = ini.get("tour", "steps") {
            let ids: Vec<&str> = steps
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .collect();
            self.steps = ids
                .iter()
                .enumerate()
                .map(|(i, id)| TourStep::new(*id, i > 0, i))
                .collect();
        }
        if let Some(dir) = ini.get("tour", "bundles_dir") {
            let dir = dir.trim();
            self.bundles_dir = (!dir.is_empty()).then(|| PathBuf::from(dir));
        }

        // one section per step
        for step in &mut self.steps {
            if let Some(free) = ini.getbool(&step.bundle, "free_camera").map_err(TourError::Config)? {
                step.free_camera = free;
            }
            if let Some(index) = ini.getuint(&step.bundle, "indicator").map_err(TourError::Config)? {
                step.indicator = index as usize;
            }
        }

        // [fade] section
        if let Some(duration) = ini.getfloat("fade", "duration").map_err(TourError::Config)? {
            if duration < 0.0 {
                return Err(TourError::Config("fade duration must not be negative".into()));
            }
            self.fade_duration = duration as f32;
        }
        if let Some(max) = ini.getuint("fade", "max_ticks").map_err(TourError::Config)? {
            if max == 0 {
                return Err(TourError::Config("max_ticks must be at least 1".into()));
            }
            self.barrier_max_ticks = max.min(u32::MAX as u64) as u32;
        }

        // [indicator] section
        if let Some(duration) = ini.getfloat("indicator", "duration").map_err(TourError::Config)? {
            self.indicator_duration = duration.max(0.0) as f32;
        }

        // [run] section
        if let Some(rate) = ini.getuint("run", "tick_rate").map_err(TourError::Config)? {
            if rate == 0 {
                return Err(TourError::Config("tick_rate must be at least 1".into()));
            }
            self.tick_rate = rate.min(u32::MAX as u64) as u32;
        }

        Ok(())
    }

    fn to_ini(&self) -> Ini {
        let mut ini = Ini::new_cs();

        let steps: Vec<&str> = self.steps.iter().map(|s| s.bundle.as_str()).collect();
        ini.set("tour", "steps", Some(steps.join(",")));
        if let Some(dir) = &self.bundles_dir {
            ini.set("tour", "bundles_dir", Some(dir.display().to_string()));
        }

        for step in &self.steps {
            ini.set(&step.bundle, "free_camera", Some(step.free_camera.to_string()));
            ini.set(&step.bundle, "indicator", Some(step.indicator.to_string()));
        }

        ini.set("fade", "duration", Some(self.fade_duration.to_string()));
        ini.set("fade", "max_ticks", Some(self.barrier_max_ticks.to_string()));
        ini.set("indicator", "duration", Some(self.indicator_duration.to_string()));
        ini.set("run", "tick_rate", Some(self.tick_rate.to_string()));
        ini
    }

    /// Save configuration to `config_path`, creating the file if needed.
    pub fn save_to_file(&self) -> Result<(), TourError> {
        self.to_ini().write(&self.config_path).map_err(|e| {
            TourError::Config(format!(
                "failed to save {}: {}",
                self.config_path.display(),
                e
            ))
        })?;
        info!("Saved config to {:?}", self.config_path);
        Ok(())
    }

    /// Validated plan built from the configured steps.
    pub fn plan(&self) -> Result<TourPlan, TourError> {
        TourPlan::new(self.steps.clone())
    }

    /// Seconds per host tick.
    pub fn tick_period(&self) -> f32 {
        1.0 / self.tick_rate.max(1) as f32
    }
}
