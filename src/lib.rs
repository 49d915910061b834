// Library interface for Teacher Toolbox
// This allows tests and the CLI to share the classroom utilities

pub mod clock;
pub mod config;
pub mod config_file;
pub mod constants;
pub mod roster;
pub mod settings;
pub mod timer;

use anyhow::{anyhow, bail, Context, Result};
use chrono::Weekday;
use clock::GaugeArray;
use config_file::Config;
use log::info;
use roster::StudentClassSelector;
use settings::SettingsStore;
use std::time::Duration;
use timer::IntervalPlan;

/// Core state shared by every front end: configuration, the settings
/// store and everything persisted in it
pub struct ToolboxCore {
    pub config: Config,
    pub store: SettingsStore,
    pub classes: StudentClassSelector,
    pub clock: GaugeArray,
}

impl ToolboxCore {
    /// Open the settings store named by `config` and load saved state
    pub fn open(config: Config) -> Self {
        let store = SettingsStore::open(config.settings_path());
        Self::with_store(config, store)
    }

    pub fn with_store(config: Config, store: SettingsStore) -> Self {
        let classes = StudentClassSelector::load(&store);
        let clock = GaugeArray::load(&store);
        info!("Settings loaded from: {}", store.path().display());

        Self {
            config,
            store,
            classes,
            clock,
        }
    }

    /// Pick `count` students from `class` on `day` and persist the pick
    /// history. Returns the picked names in order.
    pub fn pick(&mut self, day: Weekday, class: &str, count: usize) -> Result<Vec<String>> {
        if count == 0 {
            bail!("Pick count must be at least 1");
        }
        let roster = self
            .classes
            .class_mut(day, class)
            .ok_or_else(|| anyhow!("No class named '{}' on {}", class, day))?;

        let mut picked = Vec::with_capacity(count);
        for _ in 0..count {
            match roster.get_random_student() {
                Some(student) => picked.push(student.name().to_string()),
                None => break,
            }
        }

        self.save_classes()?;
        Ok(picked)
    }

    pub fn save_classes(&self) -> Result<()> {
        self.classes.save(&self.store)
    }

    pub fn save_clock(&self) -> Result<()> {
        self.clock.save(&self.store)
    }

    /// Interval plan from the config file, with the environment override
    /// for the work length applied
    pub fn interval_plan(&self) -> IntervalPlan {
        let minutes = config::parse_countdown_minutes().unwrap_or(self.config.countdown_minutes);
        IntervalPlan {
            work: Duration::from_secs(minutes * 60),
            rest: Duration::from_secs(self.config.rest_minutes * 60),
            rounds: self.config.rounds,
        }
    }
}

/// Parse a weekday name such as `mon` or `Tuesday`
pub fn parse_weekday(s: &str) -> Result<Weekday> {
    s.parse::<Weekday>()
        .map_err(|_| anyhow!("Unknown weekday '{}'", s))
        .context("Expected a day such as 'mon' or 'tuesday'")
}
