//! Per-weekday class lists
//!
//! The lists are persisted as one JSON blob in the settings store. Older
//! installs stored a flat array of classes with no weekday information;
//! those blobs are migrated on load so every day lists the same classes.

use super::class::StudentClass;
use crate::constants::{DAYS_PER_WEEK, KEY_STUDENT_CLASSES};
use crate::settings::SettingsStore;
use anyhow::{bail, Context, Result};
use chrono::{Datelike, Weekday};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::path::Path;

const STORAGE_VERSION: u32 = 2;

/// Class lists for Monday through Sunday
#[derive(Debug, Clone)]
pub struct StudentClassSelector {
    days: Vec<Vec<StudentClass>>,
}

#[derive(Serialize, Deserialize)]
struct StoredWeek {
    #[serde(default)]
    version: u32,
    #[serde(default)]
    days: Vec<Vec<StudentClass>>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredClasses {
    Week(StoredWeek),
    Legacy(Vec<StudentClass>),
}

impl Default for StudentClassSelector {
    fn default() -> Self {
        Self::new()
    }
}

impl StudentClassSelector {
    pub fn new() -> Self {
        Self {
            days: vec![Vec::new(); DAYS_PER_WEEK],
        }
    }

    /// The local weekday, used when the caller does not name one
    pub fn today() -> Weekday {
        chrono::Local::now().weekday()
    }

    /// Load the class lists from the settings store.
    ///
    /// A missing or unreadable blob yields empty lists. Rosters are
    /// re-read from their source files; a missing file keeps the
    /// persisted students.
    pub fn load(store: &SettingsStore) -> Self {
        let Some(raw) = store.get_raw(KEY_STUDENT_CLASSES) else {
            return Self::new();
        };

        let mut selector = match Self::from_value(raw) {
            Ok(s) => s,
            Err(e) => {
                warn!("Discarding stored class lists: {:#}", e);
                return Self::new();
            }
        };
        selector.refresh_rosters();
        selector
    }

    /// Decode a stored blob, migrating the legacy layout and dropping
    /// duplicate classes
    pub fn from_value(value: Value) -> Result<Self> {
        let stored: StoredClasses =
            serde_json::from_value(value).context("Class list blob has an unknown layout")?;

        let mut days = match stored {
            StoredClasses::Week(week) => {
                if week.version > STORAGE_VERSION {
                    warn!(
                        "Class lists were written by a newer version ({}), reading what we can",
                        week.version
                    );
                }
                week.days
            }
            StoredClasses::Legacy(classes) => {
                info!(
                    "Migrating {} classes from the legacy layout to every weekday",
                    classes.len()
                );
                vec![classes; DAYS_PER_WEEK]
            }
        };

        if days.len() > DAYS_PER_WEEK {
            warn!(
                "Stored class lists have {} days, ignoring the extra ones",
                days.len()
            );
        }
        days.resize_with(DAYS_PER_WEEK, Vec::new);

        for (i, classes) in days.iter_mut().enumerate() {
            dedup_day(classes, weekday_from_index(i));
            for class in classes.iter_mut() {
                class.normalize_history();
            }
        }

        Ok(Self { days })
    }

    /// Persist the class lists, including each class's pick history
    pub fn save(&self, store: &SettingsStore) -> Result<()> {
        let week = StoredWeek {
            version: STORAGE_VERSION,
            days: self.days.clone(),
        };
        store
            .set(KEY_STUDENT_CLASSES, &week)
            .context("Failed to save class lists")
    }

    /// Re-read every roster that has a source file
    pub fn refresh_rosters(&mut self) {
        for class in self.days.iter_mut().flatten() {
            if let Err(e) = class.reload() {
                warn!(
                    "Keeping stored roster for '{}': {:#}",
                    class.name(),
                    e
                );
            }
        }
    }

    pub fn classes(&self, day: Weekday) -> &[StudentClass] {
        &self.days[day_index(day)]
    }

    pub fn class(&self, day: Weekday, name: &str) -> Option<&StudentClass> {
        self.classes(day).iter().find(|c| c.name() == name)
    }

    pub fn class_mut(&mut self, day: Weekday, name: &str) -> Option<&mut StudentClass> {
        self.days[day_index(day)]
            .iter_mut()
            .find(|c| c.name() == name)
    }

    /// Load the roster at `path` and add it to `day`
    pub fn add_class(&mut self, day: Weekday, path: &Path) -> Result<&StudentClass> {
        let class = StudentClass::from_file(path)?;
        self.insert(day, class)
    }

    /// Add the roster at `path` to every day that does not already list it.
    /// Returns the number of days it was added to.
    pub fn add_class_all_days(&mut self, path: &Path) -> Result<usize> {
        let class = StudentClass::from_file(path)?;
        let mut added = 0;
        for i in 0..DAYS_PER_WEEK {
            let day = weekday_from_index(i);
            if self.find_duplicate(day, &class).is_none() {
                self.days[i].push(class.clone());
                added += 1;
            }
        }
        Ok(added)
    }

    /// Add an already built class to `day`
    pub fn insert(&mut self, day: Weekday, class: StudentClass) -> Result<&StudentClass> {
        if let Some(existing) = self.find_duplicate(day, &class) {
            bail!(
                "Class '{}' is already listed on {} (as '{}')",
                class.name(),
                day,
                existing
            );
        }

        let list = &mut self.days[day_index(day)];
        list.push(class);
        let added = &list[list.len() - 1];
        info!("Added class '{}' to {}", added.name(), day);
        Ok(added)
    }

    pub fn remove_class(&mut self, day: Weekday, name: &str) -> Option<StudentClass> {
        let list = &mut self.days[day_index(day)];
        let pos = list.iter().position(|c| c.name() == name)?;
        let removed = list.remove(pos);
        info!("Removed class '{}' from {}", name, day);
        Some(removed)
    }

    fn find_duplicate(&self, day: Weekday, class: &StudentClass) -> Option<String> {
        self.classes(day)
            .iter()
            .find(|c| is_duplicate(c, class))
            .map(|c| c.name().to_string())
    }
}

fn is_duplicate(a: &StudentClass, b: &StudentClass) -> bool {
    if a.name() == b.name() {
        return true;
    }
    matches!((a.source_path(), b.source_path()), (Some(x), Some(y)) if x == y)
}

fn dedup_day(classes: &mut Vec<StudentClass>, day: Weekday) {
    let mut names = HashSet::new();
    let mut paths = HashSet::new();

    classes.retain(|class| {
        let name_seen = !names.insert(class.name().to_string());
        let path_seen = class
            .source_path()
            .map(|p| !paths.insert(p.to_path_buf()))
            .unwrap_or(false);

        if name_seen || path_seen {
            warn!("Dropping duplicate class '{}' on {}", class.name(), day);
            false
        } else {
            true
        }
    });
}

fn day_index(day: Weekday) -> usize {
    day.num_days_from_monday() as usize
}

const WEEK: [Weekday; DAYS_PER_WEEK] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

fn weekday_from_index(i: usize) -> Weekday {
    WEEK[i % DAYS_PER_WEEK]
}
