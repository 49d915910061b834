//! A class roster and the weighted random picker that runs over it

use super::student::Student;
use anyhow::{Context, Result};
use log::{debug, info, warn};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// A named list of students loaded from a roster file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentClass {
    name: String,
    #[serde(default)]
    source_path: Option<PathBuf>,
    #[serde(default)]
    students: Vec<Student>,
    /// Index of the student returned by the previous pick
    #[serde(default)]
    last_selected: Option<usize>,
    /// Per student, how many picks have gone by since they were chosen
    #[serde(default)]
    since_picked: Vec<u32>,
}

impl StudentClass {
    /// Build a class from raw roster lines
    pub fn from_names<I, S>(name: impl Into<String>, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let students: Vec<Student> = lines
            .into_iter()
            .filter_map(|line| Student::parse(line.as_ref()))
            .collect();
        let since_picked = vec![0; students.len()];

        Self {
            name: name.into(),
            source_path: None,
            students,
            last_selected: None,
            since_picked,
        }
    }

    /// Load a newline-separated roster; the class is named after the file stem
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read roster file: {}", path.display()))?;

        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .filter(|s| !s.is_empty())
            .with_context(|| format!("Roster path has no file name: {}", path.display()))?;

        let mut class = Self::from_names(name, contents.lines());
        class.source_path = Some(path.to_path_buf());

        if class.is_empty() {
            warn!("Roster {} contains no students", path.display());
        } else {
            info!(
                "Loaded class '{}' with {} students from {}",
                class.name,
                class.len(),
                path.display()
            );
        }
        Ok(class)
    }

    /// Re-read the roster from its source file.
    ///
    /// Selection history survives only when the list of names is unchanged.
    pub fn reload(&mut self) -> Result<()> {
        let Some(path) = self.source_path.clone() else {
            return Ok(());
        };

        let fresh = Self::from_file(&path)?;
        let unchanged = fresh.students.len() == self.students.len()
            && fresh
                .students
                .iter()
                .zip(&self.students)
                .all(|(a, b)| a.name() == b.name());

        self.students = fresh.students;
        if unchanged {
            self.normalize_history();
        } else {
            debug!("Roster for '{}' changed, resetting pick history", self.name);
            self.reset_history();
        }
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source_path(&self) -> Option<&Path> {
        self.source_path.as_deref()
    }

    pub fn students(&self) -> &[Student] {
        &self.students
    }

    pub fn len(&self) -> usize {
        self.students.len()
    }

    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }

    pub fn last_selected(&self) -> Option<&Student> {
        self.last_selected.and_then(|i| self.students.get(i))
    }

    /// Forget who was picked and when
    pub fn reset_history(&mut self) {
        self.last_selected = None;
        self.since_picked = vec![0; self.students.len()];
    }

    /// Pick a student using the thread-local RNG
    pub fn get_random_student(&mut self) -> Option<&Student> {
        let mut rng = rand::thread_rng();
        self.pick_with(&mut rng)
    }

    /// Pick a student.
    ///
    /// The previous pick is never returned twice in a row while the class
    /// has more than one student. When any student carries a weighting
    /// above 1 the draw is proportional to weighting; otherwise each
    /// candidate's weight is one more than the number of picks since they
    /// were last chosen, doubled for whoever has waited longest.
    pub fn pick_with<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<&Student> {
        match self.students.len() {
            0 => return None,
            1 => {
                self.reset_history();
                return self.students.first();
            }
            _ => {}
        }

        self.normalize_history();

        let candidates: Vec<usize> = (0..self.students.len())
            .filter(|&i| Some(i) != self.last_selected)
            .collect();

        let weights = if self.students.iter().any(|s| s.weighting() > 1) {
            self.weighting_weights(&candidates)
        } else {
            self.recency_weights(&candidates)
        };

        let picked = candidates[weighted_index(&weights, rng)];
        self.record_pick(picked);
        self.students.get(picked)
    }

    fn weighting_weights(&self, candidates: &[usize]) -> Vec<u64> {
        candidates
            .iter()
            .map(|&i| u64::from(self.students[i].weighting()))
            .collect()
    }

    /// `since_picked + 1` per candidate, doubled for those who have waited
    /// longest
    fn recency_weights(&self, candidates: &[usize]) -> Vec<u64> {
        let longest = candidates
            .iter()
            .map(|&i| self.since_picked[i])
            .max()
            .unwrap_or(0);
        candidates
            .iter()
            .map(|&i| {
                let waited = self.since_picked[i];
                let weight = u64::from(waited) + 1;
                if waited == longest {
                    weight * 2
                } else {
                    weight
                }
            })
            .collect()
    }

    fn record_pick(&mut self, picked: usize) {
        for (i, waited) in self.since_picked.iter_mut().enumerate() {
            if i == picked {
                *waited = 0;
            } else {
                *waited = waited.saturating_add(1);
            }
        }
        self.last_selected = Some(picked);
    }

    /// Keep the history vectors in step with the roster after a load
    pub(crate) fn normalize_history(&mut self) {
        if self.since_picked.len() != self.students.len() {
            self.since_picked.resize(self.students.len(), 0);
        }
        if matches!(self.last_selected, Some(i) if i >= self.students.len()) {
            self.last_selected = None;
        }
    }
}

/// Draw an index with probability proportional to its weight.
/// `weights` must be non-empty with a non-zero total.
fn weighted_index<R: Rng + ?Sized>(weights: &[u64], rng: &mut R) -> usize {
    let total: u64 = weights.iter().sum();
    let roll = rng.gen_range(0..total);

    let mut cumulative = 0;
    for (i, weight) in weights.iter().enumerate() {
        cumulative += weight;
        if roll < cumulative {
            return i;
        }
    }
    weights.len() - 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn class(names: &[&str]) -> StudentClass {
        StudentClass::from_names("Test", names.iter().copied())
    }

    #[test]
    fn test_empty_class_returns_none() {
        let mut c = class(&[]);
        let mut rng = StdRng::seed_from_u64(1);
        assert!(c.pick_with(&mut rng).is_none());
    }

    #[test]
    fn test_single_student_always_returned() {
        let mut c = class(&["Solo"]);
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..5 {
            assert_eq!(c.pick_with(&mut rng).unwrap().name(), "Solo");
        }
        assert!(c.last_selected().is_none());
    }

    #[test]
    fn test_two_students_alternate() {
        let mut c = class(&["A", "B"]);
        let mut rng = StdRng::seed_from_u64(7);
        let mut previous = c.pick_with(&mut rng).unwrap().name().to_string();
        for _ in 0..20 {
            let next = c.pick_with(&mut rng).unwrap().name().to_string();
            assert_ne!(next, previous);
            previous = next;
        }
    }

    #[test]
    fn test_history_counters_track_picks() {
        let mut c = class(&["A", "B", "C"]);
        let mut rng = StdRng::seed_from_u64(3);
        let picked = c.pick_with(&mut rng).unwrap().name().to_string();
        let idx = c.students().iter().position(|s| s.name() == picked).unwrap();

        for (i, waited) in c.since_picked.iter().enumerate() {
            if i == idx {
                assert_eq!(*waited, 0);
            } else {
                assert_eq!(*waited, 1);
            }
        }
        assert_eq!(c.last_selected().unwrap().name(), picked);
    }

    #[test]
    fn test_weighted_index_respects_bounds() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..200 {
            let i = weighted_index(&[1, 0, 5], &mut rng);
            assert!(i == 0 || i == 2);
        }
    }

    #[test]
    fn test_normalize_history_after_shrink() {
        let mut c = class(&["A", "B", "C"]);
        c.last_selected = Some(2);
        c.students.truncate(2);
        c.normalize_history();
        assert_eq!(c.since_picked.len(), 2);
        assert!(c.last_selected.is_none());
    }

    fn with_history(names: &[&str], since_picked: &[u32], last: usize) -> StudentClass {
        let mut c = class(names);
        c.since_picked = since_picked.to_vec();
        c.last_selected = Some(last);
        c
    }

    #[test]
    fn test_recency_weights_double_longest_wait() {
        let c = with_history(&["A", "B", "C", "D"], &[0, 3, 1, 3], 0);
        assert_eq!(c.recency_weights(&[1, 2, 3]), vec![8, 2, 8]);

        let fresh = class(&["A", "B", "C"]);
        assert_eq!(fresh.recency_weights(&[0, 1, 2]), vec![2, 2, 2]);
    }

    #[test]
    fn test_weighting_weights_use_suffix() {
        let c = class(&["A", "B4", "C2"]);
        assert_eq!(c.weighting_weights(&[1, 2]), vec![4, 2]);
    }

    #[test]
    fn test_recency_draw_follows_weights() {
        // Weights 8, 2, 8: C should come up about one draw in nine.
        // Without the doubling it would be one in five, uniform one in three.
        let start = with_history(&["A", "B", "C", "D"], &[0, 3, 1, 3], 0);
        let mut rng = StdRng::seed_from_u64(2024);

        let mut counts = [0u32; 4];
        for _ in 0..9000 {
            let mut c = start.clone();
            let name = c.pick_with(&mut rng).unwrap().name().to_string();
            let i = c.students().iter().position(|s| s.name() == name).unwrap();
            counts[i] += 1;
        }

        assert_eq!(counts[0], 0);
        assert!((800..=1200).contains(&counts[2]), "C picked {} times", counts[2]);
        assert!((3600..=4400).contains(&counts[1]), "B picked {} times", counts[1]);
        assert!((3600..=4400).contains(&counts[3]), "D picked {} times", counts[3]);
    }
}
