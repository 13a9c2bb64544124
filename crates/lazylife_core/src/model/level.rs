//! Cosmetic rank ladder derived from completed-task count.
//!
//! # Invariants
//! - `LEVELS` is sorted by strictly ascending threshold.
//! - The first level has threshold `0`, so every count maps to a level.

/// One rung of the level ladder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Level {
    pub name: &'static str,
    pub icon: &'static str,
    pub threshold: u64,
}

pub const LEVELS: &[Level] = &[
    Level {
        name: "Novice",
        icon: "award",
        threshold: 0,
    },
    Level {
        name: "Steadfast",
        icon: "zap",
        threshold: 21,
    },
    Level {
        name: "Ninja",
        icon: "star",
        threshold: 51,
    },
    Level {
        name: "Samurai",
        icon: "swords",
        threshold: 101,
    },
    Level {
        name: "Knight",
        icon: "shield",
        threshold: 221,
    },
];

/// Level position plus distance to the next rung.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelProgress {
    pub current: &'static Level,
    pub next: Option<&'static Level>,
    /// Percent of the way from `current` to `next`; `100.0` at the top rung.
    pub percent_to_next: f64,
    /// Completions still needed to reach `next`; `0` at the top rung.
    pub remaining: u64,
}

/// Returns the highest level whose threshold is `<= completed`.
pub fn level_for(completed: u64) -> &'static Level {
    LEVELS
        .iter()
        .rev()
        .find(|level| completed >= level.threshold)
        .unwrap_or(&LEVELS[0])
}

/// Computes the current level and progress toward the next one.
pub fn level_progress(completed: u64) -> LevelProgress {
    let index = LEVELS
        .iter()
        .rposition(|level| completed >= level.threshold)
        .unwrap_or(0);
    let current = &LEVELS[index];
    let next = LEVELS.get(index + 1);

    match next {
        Some(next) => {
            let span = (next.threshold - current.threshold) as f64;
            let done = completed.saturating_sub(current.threshold) as f64;
            LevelProgress {
                current,
                next: Some(next),
                percent_to_next: done / span * 100.0,
                remaining: next.threshold.saturating_sub(completed),
            }
        }
        None => LevelProgress {
            current,
            next: None,
            percent_to_next: 100.0,
            remaining: 0,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::{level_for, level_progress, LEVELS};

    #[test]
    fn thresholds_are_strictly_ascending() {
        assert_eq!(LEVELS[0].threshold, 0);
        assert!(LEVELS.windows(2).all(|w| w[0].threshold < w[1].threshold));
    }

    #[test]
    fn level_for_picks_highest_reached_threshold() {
        assert_eq!(level_for(0).name, "Novice");
        assert_eq!(level_for(20).name, "Novice");
        assert_eq!(level_for(21).name, "Steadfast");
        assert_eq!(level_for(50).name, "Steadfast");
        assert_eq!(level_for(51).name, "Ninja");
        assert_eq!(level_for(220).name, "Samurai");
        assert_eq!(level_for(10_000).name, "Knight");
    }

    #[test]
    fn progress_reports_distance_to_next_level() {
        let progress = level_progress(31);
        assert_eq!(progress.current.name, "Steadfast");
        assert_eq!(progress.next.map(|l| l.name), Some("Ninja"));
        assert_eq!(progress.remaining, 20);
        assert!((progress.percent_to_next - (10.0 / 30.0 * 100.0)).abs() < 1e-9);
    }

    #[test]
    fn top_level_is_complete() {
        let progress = level_progress(500);
        assert!(progress.next.is_none());
        assert_eq!(progress.percent_to_next, 100.0);
        assert_eq!(progress.remaining, 0);
    }
}
