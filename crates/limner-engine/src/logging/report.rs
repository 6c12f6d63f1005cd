use std::fmt;
use std::str::FromStr;

/// Severity of a reported condition, lowest first.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ReportLevel {
    Debug,
    Note,
    Warning,
    Error,
}

impl ReportLevel {
    const ALL: [ReportLevel; 4] = [
        ReportLevel::Debug,
        ReportLevel::Note,
        ReportLevel::Warning,
        ReportLevel::Error,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for ReportLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ReportLevel::Debug => "debug",
            ReportLevel::Note => "note",
            ReportLevel::Warning => "warning",
            ReportLevel::Error => "error",
        };
        f.write_str(s)
    }
}

impl FromStr for ReportLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debug" => Ok(ReportLevel::Debug),
            "note" | "info" => Ok(ReportLevel::Note),
            "warning" | "warn" => Ok(ReportLevel::Warning),
            "error" => Ok(ReportLevel::Error),
            other => Err(format!("unknown report level {other:?}")),
        }
    }
}

/// Which reports are emitted and which are fatal.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ReportPolicy {
    /// Reports below this level are counted but not logged.
    pub min_level: ReportLevel,
    /// Reports at or above this level stop the sketch.
    pub fatal_level: ReportLevel,
}

impl Default for ReportPolicy {
    fn default() -> Self {
        Self {
            min_level: ReportLevel::Note,
            fatal_level: ReportLevel::Error,
        }
    }
}

/// Leveled reporter for drawing-time conditions.
///
/// Every call is counted; nothing is deduplicated, so a backend failing on
/// every frame produces one warning per frame.
#[derive(Debug, Default)]
pub struct Reporter {
    policy: ReportPolicy,
    counts: [u64; 4],
}

impl Reporter {
    pub fn new(policy: ReportPolicy) -> Self {
        Self { policy, counts: [0; 4] }
    }

    pub fn policy(&self) -> ReportPolicy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: ReportPolicy) {
        self.policy = policy;
    }

    /// Records and (depending on policy) logs a condition.
    ///
    /// Returns `true` when the condition is fatal under the current policy.
    pub fn report(&mut self, level: ReportLevel, message: impl fmt::Display) -> bool {
        self.counts[level.index()] += 1;

        if level >= self.policy.min_level {
            match level {
                ReportLevel::Debug => log::debug!(target: "limner", "{message}"),
                ReportLevel::Note => log::info!(target: "limner", "{message}"),
                ReportLevel::Warning => log::warn!(target: "limner", "{message}"),
                ReportLevel::Error => log::error!(target: "limner", "{message}"),
            }
        }

        level >= self.policy.fatal_level
    }

    /// Number of reports recorded at exactly `level`.
    pub fn count(&self, level: ReportLevel) -> u64 {
        self.counts[level.index()]
    }

    /// Total reports across all levels.
    pub fn total(&self) -> u64 {
        ReportLevel::ALL.iter().map(|l| self.count(*l)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_warnings_are_all_counted() {
        let mut r = Reporter::default();
        for _ in 0..5 {
            assert!(!r.report(ReportLevel::Warning, "same failure"));
        }
        assert_eq!(r.count(ReportLevel::Warning), 5);
        assert_eq!(r.total(), 5);
    }

    #[test]
    fn only_error_is_fatal_by_default() {
        let mut r = Reporter::default();
        assert!(!r.report(ReportLevel::Debug, "d"));
        assert!(!r.report(ReportLevel::Note, "n"));
        assert!(!r.report(ReportLevel::Warning, "w"));
        assert!(r.report(ReportLevel::Error, "e"));
    }

    #[test]
    fn fatal_level_is_configurable() {
        let mut r = Reporter::new(ReportPolicy {
            min_level: ReportLevel::Debug,
            fatal_level: ReportLevel::Warning,
        });
        assert!(r.report(ReportLevel::Warning, "w"));
        assert!(!r.report(ReportLevel::Note, "n"));
    }

    #[test]
    fn level_parses_aliases() {
        assert_eq!("warn".parse::<ReportLevel>(), Ok(ReportLevel::Warning));
        assert_eq!(" Note ".parse::<ReportLevel>(), Ok(ReportLevel::Note));
        assert!("loud".parse::<ReportLevel>().is_err());
    }
}
