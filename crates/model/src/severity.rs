use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordinal risk severity, lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// All levels in ascending order.
    pub const ALL: &[Self] = &[Self::Low, Self::Medium, Self::High, Self::Critical];

    /// Lenient parse of an LLM-produced severity string.
    ///
    /// Case-insensitive; "info" collapses to low; anything unrecognized
    /// (including empty) falls back to medium so a sloppy analysis batch
    /// never poisons the ordinal math.
    #[must_use]
    pub fn normalize(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "low" | "info" => Self::Low,
            "high" => Self::High,
            "critical" => Self::Critical,
            _ => Self::Medium,
        }
    }

    /// Position on the ordinal scale (low = 0).
    #[must_use]
    pub const fn rank(self) -> usize {
        self as usize
    }

    /// Move `delta` steps along the scale, clamped to [low, critical].
    #[must_use]
    pub fn step_by(self, delta: i32) -> Self {
        let max = (Self::ALL.len() - 1) as i32;
        let idx = (self.rank() as i32 + delta).clamp(0, max);
        Self::ALL[idx as usize]
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
            Self::Critical => write!(f, "critical"),
        }
    }
}
