use std::fmt;

use serde::Serialize;

/// What to do about a recommended concept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Action {
    #[serde(rename = "Re-teach")]
    ReTeach,
    #[serde(rename = "Add practice for")]
    AddPractice,
}

impl Action {
    /// `ReTeach` once the persistence rate reaches `threshold`.
    pub fn for_persistence(rate: f64, threshold: f64) -> Self {
        if rate >= threshold {
            Self::ReTeach
        } else {
            Self::AddPractice
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::ReTeach => "Re-teach",
            Self::AddPractice => "Add practice for",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_is_inclusive() {
        assert_eq!(Action::for_persistence(0.2, 0.2), Action::ReTeach);
        assert_eq!(Action::for_persistence(0.19, 0.2), Action::AddPractice);
        assert_eq!(Action::AddPractice.to_string(), "Add practice for");
    }
}
