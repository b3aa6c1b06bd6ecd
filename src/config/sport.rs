use serde::{Deserialize, Serialize};

/// A sport recognized by the resolver. Each carries its own sane defaults
/// for field size, goalkeeper count, and period structure.
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Debug, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sport {
    Basketball,
    Soccer,
    Afl,
    Oztag,
}

/// Per-sport baseline values, overridden by a [`crate::config::profile::Profile`]
/// overlay and then by explicit caller overrides, in that order.
pub struct SportDefaults {
    pub field_spots: u32,
    pub num_goalkeepers: u32,
    pub period_length_seconds: u64,
    pub num_periods: u32,
    pub has_period_breaks: bool,
    pub variance_goal_seconds: u64,
    pub min_stint_on_field_seconds: u64,
    pub max_stint_on_field_seconds: u64,
}

impl Sport {
    /// Look up this sport's baseline defaults.
    ///
    /// ### Example
    /// ```
    /// use rotation_core::config::sport::Sport;
    ///
    /// let defaults = Sport::Basketball.defaults();
    /// assert_eq!(defaults.field_spots, 5);
    /// ```
    pub fn defaults(&self) -> SportDefaults {
        match self {
            Sport::Basketball => SportDefaults {
                field_spots: 5,
                num_goalkeepers: 0,
                period_length_seconds: 600,
                num_periods: 4,
                has_period_breaks: false,
                variance_goal_seconds: 60,
                min_stint_on_field_seconds: 90,
                max_stint_on_field_seconds: 480,
            },
            Sport::Soccer => SportDefaults {
                field_spots: 11,
                num_goalkeepers: 1,
                period_length_seconds: 2400,
                num_periods: 2,
                has_period_breaks: false,
                variance_goal_seconds: 120,
                min_stint_on_field_seconds: 180,
                max_stint_on_field_seconds: 1800,
            },
            Sport::Afl => SportDefaults {
                field_spots: 15,
                num_goalkeepers: 0,
                period_length_seconds: 720,
                num_periods: 4,
                has_period_breaks: true,
                variance_goal_seconds: 150,
                min_stint_on_field_seconds: 180,
                max_stint_on_field_seconds: 900,
            },
            Sport::Oztag => SportDefaults {
                field_spots: 8,
                num_goalkeepers: 0,
                period_length_seconds: 1200,
                num_periods: 2,
                has_period_breaks: false,
                variance_goal_seconds: 90,
                min_stint_on_field_seconds: 120,
                max_stint_on_field_seconds: 900,
            },
        }
    }

    /// Minimum and maximum field spots this sport can be configured for.
    pub fn field_spots_range(&self) -> (u32, u32) {
        match self {
            Sport::Basketball => (5, 5),
            Sport::Soccer => (4, 11),
            Sport::Afl => (9, 15),
            Sport::Oztag => (8, 8),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basketball_has_no_goalkeeper() {
        assert_eq!(Sport::Basketball.defaults().num_goalkeepers, 0);
    }

    #[test]
    fn afl_has_period_breaks() {
        assert!(Sport::Afl.defaults().has_period_breaks);
    }

    #[test]
    fn soccer_field_spots_range_allows_variable_sizes() {
        let (lo, hi) = Sport::Soccer.field_spots_range();
        assert_eq!((lo, hi), (4, 11));
    }
}
