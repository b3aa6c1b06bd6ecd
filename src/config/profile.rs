use serde::{Deserialize, Serialize};

/// A named tuning overlay applied on top of a sport's defaults.
///
/// Profiles never introduce new options; they only nudge the numeric
/// defaults a sport already carries (see [`Profile::overlay`]).
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Debug, Hash, Serialize, Deserialize)]
pub enum Profile {
    FairnessFirst,
    Balanced,
    Competitive,
    ProStyle,
    YouthBeginner,
    YouthCompetitive,
    AdultSocial,
    /// No overlay; only explicit overrides and sport defaults apply.
    Custom,
}

/// Multiplicative/additive nudges a profile applies over sport defaults.
/// Every field is a ratio or delta, never an absolute value, so the same
/// overlay works across sports with very different baselines.
#[derive(Clone, Copy, Debug)]
pub struct ProfileOverlay {
    pub variance_goal_multiplier: f64,
    pub max_early_variance_multiplier: f64,
    pub min_stint_multiplier: f64,
    pub max_stint_multiplier: f64,
    pub ideal_shifts_per_player: Option<u32>,
    pub auto_confirm_rotations: bool,
}

impl Profile {
    /// The overlay this profile applies to a sport's defaults.
    ///
    /// ### Example
    /// ```
    /// use rotation_core::config::profile::Profile;
    ///
    /// let overlay = Profile::FairnessFirst.overlay();
    /// assert!(overlay.variance_goal_multiplier < 1.0);
    /// ```
    pub fn overlay(&self) -> ProfileOverlay {
        match self {
            Profile::FairnessFirst => ProfileOverlay {
                variance_goal_multiplier: 0.5,
                max_early_variance_multiplier: 1.5,
                min_stint_multiplier: 0.8,
                max_stint_multiplier: 0.8,
                ideal_shifts_per_player: Some(5),
                auto_confirm_rotations: false,
            },
            Profile::Balanced => ProfileOverlay {
                variance_goal_multiplier: 1.0,
                max_early_variance_multiplier: 2.0,
                min_stint_multiplier: 1.0,
                max_stint_multiplier: 1.0,
                ideal_shifts_per_player: None,
                auto_confirm_rotations: false,
            },
            Profile::Competitive => ProfileOverlay {
                variance_goal_multiplier: 1.5,
                max_early_variance_multiplier: 2.5,
                min_stint_multiplier: 1.2,
                max_stint_multiplier: 1.3,
                ideal_shifts_per_player: Some(3),
                auto_confirm_rotations: false,
            },
            Profile::ProStyle => ProfileOverlay {
                variance_goal_multiplier: 2.5,
                max_early_variance_multiplier: 3.5,
                min_stint_multiplier: 1.5,
                max_stint_multiplier: 1.8,
                ideal_shifts_per_player: Some(2),
                auto_confirm_rotations: false,
            },
            Profile::YouthBeginner => ProfileOverlay {
                variance_goal_multiplier: 0.4,
                max_early_variance_multiplier: 1.2,
                min_stint_multiplier: 0.6,
                max_stint_multiplier: 0.7,
                ideal_shifts_per_player: Some(6),
                auto_confirm_rotations: true,
            },
            Profile::YouthCompetitive => ProfileOverlay {
                variance_goal_multiplier: 0.7,
                max_early_variance_multiplier: 1.6,
                min_stint_multiplier: 0.9,
                max_stint_multiplier: 0.9,
                ideal_shifts_per_player: Some(4),
                auto_confirm_rotations: false,
            },
            Profile::AdultSocial => ProfileOverlay {
                variance_goal_multiplier: 0.6,
                max_early_variance_multiplier: 1.4,
                min_stint_multiplier: 0.9,
                max_stint_multiplier: 0.9,
                ideal_shifts_per_player: Some(5),
                auto_confirm_rotations: true,
            },
            Profile::Custom => ProfileOverlay {
                variance_goal_multiplier: 1.0,
                max_early_variance_multiplier: 2.0,
                min_stint_multiplier: 1.0,
                max_stint_multiplier: 1.0,
                ideal_shifts_per_player: None,
                auto_confirm_rotations: false,
            },
        }
    }
}
