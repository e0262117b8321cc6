//! Core enums used throughout the application.

use serde::{Deserialize, Serialize};

/// Posture-evaluation ruleset selected by the user.
///
/// The wire names match what the inference endpoint expects in the
/// `mode` field of a frame submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostureMode {
    #[default]
    Squat,
    Desk,
    Pushup,
    Lunge,
    YogaTpose,
}

impl PostureMode {
    /// Get the display name for this mode.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Squat => "Squat",
            Self::Desk => "Desk Sitting",
            Self::Pushup => "Pushup",
            Self::Lunge => "Lunge",
            Self::YogaTpose => "Yoga T-Pose",
        }
    }

    /// Get the wire name sent to the inference endpoint.
    pub fn wire_name(&self) -> &'static str {
        match self {
            Self::Squat => "squat",
            Self::Desk => "desk",
            Self::Pushup => "pushup",
            Self::Lunge => "lunge",
            Self::YogaTpose => "yoga_tpose",
        }
    }

    /// Parse from a wire name.
    pub fn from_wire(s: &str) -> Option<Self> {
        match s {
            "squat" => Some(Self::Squat),
            "desk" => Some(Self::Desk),
            "pushup" => Some(Self::Pushup),
            "lunge" => Some(Self::Lunge),
            "yoga_tpose" => Some(Self::YogaTpose),
            _ => None,
        }
    }

    /// Get all available modes.
    pub fn all() -> &'static [PostureMode] {
        &[
            Self::Squat,
            Self::Desk,
            Self::Pushup,
            Self::Lunge,
            Self::YogaTpose,
        ]
    }

    /// Create from index (for UI combo boxes).
    pub fn from_index(index: usize) -> Self {
        Self::all().get(index).copied().unwrap_or_default()
    }

    /// Get index of this mode (for UI combo boxes).
    pub fn to_index(&self) -> usize {
        Self::all().iter().position(|m| m == self).unwrap_or(0)
    }
}

impl std::fmt::Display for PostureMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Final status of one inference submission.
///
/// `NoPoseDetected` is a valid terminal outcome, not an error: the
/// service ran but found no subject in the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultStatus {
    Ok,
    NoPoseDetected,
    Error,
}

impl std::fmt::Display for ResultStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResultStatus::Ok => write!(f, "ok"),
            ResultStatus::NoPoseDetected => write!(f, "no_pose_detected"),
            ResultStatus::Error => write!(f, "error"),
        }
    }
}
