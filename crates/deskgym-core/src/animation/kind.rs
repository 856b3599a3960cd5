use serde::{Deserialize, Serialize};

/// Frames per animation row. Every row of the spritesheet has the same length.
pub const FRAMES_PER_ANIMATION: usize = 16;

/// Every animation the character can play.
///
/// Discriminants match the spritesheet row of the animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimationKind {
    Coffee = 0,
    Wave = 1,
    PumpUp = 2,
    ChairDips = 3,
    ArmCircles = 4,
    /// Looking around without the mug.
    Wondering = 5,
    KneeRaises = 6,
    SpinalTwist = 7,
    GluteSqueeze = 8,
    ShoulderRolls = 9,
    LegExtensions = 10,
    NeckStretch = 11,
    DeskPushUps = 12,
    Squats = 13,
    CalfRaises = 14,
    WallSit = 15,
    TorsoRotation = 16,
    ReverseLunges = 17,
}

impl AnimationKind {
    /// All animations in row order.
    pub const ALL: [AnimationKind; 18] = [
        AnimationKind::Coffee,
        AnimationKind::Wave,
        AnimationKind::PumpUp,
        AnimationKind::ChairDips,
        AnimationKind::ArmCircles,
        AnimationKind::Wondering,
        AnimationKind::KneeRaises,
        AnimationKind::SpinalTwist,
        AnimationKind::GluteSqueeze,
        AnimationKind::ShoulderRolls,
        AnimationKind::LegExtensions,
        AnimationKind::NeckStretch,
        AnimationKind::DeskPushUps,
        AnimationKind::Squats,
        AnimationKind::CalfRaises,
        AnimationKind::WallSit,
        AnimationKind::TorsoRotation,
        AnimationKind::ReverseLunges,
    ];

    pub fn from_row(row: usize) -> Option<Self> {
        Self::ALL.get(row).copied()
    }

    pub fn row(self) -> usize {
        self as usize
    }

    pub fn frame_count(self) -> usize {
        FRAMES_PER_ANIMATION
    }

    /// Exercise rows are everything except the two ambient idles, the wave and the pump-up.
    pub fn is_exercise(self) -> bool {
        !matches!(
            self,
            AnimationKind::Coffee
                | AnimationKind::Wave
                | AnimationKind::PumpUp
                | AnimationKind::Wondering
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            AnimationKind::Coffee => "Coffee",
            AnimationKind::Wave => "Wave",
            AnimationKind::PumpUp => "PumpUp",
            AnimationKind::ChairDips => "ChairDips",
            AnimationKind::ArmCircles => "ArmCircles",
            AnimationKind::Wondering => "Wondering",
            AnimationKind::KneeRaises => "KneeRaises",
            AnimationKind::SpinalTwist => "SpinalTwist",
            AnimationKind::GluteSqueeze => "GluteSqueeze",
            AnimationKind::ShoulderRolls => "ShoulderRolls",
            AnimationKind::LegExtensions => "LegExtensions",
            AnimationKind::NeckStretch => "NeckStretch",
            AnimationKind::DeskPushUps => "DeskPushUps",
            AnimationKind::Squats => "Squats",
            AnimationKind::CalfRaises => "CalfRaises",
            AnimationKind::WallSit => "WallSit",
            AnimationKind::TorsoRotation => "TorsoRotation",
            AnimationKind::ReverseLunges => "ReverseLunges",
        }
    }
}

impl std::fmt::Display for AnimationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_round_trip_through_from_row() {
        for kind in AnimationKind::ALL {
            assert_eq!(AnimationKind::from_row(kind.row()), Some(kind));
        }
        assert_eq!(AnimationKind::from_row(18), None);
    }

    #[test]
    fn fourteen_exercise_rows() {
        let count = AnimationKind::ALL.iter().filter(|k| k.is_exercise()).count();
        assert_eq!(count, 14);
        assert!(!AnimationKind::Wondering.is_exercise());
        assert!(AnimationKind::Squats.is_exercise());
    }
}
