//! Movement speed classes shared by every movement-related crate.

/// Which of a unit's speeds a spline travels at.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MoveType {
    /// Walking pace (wandering, confused, scripted walk nodes).
    Walk,
    /// Running pace (the default for targeted movement).
    #[default]
    Run,
    /// Flight pace (taxi paths, flying creatures).
    Flight,
}

impl MoveType {
    /// Human-readable label, useful for CSV column values.
    pub fn as_str(self) -> &'static str {
        match self {
            MoveType::Walk   => "walk",
            MoveType::Run    => "run",
            MoveType::Flight => "flight",
        }
    }

    /// Parse the label produced by [`as_str`][Self::as_str].
    pub fn parse(s: &str) -> Option<MoveType> {
        match s.trim() {
            "walk"   => Some(MoveType::Walk),
            "run"    => Some(MoveType::Run),
            "flight" => Some(MoveType::Flight),
            _        => None,
        }
    }
}

impl std::fmt::Display for MoveType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
