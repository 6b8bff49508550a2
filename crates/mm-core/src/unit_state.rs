//! Entity-state bits a unit carries.
//!
//! Movement generators contribute some of these while they are active
//! ("base state"); the scheduler reference-counts contributions per bit so a
//! bit is only cleared when its last contributor leaves.

bitflags::bitflags! {
    /// Aggregate state bit set of one unit.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct UnitState: u32 {
        const DIED            = 1 << 0;
        const MELEE_ATTACKING = 1 << 1;
        const STUNNED         = 1 << 3;
        const ROAMING         = 1 << 4;
        const CHASE           = 1 << 5;
        const FLEEING         = 1 << 7;
        const IN_FLIGHT       = 1 << 8;
        const FOLLOW          = 1 << 9;
        const ROOT            = 1 << 10;
        const CONFUSED        = 1 << 11;
        const DISTRACTED      = 1 << 12;
        const CASTING         = 1 << 15;
        const CHARGING        = 1 << 18;
        const JUMPING         = 1 << 19;
        const MOVE            = 1 << 21;
        const ROTATING        = 1 << 22;
        const EVADE           = 1 << 23;
        const ROAMING_MOVE    = 1 << 24;
        const CONFUSED_MOVE   = 1 << 25;
        const FLEEING_MOVE    = 1 << 26;
        const CHASE_MOVE      = 1 << 27;
        const FOLLOW_MOVE     = 1 << 28;

        /// Any of these stops a unit from starting new movement.
        const NOT_MOVE = Self::ROOT.bits() | Self::STUNNED.bits() | Self::DIED.bits()
            | Self::DISTRACTED.bits();
    }
}

impl UnitState {
    /// Iterate the individual bits set in `self`.
    pub fn single_bits(self) -> impl Iterator<Item = UnitState> {
        let bits = self.bits();
        (0..u32::BITS)
            .map(|i| 1u32 << i)
            .filter(move |b| bits & b != 0)
            .map(UnitState::from_bits_retain)
    }
}
