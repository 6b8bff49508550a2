//! Scheduler phase flags and per-generator lifecycle flags.

bitflags::bitflags! {
    /// Phase register of a [`MotionMaster`][crate::MotionMaster].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct MotionMasterFlags: u8 {
        /// A tick is in progress.
        const UPDATE                        = 0x1;
        /// The default slot holds a static idle header that has not been
        /// initialized yet.
        const STATIC_INITIALIZATION_PENDING = 0x2;
        /// Not yet added to the world; every mutation is queued.
        const INITIALIZATION_PENDING        = 0x4;
        /// `add_to_world` is running.
        const INITIALIZING                  = 0x8;
        /// The owner's speed changed while a generator was checked out.
        const SPEED_CHANGE_PENDING          = 0x10;

        /// Direct mutation is forbidden while any of these is set.
        const DELAYED = Self::UPDATE.bits() | Self::INITIALIZATION_PENDING.bits();
    }
}

bitflags::bitflags! {
    /// Lifecycle flags of a single generator.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct GeneratorFlags: u16 {
        const INITIALIZATION_PENDING = 0x001;
        const INITIALIZED            = 0x002;
        const SPEED_UPDATE_PENDING   = 0x004;
        const INTERRUPTED            = 0x008;
        const PAUSED                 = 0x010;
        const TIMED_PAUSED           = 0x020;
        const DEACTIVATED            = 0x040;
        const INFORM_ENABLED         = 0x080;
        const FINALIZED              = 0x100;

        /// Cleared on every (re)initialization.
        const TRANSITORY = Self::SPEED_UPDATE_PENDING.bits() | Self::INTERRUPTED.bits();
    }
}
