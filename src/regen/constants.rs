//! Regeneration tick limits

/// Messages shown as on-screen notifications per tick
pub const MAX_NOTIFICATIONS_PER_TICK: usize = 10;

/// Messages written to the log per tick; the rest are counted and dropped
pub const MAX_LOGGED_MESSAGES_PER_TICK: usize = 100;
