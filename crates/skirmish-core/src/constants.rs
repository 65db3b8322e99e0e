//! Adjudication constants and tuning parameters.

/// Simulation tick rate (Hz).
pub const TICK_RATE: u32 = 30;

/// Seconds per tick.
pub const DT: f64 = 1.0 / TICK_RATE as f64;

// --- Kill classification windows ---

/// A death within this many seconds of the last damage is credited as a
/// clean kill / head-shot / kill-steal (exclusive boundary).
pub const HEADSHOT_WINDOW: f64 = 2.0;

/// If the second-most-recent attacker hit within this many seconds of the
/// death, the kill is a steal rather than a head-shot.
pub const KILLSTEAL_WINDOW: f64 = 5.0;

// --- Collision prediction ---

/// Maximum look-ahead when predicting time to closest point of approach
/// (seconds). Pairs with no crossing inside the horizon are "not imminent".
pub const CPA_HORIZON: f64 = 5.0;

/// Time-to-CPA threshold under which a pair is checked for a potential
/// collision (seconds).
pub const POTENTIAL_WINDOW: f64 = 1.0;

/// A potential-collision flag that has not re-triggered for this multiple of
/// `POTENTIAL_WINDOW` is cleared as stale.
pub const POTENTIAL_STALE_FACTOR: f64 = 2.0;

/// Separation threshold for flagging a potential collision, as a multiple of
/// the pair's combined radii.
pub const POTENTIAL_MARGIN: f64 = 2.0;

/// Separation threshold for matching a physics contact to a flagged pair,
/// as a multiple of the pair's combined radii.
pub const CONFIRM_MARGIN: f64 = 2.0;

// --- Collision settlement ---

/// Wait after a confirmed collision before trusting part-loss counts, so
/// secondary destruction effects have finished (seconds). Kept under
/// `HEADSHOT_WINDOW`: rams are stamped at confirmation time, and a victim
/// that died of the collision must still be classifiable as a clean kill.
pub const SETTLING_DELAY: f64 = 1.5;

/// Approach angles within this many degrees of dead-ahead on both sides make
/// a collision a mutual head-on.
pub const HEAD_ON_TOLERANCE_DEG: f64 = 20.0;
