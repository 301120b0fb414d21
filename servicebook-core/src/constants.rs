/// Days ahead scanned for weekly and custom-date responsibilities.
pub const DEFAULT_HORIZON_DAYS: u32 = 150;

/// Calendar months (including the current one) scanned for monthly responsibilities.
pub const DEFAULT_HORIZON_MONTHS: u32 = 6;

/// Maximum number of occurrences returned by the upcoming view.
pub const DEFAULT_UPCOMING_LIMIT: usize = 50;

/// PIN used until the stored state carries its own.
pub const DEFAULT_PIN: &str = "7865";

/// Required PIN length (digits only).
pub const PIN_LENGTH: usize = 4;

/// How far ahead the dashboard looks for appointments.
pub const APPOINTMENT_WINDOW_MONTHS: u32 = 3;

/// Number of services shown as "recent".
pub const RECENT_SERVICES: usize = 5;

/// Blob key holding the whole application state.
pub const STATE_KEY: &str = "service-tracker-state";

/// Blob key holding the unlocked flag.
pub const UNLOCK_KEY: &str = "service-tracker-unlocked";
