/// Store key holding the JSON array of push subscriptions.
pub const SUBSCRIPTIONS_KEY: &str = "subscriptions";

/// Store key holding the JSON array of programs seen at the end of the last cycle.
pub const SNAPSHOT_KEY: &str = "programs";

/// Lifetime of a VAPID token, counted from signing time.
pub const VAPID_TOKEN_TTL_SECS: i64 = 12 * 60 * 60;

/// `TTL` header sent with every push message (seconds the push service may queue it).
pub const PUSH_TTL_SECS: u32 = 86_400;

/// Default number of push deliveries in flight per cycle.
pub const DEFAULT_PUSH_CONCURRENCY: usize = 8;

/// Default upper bound on a single push delivery.
pub const DEFAULT_PUSH_TIMEOUT_MS: u64 = 10_000;

pub const NOTIFICATION_TITLE: &str = "New YSWS Programs Available!";

pub const DEFAULT_NOTIFICATION_URL: &str = "https://ysws-tracker.pages.dev";
