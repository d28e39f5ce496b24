pub mod dash_consts {
    //! Dashboard Configuration Constants
    //!
    //! This module contains all configuration constants for the dashboard,
    //! organized by functional area for clarity.

    // =============================================================================
    // QUEUE CONFIGURATION
    // =============================================================================

    /// The maximum number of events to keep in the activity logs.
    pub const MAX_ACTIVITY_LOGS: usize = 100;

    /// Maximum number of buffered events between workers and the UI.
    pub const EVENT_QUEUE_SIZE: usize = 100;

    // =============================================================================
    // BACKEND CONFIGURATION
    // =============================================================================

    /// Backend used when nothing else is configured.
    pub const DEFAULT_API_URL: &str = "http://localhost:8000";

    /// Environment variable that overrides the configured backend.
    pub const API_URL_ENV_VAR: &str = "SHADOW_REALM_API_URL";

    /// Directory (under the user's home) holding the config file.
    pub const CONFIG_DIR: &str = ".shadow-realm";

    /// Config file name inside [`CONFIG_DIR`].
    pub const CONFIG_FILE: &str = "config.json";

    /// Refresh cadence configuration
    pub mod refresh {
        use std::time::Duration;

        /// Interval between refresh cycles (milliseconds)
        pub const INTERVAL_MS: u64 = 30_000;

        /// Number of ticks and extrinsics requested per cycle
        pub const FETCH_LIMIT: u32 = 50;

        /// Upper bound accepted for a configured fetch limit
        pub const MAX_FETCH_LIMIT: u32 = 1_000;

        /// Helper function to get the refresh interval
        pub const fn interval() -> Duration {
            Duration::from_millis(INTERVAL_MS)
        }
    }

    // =============================================================================
    // PRESENTATION CONFIGURATION
    // =============================================================================

    /// Derived dataset and table sizes
    pub mod view {
        /// Number of most recent ticks plotted on the balance chart.
        pub const BALANCE_SERIES_LEN: usize = 20;

        /// Number of rows shown in each of the "recent" tables.
        pub const RECENT_ROWS: usize = 10;

        /// Histogram group used for extrinsics without a function name.
        pub const UNKNOWN_FUNCTION: &str = "unknown";

        /// Smallest units per whole token for `amount_staked`.
        pub const UNITS_PER_TOKEN: f64 = 1_000_000_000.0;

        /// How long the splash screen stays up before the dashboard.
        pub const SPLASH_SECS: u64 = 2;
    }
}
