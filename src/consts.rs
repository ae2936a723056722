pub mod cli_consts {
    //! Client Configuration Constants
    //!
    //! This module contains the tunables of the client,
    //! organized by functional area for clarity and maintainability.

    // =============================================================================
    // QUEUE CONFIGURATION
    // =============================================================================

    /// The maximum number of events to keep in the activity logs.
    pub const MAX_ACTIVITY_LOGS: usize = 100;

    /// Maximum number of buffered activity events between regions and the UI.
    pub const EVENT_QUEUE_SIZE: usize = 100;

    // =============================================================================
    // REGION CONFIGURATION
    // =============================================================================

    /// Loadable region behaviour
    pub mod region {
        /// Maximum number of manual retries offered after a failed load
        pub const MAX_RETRIES: u32 = 2;

        /// Placeholder shown when the server answers 204
        pub const NO_DATA_TEXT: &str = "Not enough data";

        /// Placeholder shown for any failed load
        pub const FAILED_TEXT: &str = "Failed loading data";

        /// Shown by the recipe counter when the count cannot be loaded
        pub const UNKNOWN_COUNT_TEXT: &str = "?";
    }

    // =============================================================================
    // INPUT CONFIGURATION
    // =============================================================================

    /// Debounce configuration for text and slider input
    pub mod debounce {
        use std::time::Duration;

        /// Quiet interval after the last keystroke in a search box (milliseconds)
        pub const SEARCH_QUIET_MS: u64 = 500;

        /// Quiet interval after the last slider move (milliseconds)
        pub const SLIDER_QUIET_MS: u64 = 500;

        /// Helper function to get the search quiet interval
        pub const fn search_quiet() -> Duration {
            Duration::from_millis(SEARCH_QUIET_MS)
        }

        /// Helper function to get the slider quiet interval
        pub const fn slider_quiet() -> Duration {
            Duration::from_millis(SLIDER_QUIET_MS)
        }
    }

    // =============================================================================
    // NETWORK CONFIGURATION
    // =============================================================================

    /// HTTP client configuration
    pub mod http {
        use std::time::Duration;

        /// Connect timeout for site requests (seconds)
        pub const CONNECT_TIMEOUT_SECS: u64 = 10;

        /// Total request timeout for site requests (seconds)
        /// Chart rendering on the server can be slow for wide filters
        pub const REQUEST_TIMEOUT_SECS: u64 = 30;

        pub const fn connect_timeout() -> Duration {
            Duration::from_secs(CONNECT_TIMEOUT_SECS)
        }

        pub const fn request_timeout() -> Duration {
            Duration::from_secs(REQUEST_TIMEOUT_SECS)
        }
    }

    // =============================================================================
    // ANALYZER CONFIGURATION
    // =============================================================================

    /// Analyzer endpoints and page metadata
    pub mod analyzer {
        /// Path of the analyzer page, used as the history URL
        pub const PAGE_PATH: &str = "/analyze/";

        /// Title pushed together with every history update
        pub const PAGE_TITLE: &str = "Custom Analysis | Beer-Analytics";

        /// Entities (styles and ingredients) feeding the set filters
        pub const ENTITIES_PATH: &str = "/analyze/entities.json";

        /// Number of recipes matching the current state
        pub const COUNT_PATH: &str = "/analyze/count.json";

        /// Endpoint of a single analyzer chart
        pub fn chart_path(chart_id: &str) -> String {
            format!("/analyze/charts/{}.json", chart_id)
        }
    }

    // =============================================================================
    // SESSION CONFIGURATION
    // =============================================================================

    /// Command session tunables
    pub mod session {
        use std::time::Duration;

        /// How long a headless command waits for its regions (seconds)
        pub const HEADLESS_TIMEOUT_SECS: u64 = 120;

        /// Interval between telemetry deliveries (seconds)
        pub const TELEMETRY_FLUSH_SECS: u64 = 10;

        /// Width used when printing panels outside the terminal UI
        pub const HEADLESS_WIDTH: usize = 80;

        pub const fn headless_timeout() -> Duration {
            Duration::from_secs(HEADLESS_TIMEOUT_SECS)
        }

        pub const fn telemetry_flush_interval() -> Duration {
            Duration::from_secs(TELEMETRY_FLUSH_SECS)
        }
    }
}
