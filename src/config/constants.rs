//! Application-wide constants
//!
//! Centralized location for magic values to improve maintainability.

// =============================================================================
// Routing conventions
// =============================================================================

/// Controller used when the path has no controller segment
pub const DEFAULT_CONTROLLER: &str = "Home";

/// Action used when the path has no action segment
pub const DEFAULT_ACTION: &str = "Index";

/// Action rendering the success interstitial
pub const SUCCESS_PAGE_ACTION: &str = "SuccessPage";

/// Controller owning the success interstitial
pub const SUCCESS_PAGE_CONTROLLER: &str = "Home";

/// Seconds the success interstitial stays on screen by default
pub const DEFAULT_SUCCESS_WAIT_SECONDS: u32 = 3;

/// Action rendering the access denied page
pub const ACCESS_DENIED_ACTION: &str = "AccessDenied";

/// Controller owning the access denied page
pub const ACCESS_DENIED_CONTROLLER: &str = "Security";

/// View rendered for unknown routes
pub const PAGE_NOT_FOUND_VIEW: &str = "PageNotFound";

/// Folder searched for views shared across controllers
pub const SHARED_VIEW_FOLDER: &str = "Shared";

// =============================================================================
// Notifications
// =============================================================================

/// Namespace prefixed to notification keys
pub const DEFAULT_APP_NAMESPACE: &str = "app";

/// Middle segment of notification keys (`<namespace>.notifications.<severity>`)
pub const NOTIFICATIONS_SEGMENT: &str = "notifications";

/// Label passed to the error logger for exceptions surfaced as notifications
pub const ERROR_LOG_LABEL: &str = "Application error: ";

// =============================================================================
// Flash (cross-request carrier)
// =============================================================================

/// Cookie holding the flash session identifier
pub const FLASH_COOKIE_NAME: &str = "flash_id";

/// Cache key prefix for carried-over request data
pub const CACHE_PREFIX_FLASH: &str = "flash:";

/// Default lifetime of unread carried-over data in seconds
pub const DEFAULT_FLASH_TTL_SECONDS: u64 = 300;

// =============================================================================
// Localization
// =============================================================================

/// Culture used when the request does not name one
pub const DEFAULT_CULTURE: &str = "en-US";

/// Directory holding `<culture>.json` resource files
pub const DEFAULT_LOCALES_DIR: &str = "locales";

// =============================================================================
// Themes
// =============================================================================

/// Theme active at startup
pub const DEFAULT_THEME: &str = "default";

/// Themes the site ships views for
pub const KNOWN_THEMES: &[&str] = &[DEFAULT_THEME, "compact"];

// =============================================================================
// Server Configuration
// =============================================================================

/// Default server host address
pub const DEFAULT_SERVER_HOST: &str = "0.0.0.0";

/// Default server port
pub const DEFAULT_SERVER_PORT: u16 = 3000;
