//! MVC layer - Request-scoped controller and its helpers.
//!
//! - **controller**: the per-request `Controller` extractor and `ActionResult`
//! - **context**: memoized service lookup for one request
//! - **data**: `ViewData` / `TempData` bags
//! - **notifications**: two-scope user notifications
//! - **routing**: controller/action names and redirects
//! - **views**: view lookup and askama-backed rendering
//! - **themes**: site-wide theme selection

pub mod context;
pub mod controller;
pub mod data;
pub mod notifications;
pub mod routing;
pub mod themes;
pub mod views;

pub use context::ServiceCache;
pub use controller::{ActionResult, Collaborators, Controller};
pub use data::{CarriedOver, DataBag, TempData, ViewData};
pub use notifications::{notification_key, NotificationEntry, NotificationScope, NotificationSet, NotifyType};
pub use routing::{RedirectInstruction, RouteData, SuccessRedirect};
pub use themes::{ActiveTheme, ThemeRegistry};
pub use views::{template_view, TemplateView, View, ViewContext, ViewEngine, ViewRegistry};
