//! API middleware.

mod flash;
mod https;
mod theme;

pub use flash::flash_middleware;
pub use https::https_middleware;
pub use theme::theme_middleware;
