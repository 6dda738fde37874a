//! Path and URL utilities.
//!
//! Pure functions for path manipulation. No side effects.
//!
//! - [`fs`]: Filesystem path normalization (`normalize_path`, `rel_slash_path`)
//! - [`route`]: URL utilities (`is_external_link`, `has_markup_suffix`, `route_for_file`, `site_path`)

pub mod fs;
pub mod route;

pub use fs::{normalize_path, rel_slash_path};
