//! Configuration section definitions.
//!
//! Each module corresponds to a section in `ig-gate.toml`:
//!
//! | Module     | TOML Section   | Purpose                                  |
//! |------------|----------------|------------------------------------------|
//! | `site`     | `[site]`       | Public site origin                       |
//! | `corpus`   | `[corpus]`     | Page enumeration (excludes, suffixes)    |
//! | `registry` | `[registry]`   | Registry, sitemap and mirror locations   |
//! | `rules`    | `[rules]`      | Per-rule failure levels                  |

mod corpus;
mod registry;
mod rules;
mod site;

pub use corpus::CorpusConfig;
pub use registry::RegistryConfig;
pub use rules::{RuleLevel, RulesConfig};
pub use site::SiteConfig;
