//! Configuration system for krill.
//! TOML-based, layered resolution: overrides > env > project > user > defaults.

pub mod extract_config;
pub mod identifier_config;
pub mod krill_config;
pub mod resolve_config;

pub use extract_config::ExtractConfig;
pub use identifier_config::{EnvPlacement, IdentifierConfig};
pub use krill_config::{ConfigOverrides, KrillConfig};
pub use resolve_config::ResolveConfig;
