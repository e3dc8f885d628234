//! Relay core library: domain types, team registry, configuration, errors.
//!
//! Public API surface:
//! - [`types`]: newtypes and the closed direction / category / mode enums
//! - [`registry`]: the team → sibling project mapping
//! - [`config`]: `relay.yaml` load / defaults / init
//! - [`error`]: [`RegistryError`]

pub mod config;
pub mod error;
pub mod registry;
pub mod types;

pub use config::RelayConfig;
pub use error::RegistryError;
pub use registry::TeamRegistry;
pub use types::{Category, Direction, ProjectDirName, SyncMode, TeamEntry, TeamName};
