//! Shared types for decant: the project-manifest data model and the
//! error/report model used across the project layer and the CLI.
//!
//! This crate is deliberately dependency-light. It defines the shape of a
//! `decant.yml` document and the structured errors that validation and
//! settings resolution produce; all behavior lives in `decant-project`.

pub mod error;
pub mod manifest;

pub use error::{SettingError, SettingErrorCategory, ValidationResult, ValidationStatus};
pub use manifest::{
    Capability, PluginDecl, PluginType, Plugins, ProjectManifest, SettingDecl, SettingKind,
};
