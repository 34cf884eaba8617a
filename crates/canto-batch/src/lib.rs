//! # canto-batch
//!
//! The audio workflow of canto:
//! - [`loader`] reads a section's entries from its JSON data file
//! - [`reconcile`] compares expected entries against the audio directory
//! - [`generate`] synthesizes and writes the artifacts that are missing
//!
//! Paths are resolved through [`SectionLayout`], built from the project root
//! and the `library` configuration section.

pub mod generate;
pub mod layout;
pub mod loader;
pub mod reconcile;

pub use generate::{GenerateOptions, GenerationObserver, Generator, NoopObserver};
pub use layout::SectionLayout;
pub use loader::{LoadError, load_section};
pub use reconcile::{check_all, check_section, missing_sections};
