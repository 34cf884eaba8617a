//! # canto-core
//!
//! Core types and error types for canto.
//!
//! This crate provides the foundational types shared across all canto crates:
//! - Phrasebook entities (`Entry`, `EntryId`)
//! - Per-entry and per-section outcome enums
//! - Status and summary response types rendered by the CLI
//! - Cross-cutting error types

pub mod entities;
pub mod enums;
pub mod errors;
pub mod responses;
