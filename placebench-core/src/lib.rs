//! Placebench Core
//!
//! Core types and abstractions for the placebench load driver.
//!
//! This crate contains:
//! - Domain types: parsed jobs, allocations, watch state and metric samples
//! - DTOs: the orchestrator's wire representation of jobs and responses
//! - Conversion from the parsed job form into the wire form

pub mod convert;
pub mod domain;
pub mod dto;

pub use convert::TranscodeError;
