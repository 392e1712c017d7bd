//! Data Transfer Objects for the orchestrator API
//!
//! These mirror the orchestrator's public JSON schema (PascalCase fields).

pub mod job;
