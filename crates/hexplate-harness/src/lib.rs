//! Shared fixtures and assertion helpers for pipeline tests.

pub mod assertions;
pub mod drawings;
