// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests Module
//!
//! - `entity_merges`: Ranger role and zone merges never drop state they do not own
//! - `naming`: path joining and entity name sanitization

mod entity_merges;
mod naming;
