//! Core library for testmat
//!
//! This crate implements the **Functional Core** of the testmat application,
//! following the Functional Core - Imperative Shell architectural pattern.
//!
//! - **`testmat_core`** (this crate): Pure transformation functions with zero I/O
//! - **`testmat`**: I/O operations and orchestration (the Imperative Shell)
//!
//! All functions here are deterministic, perform no I/O, and can be tested
//! with plain fixture data — no mocking required. The shell crate owns the
//! HTTP client, the session credential, the CLI, and the MCP server, and
//! funnels every API response through this crate before it reaches the
//! caller.
//!
//! # Module Organization
//!
//! - [`resource`]: the generic `{id, attributes}` resource and its response
//!   envelope parsing
//! - [`markup`]: the resource → semantic markup renderer
//! - [`render`]: collection/single result text rendering (headings, empty
//!   sentences)
//! - [`fields`]: per-resource-kind field projections
//! - [`params`]: query-parameter expansion (`key[]` arrays, `filter[sub]`
//!   maps)
//! - [`tags`]: `@tag` extraction from titles, tag merging, search-query
//!   classification

pub mod fields;
pub mod markup;
pub mod params;
pub mod render;
pub mod resource;
pub mod tags;
