//! Crate-level tests that exercise several modules at once.
//!
//! Unit tests for a single module live next to it; these build whole trees
//! and go through the public entry points (`evaluate`, `return_type`,
//! `Display`).

mod comprehension_tests;
mod evaluation_tests;
mod render_tests;
