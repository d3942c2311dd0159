// Unit tests for the compiler's building blocks, through the public API.
#[path = "../common/mod.rs"]
mod common;

mod metadata_registry_tests;
mod traversal_ir_tests;
