// Integration tests: SQL select trees compiled against a graph schema, and
// compiled queries streamed through the execution bridge.
#[path = "../common/mod.rs"]
mod common;

mod schema_config_tests;
mod translation_tests;
