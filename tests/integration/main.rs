#[path = "../common/mod.rs"]
mod common;

mod flow_tests;
