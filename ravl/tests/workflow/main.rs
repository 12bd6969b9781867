//! Integration tests: full validation-loop turns through `RavlRunner`.
//!
//! Capabilities are scripted (`StageLlm`, `StaticRetriever`); no network.

#[path = "../init_logging.rs"]
mod init_logging;

mod common;

mod failures;
mod loop_bounds;
mod scenarios;
mod streaming;
