//! Integration tests for the winring window ordering service

mod command_flow;
mod config_integration;
mod scenario_replay;
mod sled_ordering;
mod test_utils;
