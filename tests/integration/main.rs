//! Integration tests for the umibin library and its CLI command objects.
//!
//! These tests validate end-to-end workflows that span multiple modules,
//! from SAM input files on disk to the two report files.

mod helpers;
mod test_bin_command;
