//! Integration tests for the processor module
//!
//! Tests the batch conversion pipeline against TSF files written to
//! temporary directories.
