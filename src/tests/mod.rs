//! Crate-level behaviour tests that span several modules.

mod phase_tests;
