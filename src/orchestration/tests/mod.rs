//! Unit tests for backend orchestration.

mod domain_tests;
