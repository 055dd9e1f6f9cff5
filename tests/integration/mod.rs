//! Integration Tests Module
//!
//! End-to-end checks across the workspace crates: the analysis session over
//! a scripted engine, and the Gemini engine against a local HTTP stub.

// Session pipeline tests (prompt -> transport -> validate -> classify)
mod analysis_flow_test;

// Gemini wire protocol tests
mod gemini_wire_test;
