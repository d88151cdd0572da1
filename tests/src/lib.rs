//! # Wager Registry Test Suite
//!
//! Unified test crate driving the registry across crate boundaries.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/          # End-to-end flows
//!     ├── escrow_flows.rs   # deposit -> request -> resolve -> withdraw
//!     ├── direct_flows.rs   # enter_direct -> resolve_as_guardian
//!     └── admin_flows.rs    # beneficiary, roles, construction
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p registry-tests
//!
//! # By category
//! cargo test -p registry-tests integration::escrow_flows
//!
//! # Benchmarks
//! cargo bench -p registry-tests
//! ```

#![allow(dead_code)]
