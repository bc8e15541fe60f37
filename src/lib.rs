//! # campus-events
//!
//! REST backend for a college event portal.
//!
//! Students list events and register; administrators create and delete
//! events and review participants. The only correctness-critical piece is
//! the registration transaction: it checks an event's capacity and, in one
//! atomic step, records the registration and increments the event's
//! `registered` counter, retrying on write conflicts.
//!
//! ## Architecture
//!
//! ```text
//! View layer (browser)
//!     │
//!     ├── REST Handlers (api/)
//!     │
//!     ├── PortalService (service/)
//!     │
//!     ├── DocumentStore (store/)
//!     │     ├── PostgresStore   live, optimistic CAS + retry
//!     │     ├── MemoryStore     in process, same semantics
//!     │     └── DemoStore       static dataset, writes rejected
//!     │
//!     └── Domain records (domain/)
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod service;
pub mod store;
