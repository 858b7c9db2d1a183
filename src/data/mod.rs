//! Data layer: core types, loading, and search/sort.
//!
//! Architecture:
//! ```text
//!  local .parquet ─┐        ┌─ http(s):// URL
//!                  ▼        ▼
//!   ┌───────────────────────────┐
//!   │  loader  direct → buffered │  parse bytes → Dataset
//!   └───────────────────────────┘
//!                  │
//!                  ▼
//!   ┌──────────────┐
//!   │   Dataset    │  ordered typed columns, Row accessors
//!   └──────────────┘
//!                  │
//!                  ▼
//!   ┌──────────┐
//!   │  filter   │  search / sort → visible row indices
//!   └──────────┘
//! ```

pub mod filter;
pub mod loader;
pub mod model;

pub use loader::{load, LoadError};
pub use model::{Column, ColumnKind, Dataset, Row, Value};
