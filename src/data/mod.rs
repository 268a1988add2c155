//! Data layer: record model, loading, the view pipeline, and export.
//!
//! Architecture:
//! ```text
//!  .csv / .tsv / .json / .parquet
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  parse file → StudentCollection (all-or-nothing)
//!   └──────────┘
//!        │
//!        ▼
//!   ┌───────────────────┐
//!   │ StudentCollection  │  Arc<[StudentRecord]>, immutable snapshot
//!   └───────────────────┘
//!        │
//!        ├──────────────► query::compute_statistics  (whole collection)
//!        ▼
//!   ┌──────────┐
//!   │  query    │  filter by label → stable sort → truncate to limit
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  export   │  filtered + sorted rows → .csv / .json
//!   └──────────┘
//! ```

pub mod export;
pub mod loader;
pub mod model;
pub mod query;
