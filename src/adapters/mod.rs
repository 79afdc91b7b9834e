//! Adapters layer: Concrete implementations of ports.
//!
//! - `gbm`: gradient-boosted tree ensemble loaded from a JSON artifact
//! - `hospitals`: hospital list file
//! - `sanitize`: patient identifier filtering for logs

pub mod gbm;
pub mod hospitals;
pub mod sanitize;
