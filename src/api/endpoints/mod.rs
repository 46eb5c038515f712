//! API endpoint handlers, one module per resource.

pub mod demand;
pub mod disease;
pub mod health;
pub mod invoice;
pub mod merge;
pub mod metadata;
pub mod risk;
pub mod update;
