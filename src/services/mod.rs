//! Per-service clients.

pub mod compute;
pub mod dashboard;
pub mod eventhub;
pub mod resources;
