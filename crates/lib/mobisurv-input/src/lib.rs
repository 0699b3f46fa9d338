#![forbid(unsafe_code)]

pub mod columns;
pub mod pois;
pub mod report;
pub mod trips;
pub mod zones;
