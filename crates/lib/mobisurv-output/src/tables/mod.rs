pub mod city_patterns;
pub mod spread;
pub mod summary;
pub mod temporal;
pub mod trips;
pub mod trips_info;
pub mod validation;
pub mod zones;
