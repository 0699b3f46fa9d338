#![forbid(unsafe_code)]

pub mod cities;
pub mod city_patterns;
pub mod select;
pub mod spread;
pub mod summary;
pub mod temporal;
