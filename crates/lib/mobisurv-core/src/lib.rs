#![forbid(unsafe_code)]

pub use hashbrown;
pub use indexmap;

pub mod direction;
pub mod hour;
pub mod modes;
pub mod poi;
pub mod similarity;
pub mod trip;
pub mod zone;
