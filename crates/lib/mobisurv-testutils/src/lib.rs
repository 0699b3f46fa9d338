pub mod scratch;
pub mod survey;
pub mod zones;
