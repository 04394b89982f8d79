pub mod activity;
pub mod bounds;
pub mod climb;
pub mod segment;
