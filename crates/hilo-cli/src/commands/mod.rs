pub mod analyze;
pub mod classify;
pub mod config;
pub mod dispatch;
pub mod normalize;
pub mod scan;
pub mod schema;
pub mod sentiment;
