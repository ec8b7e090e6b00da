pub mod config;
pub mod convert;
pub mod inspect;
pub mod render;
pub mod results;
pub mod sweep;
