pub mod changed;
pub mod classify;
pub mod cli;
pub mod error;
pub mod markdown;
pub mod model;
pub mod overall;
pub mod packages;
pub mod parsers;
pub mod report;
