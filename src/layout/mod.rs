pub mod book;
pub mod diagnostics;
pub mod engine;
pub mod frames;
pub mod model;
pub mod policy;
pub mod shot;
