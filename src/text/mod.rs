pub mod font;
pub mod measure;
pub mod wrap;
