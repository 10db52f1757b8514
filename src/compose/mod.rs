pub mod mask;
pub mod spread;
