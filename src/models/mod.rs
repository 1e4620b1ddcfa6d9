pub mod gemini;
pub mod solve;

pub use gemini::*;
pub use solve::*;
