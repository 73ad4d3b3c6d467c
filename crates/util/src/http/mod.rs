pub mod envelope;
pub mod parser;

pub use envelope::*;
pub use parser::*;
