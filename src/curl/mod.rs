pub mod parser;
pub mod tokenizer;

pub use parser::{clean_command, CurlParser};
