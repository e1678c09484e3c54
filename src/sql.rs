// SQL module - filter expression parsing

pub mod cursor;
pub mod error;
pub mod parser;

pub use cursor::Cursor;
pub use error::{ParseError, ParseResult};
pub use parser::{parse, Parser};
