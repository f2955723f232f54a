pub mod export;
pub mod history;
pub mod reader;
pub mod response_parser;
pub mod writer;
