pub mod cast;
pub mod date_parser;
pub mod hasher;
