//! Common utilities shared by the RTF interpreter and its producers.

pub mod encoding;
