pub mod cmd;
pub mod common;

mod utils;
