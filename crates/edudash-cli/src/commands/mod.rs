pub mod lists;
pub mod records;
pub mod screens;
pub mod utils;
