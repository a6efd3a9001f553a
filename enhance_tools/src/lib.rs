pub mod cli;
pub mod extract;
pub mod manifest;
pub mod records;
pub mod sanity;
