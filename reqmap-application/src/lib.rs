#[macro_use]
extern crate log;

mod generate_map;

pub mod prelude {
    pub use super::generate_map::*;
}

pub mod error;

pub type Result<T> = std::result::Result<T, error::AppError>;

pub(crate) use reqmap_core::{repositories::*, usecases};

#[cfg(test)]
pub(crate) mod tests;
