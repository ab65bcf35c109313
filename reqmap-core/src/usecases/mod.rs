mod error;
mod filter_requests;
mod prepare_requests;
mod render_map;
mod resolve_positions;

#[cfg(test)]
pub mod tests;

pub use self::{
    error::Error, filter_requests::*, prepare_requests::*, render_map::*, resolve_positions::*,
};

mod prelude {
    pub use super::error::Error;
    pub type Result<T> = std::result::Result<T, Error>;
    pub use crate::{entities::*, repositories::*};
}
