pub mod gateways;
pub mod geocache;
pub mod rate_limit;
pub mod repositories;
pub mod resolver;
pub mod usecases;

pub mod entities {
    pub use reqmap_entities::{address::*, geo::*, geocode::*, region::*, request::*};
}
