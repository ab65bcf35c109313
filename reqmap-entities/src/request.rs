use crate::{
    address::{Address, AddressKey},
    geo::MapPoint,
};
use time::PrimitiveDateTime;

/// Category label of requests without a category.
pub const UNSPECIFIED_CATEGORY: &str = "unspecified";

/// A row of a tabular data source before any validation.
///
/// Empty cells are represented as `None`.
#[rustfmt::skip]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawServiceRequest {
    pub street     : Option<String>,
    pub house      : Option<String>,
    pub category   : Option<String>,
    pub created_at : Option<String>,
    pub count      : Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceRequest {
    pub address: Address,
    pub category: String,
    pub created_at: PrimitiveDateTime,
    pub count: u64,
    /// Only available after the address has been resolved.
    pub pos: Option<MapPoint>,
}

impl ServiceRequest {
    pub fn address_key(&self) -> AddressKey {
        self.address.key()
    }

    pub fn into_located(self) -> Option<LocatedRequest> {
        let Self {
            address,
            category,
            created_at,
            count,
            pos,
        } = self;
        pos.map(|pos| LocatedRequest {
            address,
            category,
            created_at,
            count,
            pos,
        })
    }
}

/// A service request with a resolved position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedRequest {
    pub address: Address,
    pub category: String,
    pub created_at: PrimitiveDateTime,
    pub count: u64,
    pub pos: MapPoint,
}
