pub trait Builder {
    type Build;
    fn build() -> Self::Build;
}

pub use self::service_request_builder::*;

pub mod service_request_builder {

    use super::*;
    use crate::{address::*, geo::*, request::*};
    use time::{macros::datetime, PrimitiveDateTime};

    #[derive(Debug)]
    pub struct ServiceRequestBuild {
        request: ServiceRequest,
    }

    impl ServiceRequestBuild {
        pub fn street(mut self, street: &str) -> Self {
            self.request.address.street = street.into();
            self
        }
        pub fn house(mut self, house: &str) -> Self {
            self.request.address.house = house.into();
            self
        }
        pub fn category(mut self, category: &str) -> Self {
            self.request.category = category.into();
            self
        }
        pub fn created_at(mut self, created_at: PrimitiveDateTime) -> Self {
            self.request.created_at = created_at;
            self
        }
        pub fn count(mut self, count: u64) -> Self {
            self.request.count = count;
            self
        }
        pub fn pos(mut self, pos: MapPoint) -> Self {
            self.request.pos = Some(pos);
            self
        }
        pub fn finish(self) -> ServiceRequest {
            self.request
        }
    }

    impl Builder for ServiceRequest {
        type Build = ServiceRequestBuild;
        fn build() -> ServiceRequestBuild {
            ServiceRequestBuild {
                request: ServiceRequest {
                    address: Address::new("Street", "1"),
                    category: UNSPECIFIED_CATEGORY.into(),
                    created_at: datetime!(2025-06-01 12:00),
                    count: 1,
                    pos: None,
                },
            }
        }
    }
}
