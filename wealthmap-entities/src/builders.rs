pub trait Builder {
    type Build;
    fn build() -> Self::Build;
}

pub use self::{property_builder::*, user_builder::*};

pub mod property_builder {

    use super::*;
    use crate::{geo::*, id::*, property::*, time::*};

    #[derive(Debug)]
    pub struct PropertyBuild {
        property: Property,
    }

    impl PropertyBuild {
        pub fn id(mut self, id: &str) -> Self {
            self.property.id = id.into();
            self
        }
        pub fn address(mut self, address: &str) -> Self {
            self.property.address = address.into();
            self
        }
        pub fn pos(mut self, pos: MapPoint) -> Self {
            self.property.pos = pos;
            self
        }
        pub fn lat_lng(self, lat: f64, lng: f64) -> Self {
            self.pos(MapPoint::from_lat_lng_deg(lat, lng))
        }
        pub fn size_sqft(mut self, size: u32) -> Self {
            self.property.size_sqft = Some(f64::from(size));
            self
        }
        pub fn value_usd(mut self, value: u64) -> Self {
            self.property.value_usd = Some(value as f64);
            self
        }
        pub fn owner_name(mut self, owner: &str) -> Self {
            self.property.owner_name = Some(owner.into());
            self
        }
        pub fn zip_code(mut self, zip: &str) -> Self {
            self.property.zip_code = zip.into();
            self
        }
        pub fn wealth_estimate(mut self, usd: u64, confidence: f64) -> Self {
            self.property.wealth_estimate = Some(WealthEstimate {
                usd: usd as f64,
                confidence: Some(confidence),
            });
            self
        }
        pub fn finish(self) -> Property {
            self.property
        }
    }

    impl Builder for Property {
        type Build = PropertyBuild;
        fn build() -> PropertyBuild {
            PropertyBuild {
                property: Property {
                    id: Id::new(),
                    address: String::new(),
                    pos: MapPoint::from_lat_lng_deg(0.0, 0.0),
                    size_sqft: None,
                    value_usd: None,
                    owner_name: None,
                    zip_code: String::new(),
                    wealth_estimate: None,
                    created_at: Timestamp::from_millis(0),
                },
            }
        }
    }
}

pub mod user_builder {

    use super::*;
    use crate::{email::*, id::*, time::*, user::*};

    #[derive(Debug)]
    pub struct UserBuild {
        user: User,
    }

    impl UserBuild {
        pub fn id(mut self, id: &str) -> Self {
            self.user.id = id.into();
            self
        }
        pub fn email(mut self, email: &str) -> Self {
            self.user.email = EmailAddress::new_unchecked(email.into());
            self
        }
        pub fn company(mut self, company_id: &str) -> Self {
            self.user.company_id = Some(company_id.into());
            self
        }
        pub fn finish(self) -> User {
            self.user
        }
    }

    impl Builder for User {
        type Build = UserBuild;
        fn build() -> UserBuild {
            UserBuild {
                user: User {
                    id: Id::new(),
                    email: EmailAddress::new_unchecked("user@example.com".into()),
                    company_id: None,
                    notification_prefs: NotificationPrefs::default(),
                    created_at: Timestamp::from_millis(0),
                },
            }
        }
    }
}
