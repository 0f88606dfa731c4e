use strum::{AsRefStr, Display, EnumIter, EnumString};

use crate::{id::*, time::*, url::Url};

#[rustfmt::skip]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Company {
    pub id          : Id,
    pub name        : String,
    pub logo_url    : Option<Url>,
    pub data_access : DataAccess,
    pub created_at  : Timestamp,
}

/// Third-party data sources a company may enable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumString, AsRefStr, Display)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum DataSource {
    Zillow,
    Reportall,
    WealthEngine,
}

#[rustfmt::skip]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataAccess {
    pub zillow        : bool,
    pub reportall     : bool,
    pub wealth_engine : bool,
}

impl Default for DataAccess {
    fn default() -> Self {
        Self {
            zillow: true,
            reportall: true,
            wealth_engine: true,
        }
    }
}

impl DataAccess {
    pub fn allows(&self, source: DataSource) -> bool {
        match source {
            DataSource::Zillow => self.zillow,
            DataSource::Reportall => self.reportall,
            DataSource::WealthEngine => self.wealth_engine,
        }
    }

    pub fn set(&mut self, source: DataSource, enabled: bool) {
        let flag = match source {
            DataSource::Zillow => &mut self.zillow,
            DataSource::Reportall => &mut self.reportall,
            DataSource::WealthEngine => &mut self.wealth_engine,
        };
        *flag = enabled;
    }
}
