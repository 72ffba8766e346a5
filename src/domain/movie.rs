use crate::error::TheaterError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How long a purchased license stays valid.
///
/// Catalog data stores the model either by name or by its numeric code.
/// Anything else is rejected with `InvalidLicensingModel` when decoded, so
/// pricing never sees an unknown model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum LicensingModel {
    TwoDays,
    LifeLong,
}

impl LicensingModel {
    pub fn code(self) -> u8 {
        match self {
            LicensingModel::TwoDays => 1,
            LicensingModel::LifeLong => 2,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            LicensingModel::TwoDays => "TwoDays",
            LicensingModel::LifeLong => "LifeLong",
        }
    }
}

impl TryFrom<u8> for LicensingModel {
    type Error = TheaterError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(LicensingModel::TwoDays),
            2 => Ok(LicensingModel::LifeLong),
            other => Err(TheaterError::InvalidLicensingModel(other.to_string())),
        }
    }
}

impl FromStr for LicensingModel {
    type Err = TheaterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(code) = s.parse::<u8>() {
            return Self::try_from(code);
        }
        match s.to_ascii_lowercase().as_str() {
            "twodays" | "two_days" => Ok(LicensingModel::TwoDays),
            "lifelong" | "life_long" => Ok(LicensingModel::LifeLong),
            _ => Err(TheaterError::InvalidLicensingModel(s.to_string())),
        }
    }
}

impl TryFrom<String> for LicensingModel {
    type Error = TheaterError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<LicensingModel> for String {
    fn from(model: LicensingModel) -> Self {
        model.name().to_string()
    }
}

impl fmt::Display for LicensingModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movie {
    pub id: u64,
    pub name: String,
    pub licensing_model: LicensingModel,
}

impl Movie {
    pub fn new(id: u64, name: impl Into<String>, licensing_model: LicensingModel) -> Self {
        Self {
            id,
            name: name.into(),
            licensing_model,
        }
    }
}
