//! User profile supplied once per measurement session.

use crate::error::ProfileError;
use serde::Serialize;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    #[inline]
    pub const fn is_male(self) -> bool {
        matches!(self, Self::Male)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
        }
    }
}

impl FromStr for Sex {
    type Err = ProfileError;

    /// Accepts m, male, f, female in any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "m" | "male" => Ok(Self::Male),
            "f" | "female" => Ok(Self::Female),
            _ => Err(ProfileError::UnknownSex(s.to_string())),
        }
    }
}

impl std::fmt::Display for Sex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated profile: age in [10, 120] years, height in [100, 250] cm.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct UserProfile {
    age: u32,
    height_cm: f64,
    sex: Sex,
}

impl UserProfile {
    pub const AGE_RANGE: std::ops::RangeInclusive<u32> = 10..=120;
    pub const HEIGHT_RANGE_CM: std::ops::RangeInclusive<f64> = 100.0..=250.0;

    pub fn new(age: u32, height_cm: f64, sex: Sex) -> Result<Self, ProfileError> {
        if !Self::AGE_RANGE.contains(&age) {
            return Err(ProfileError::AgeOutOfRange(age));
        }
        if !Self::HEIGHT_RANGE_CM.contains(&height_cm) {
            return Err(ProfileError::HeightOutOfRange(height_cm));
        }
        Ok(Self {
            age,
            height_cm,
            sex,
        })
    }

    #[inline]
    pub const fn age(&self) -> u32 {
        self.age
    }
    #[inline]
    pub const fn height_cm(&self) -> f64 {
        self.height_cm
    }
    #[inline]
    pub const fn sex(&self) -> Sex {
        self.sex
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_sex_spellings() {
        assert_eq!("M".parse::<Sex>().unwrap(), Sex::Male);
        assert_eq!(" female ".parse::<Sex>().unwrap(), Sex::Female);
        assert!(matches!("x".parse::<Sex>(), Err(ProfileError::UnknownSex(_))));
    }

    #[test]
    fn rejects_out_of_range_profiles() {
        assert_eq!(
            UserProfile::new(9, 170.0, Sex::Male),
            Err(ProfileError::AgeOutOfRange(9))
        );
        assert_eq!(
            UserProfile::new(30, 99.5, Sex::Female),
            Err(ProfileError::HeightOutOfRange(99.5))
        );
        assert!(UserProfile::new(30, f64::NAN, Sex::Female).is_err());
        let p = UserProfile::new(120, 250.0, Sex::Female).unwrap();
        assert_eq!((p.age(), p.height_cm(), p.sex()), (120, 250.0, Sex::Female));
    }
}
