use crate::classify::{Assessment, assess};
use crate::decoder::DecodedReading;
use crate::error::EstimationError;
use crate::estimator::{BodyComposition, estimate};
use crate::profile::UserProfile;
use serde::Serialize;
use serde_json::{Map, Value};

/// One published result: the stable reading, who stood on the scale, and
/// everything derived from it. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Measurement {
    pub reading: DecodedReading,
    pub profile: UserProfile,
    pub composition: BodyComposition,
    pub assessment: Assessment,
}

impl Measurement {
    /// Estimate and classify `reading`. Fails as a whole; there is no partial result.
    pub fn new(reading: DecodedReading, profile: UserProfile) -> Result<Self, EstimationError> {
        let composition = estimate(&reading, &profile)?;
        let assessment = assess(&composition, &profile, reading.weight_kg);
        Ok(Self {
            reading,
            profile,
            composition,
            assessment,
        })
    }

    /// Flat key/value view with every metric plus the inputs, as written to the reading log.
    pub fn metrics(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("weight_kg".into(), self.reading.weight_kg.into());
        map.insert("impedance".into(), self.reading.impedance_ohm.into());
        map.insert("age".into(), self.profile.age().into());
        map.insert("height_cm".into(), self.profile.height_cm().into());
        map.insert("sex".into(), self.profile.sex().as_str().into());
        if let Ok(Value::Object(metrics)) = serde_json::to_value(self.composition) {
            map.extend(metrics);
        }
        map
    }
}

/// Timestamp in the log format, local time.
pub fn now_timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}
