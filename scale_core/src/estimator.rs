//! BIA body-composition estimator.
//!
//! One ordered pass: base quantities (BMI, FFM, fat %, bone mass, BMR) are
//! computed once, clamped, and every dependent metric reuses them. Floats are
//! rounded with `round5`; integer metrics are rounded then clamped.

use crate::decoder::DecodedReading;
use crate::error::EstimationError;
use crate::profile::{Sex, UserProfile};
use crate::util::{round1, round5, round_clamp_u8};
use serde::Serialize;

/// Frozen estimator output. All masses in kg, percentages in %, BMR in kcal/day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BodyComposition {
    pub bmi: f64,
    pub fat_percent: f64,
    pub fat_mass: f64,
    pub muscle_percent: f64,
    pub muscle_mass: f64,
    pub skeletal_muscle_percent: f64,
    pub water_percent: f64,
    pub water_mass: f64,
    pub bone_mass: f64,
    pub bone_percent: f64,
    pub protein_percent: f64,
    pub protein_mass: f64,
    pub visceral_fat_level: u8,
    pub visceral_fat_area: f64,
    pub visceral_fat_mass: f64,
    pub bmr: f64,
    pub metabolic_age: u8,
    pub subcutaneous_fat_percent: f64,
    pub subcutaneous_fat_mass: f64,
    pub fat_free_weight: f64,
    pub body_surface_area: f64,
    pub ideal_body_weight: f64,
    pub standard_weight: f64,
    pub weight_control: f64,
    pub fat_control: f64,
    pub muscle_control: f64,
    pub body_score: u8,
    pub ffmi: f64,
}

/// Sex-dependent constants.
struct Norms {
    bone_factor: f64,
    muscle_range: (f64, f64),
    water_range: (f64, f64),
    bmr_offset: f64,
    ref_bmr: f64,
    target_fat_percent: f64,
    ibw_base: f64,
}

const MALE: Norms = Norms {
    bone_factor: 1.1,
    muscle_range: (33.0, 52.0),
    water_range: (50.0, 65.0),
    bmr_offset: 5.0,
    ref_bmr: 1500.0,
    target_fat_percent: 12.0,
    ibw_base: 50.0,
};

const FEMALE: Norms = Norms {
    bone_factor: 0.9,
    muscle_range: (24.0, 42.0),
    water_range: (45.0, 60.0),
    bmr_offset: -161.0,
    ref_bmr: 1200.0,
    target_fat_percent: 22.0,
    ibw_base: 45.5,
};

const fn norms(sex: Sex) -> &'static Norms {
    match sex {
        Sex::Male => &MALE,
        Sex::Female => &FEMALE,
    }
}

/// Target body-fat percentage used for fat control and the body score.
pub const fn target_fat_percent(sex: Sex) -> f64 {
    norms(sex).target_fat_percent
}

pub fn estimate(
    reading: &DecodedReading,
    profile: &UserProfile,
) -> Result<BodyComposition, EstimationError> {
    estimate_raw(
        reading.weight_kg,
        profile.height_cm(),
        profile.age(),
        profile.sex(),
        reading.impedance_ohm,
    )
}

/// Estimate from raw arguments. Does not validate the profile ranges.
pub fn estimate_raw(
    weight_kg: f64,
    height_cm: f64,
    age: u32,
    sex: Sex,
    impedance_ohm: f64,
) -> Result<BodyComposition, EstimationError> {
    let usable = |x: f64| x.is_finite() && x > 0.0;
    if !usable(weight_kg) || !usable(height_cm) || !impedance_ohm.is_finite() || impedance_ohm < 0.0
    {
        tracing::debug!(weight_kg, height_cm, impedance_ohm, "unusable estimator input");
        return Err(EstimationError::DegenerateInput);
    }

    let n = norms(sex);
    let w = weight_kg;
    let h = height_cm;
    let age = f64::from(age);
    let h_m2 = (h / 100.0) * (h / 100.0);

    let bmi = round5(w / h_m2).clamp(1.0, 90.0);

    let ffm = fat_free_mass(w, h, age, impedance_ohm);
    let fat_percent = round5(100.0 * (w - ffm).max(0.0) / w).clamp(5.0, 50.0);
    let fat_mass = round5(w * fat_percent / 100.0);

    let bone_mass = round5(0.042 * w * n.bone_factor).clamp(1.0, 5.0);
    let bone_percent = round5(100.0 * bone_mass / w);

    // Non-positive remaining share means bone alone outweighs the body.
    let tissue_share = 100.0 - fat_percent - bone_percent;
    if tissue_share <= 0.0 {
        tracing::debug!(weight_kg, fat_percent, bone_percent, "no tissue share left for muscle");
        return Err(EstimationError::DegenerateInput);
    }
    let muscle_percent = round5(tissue_share.clamp(n.muscle_range.0, n.muscle_range.1));
    let muscle_mass = round5(w * muscle_percent / 100.0);
    if fat_percent == 0.0 || muscle_percent == 0.0 || muscle_mass == 0.0 {
        return Err(EstimationError::DegenerateInput);
    }
    let skeletal_muscle_percent = round5(0.7 * muscle_percent);

    let water_percent = round5(73.0 * ffm / w).clamp(n.water_range.0, n.water_range.1);
    let water_mass = round5(w * water_percent / 100.0);

    let protein_percent = round5((0.412 * muscle_percent).clamp(12.0, 18.0));
    let protein_mass = round5(w * protein_percent / 100.0);

    let visceral_fat_level = round_clamp_u8(0.1 * fat_percent + 0.05 * bmi - 1.0, 1, 20);
    let visceral_fat_area = round5(5.9 * f64::from(visceral_fat_level));
    let visceral_fat_mass = round5(f64::from(visceral_fat_level) * w / 100.0);

    let bmr = round1(10.0 * w + 6.25 * h - 5.0 * age + n.bmr_offset).clamp(500.0, 5000.0);
    let metabolic_age = round_clamp_u8(age + (bmr - n.ref_bmr) / 38.0 - 3.0, 16, 100);

    let subcutaneous_fat_percent = round5(0.99 * fat_percent);
    let subcutaneous_fat_mass = round5(w * subcutaneous_fat_percent / 100.0);

    let fat_free_weight = round5(w - fat_mass);
    let body_surface_area = round5(0.007_184 * h.powf(0.725) * w.powf(0.425));
    let ideal_body_weight = round5(n.ibw_base + 2.3 * (h / 2.54 - 60.0));
    let standard_weight = round5(22.0 * h_m2);
    let weight_control = round5(standard_weight - w);
    let fat_control = round5(round5(w * n.target_fat_percent / 100.0) - fat_mass);
    let muscle_control = round5(round5(w * 45.0 / 100.0) - muscle_mass);

    let body_score = round_clamp_u8(
        100.0 - (bmi - 22.0).abs() * 1.2 - (fat_percent - n.target_fat_percent).abs() * 1.5,
        0,
        100,
    );
    let ffmi = round5((w - fat_mass) / h_m2);

    Ok(BodyComposition {
        bmi,
        fat_percent,
        fat_mass,
        muscle_percent,
        muscle_mass,
        skeletal_muscle_percent,
        water_percent,
        water_mass,
        bone_mass,
        bone_percent,
        protein_percent,
        protein_mass,
        visceral_fat_level,
        visceral_fat_area,
        visceral_fat_mass,
        bmr,
        metabolic_age,
        subcutaneous_fat_percent,
        subcutaneous_fat_mass,
        fat_free_weight,
        body_surface_area,
        ideal_body_weight,
        standard_weight,
        weight_control,
        fat_control,
        muscle_control,
        body_score,
        ffmi,
    })
}

/// Fat-free mass (kg). Without impedance the 80 % fallback applies; otherwise
/// the BIA regression bounded to `[0.5 * weight, weight - 1]`, lower bound winning.
fn fat_free_mass(weight: f64, height: f64, age: f64, impedance: f64) -> f64 {
    if impedance == 0.0 {
        return 0.8 * weight;
    }
    let ffm = 0.7374 * (height * height / impedance) + 0.1763 * weight - 0.1773 * age - 2.4658;
    ffm.min(weight - 1.0).max(0.5 * weight)
}
