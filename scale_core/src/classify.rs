//! Per-metric classification bands, body type and goals.
//!
//! Pure functions over an already-validated `BodyComposition`. Bounds are the
//! printed table values taken literally. Where two printed bands leave a gap,
//! the value falls through to the last branch: a BMI of 24.95 or 29.95 reads
//! as "above average".

use crate::estimator::BodyComposition;
use crate::profile::{Sex, UserProfile};
use serde::Serialize;

/// Emitted as the only goal when nothing needs attention.
pub const NOMINAL_GOAL: &str =
    "All of your metrics are in good shape. Keep up the healthy habits!";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Band {
    Athletic,
    Excellent,
    Standard,
    NeedsBoost,
    Younger,
    Older,
    OutOfRange,
}

impl Band {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Athletic => "Athletic",
            Self::Excellent => "Excellent",
            Self::Standard => "Standard",
            Self::NeedsBoost => "Needs Boost",
            Self::Younger => "Younger",
            Self::Older => "Older",
            Self::OutOfRange => "Out of Range",
        }
    }
}

impl std::fmt::Display for Band {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A band plus the advice shown next to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rating {
    pub band: Band,
    pub message: String,
}

impl Rating {
    fn new(band: Band, message: impl Into<String>) -> Self {
        Self {
            band,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyType {
    Lean,
    Balanced,
    Rounded,
}

impl BodyType {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Lean => "Slim/Lean (ectomorph-like)",
            Self::Balanced => "Athletic/Balanced (mesomorph-like)",
            Self::Rounded => "Rounded/Strong (endomorph-like)",
        }
    }
}

/// Classifier output for one measurement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assessment {
    pub weight: Rating,
    pub bmi: Rating,
    pub fat_percent: Rating,
    pub muscle_percent: Rating,
    pub subcutaneous_fat_percent: Band,
    pub muscle_mass: Band,
    pub skeletal_muscle_percent: Band,
    pub water_percent: Band,
    pub bone_mass: Band,
    pub protein_percent: Band,
    pub protein_mass: Band,
    pub visceral_fat_level: Band,
    pub bmr: Band,
    pub metabolic_age: Band,
    pub body_surface_area: Band,
    pub ideal_body_weight: Band,
    pub ffmi: Band,
    pub body_type: BodyType,
    pub body_insight: String,
    /// Never empty: holds `NOMINAL_GOAL` alone when no goal applies.
    pub goals: Vec<String>,
}

/// Below `lo` needs a boost, inside is standard, above is athletic.
fn band_rising(value: f64, lo: f64, hi: f64) -> Band {
    if value < lo {
        Band::NeedsBoost
    } else if value <= hi {
        Band::Standard
    } else {
        Band::Athletic
    }
}

/// Below `lo` is athletic, inside is standard, above needs a boost.
fn band_falling(value: f64, lo: f64, hi: f64) -> Band {
    if value < lo {
        Band::Athletic
    } else if value <= hi {
        Band::Standard
    } else {
        Band::NeedsBoost
    }
}

fn in_range(value: f64, (lo, hi): (f64, f64)) -> bool {
    (lo..=hi).contains(&value)
}

const fn weight_range(sex: Sex) -> (f64, f64) {
    match sex {
        Sex::Male => (50.0, 90.0),
        Sex::Female => (40.0, 80.0),
    }
}

const fn pick(sex: Sex, male: (f64, f64), female: (f64, f64)) -> (f64, f64) {
    match sex {
        Sex::Male => male,
        Sex::Female => female,
    }
}

pub fn classify_weight(weight_kg: f64, sex: Sex, height_cm: f64) -> Rating {
    let (lo, hi) = weight_range(sex);
    let frame = if height_cm > 175.0 { "tall frame" } else { "height" };
    if weight_kg < lo {
        Rating::new(
            Band::Athletic,
            format!("Your weight is on the light side for your {frame}, which suits an active lifestyle. Nutrient-rich snacks such as nuts or protein shakes help you build strength."),
        )
    } else if weight_kg > hi {
        let frame = if height_cm < 160.0 { "compact frame" } else { "height" };
        Rating::new(
            Band::NeedsBoost,
            format!("Your weight is on the high side for your {frame}. Daily walks and balanced meals are easy first steps toward more energy."),
        )
    } else {
        Rating::new(
            Band::Standard,
            format!("Your weight sits well for your {frame}. Your current habits are working, so keep them going."),
        )
    }
}

pub fn classify_bmi(bmi: f64) -> Rating {
    if bmi < 18.5 {
        Rating::new(
            Band::NeedsBoost,
            "Your BMI is a little low, which can sap energy. Nutrient-dense foods like yogurt or avocado plus light exercise will help.",
        )
    } else if bmi <= 24.9 {
        Rating::new(
            Band::Standard,
            "Your BMI is in the healthy range. Balanced meals and regular activity keep it there.",
        )
    } else if (25.0..=29.9).contains(&bmi) {
        Rating::new(
            Band::NeedsBoost,
            "Your BMI is slightly high. Walking more and adding vegetables to your plate can make a real difference.",
        )
    } else {
        Rating::new(
            Band::NeedsBoost,
            "Your BMI is above average. Small daily changes, like a walk or more water, add up over time.",
        )
    }
}

pub fn classify_fat_percent(fat_percent: f64, sex: Sex, age: u32) -> Rating {
    let older = age > 50;
    let (athletic_below, excellent_below, standard_max) = match sex {
        Sex::Male => (6.0, 14.0, 20.0),
        Sex::Female => (14.0, 21.0, 30.0),
    };
    if fat_percent < athletic_below {
        Rating::new(
            Band::Athletic,
            "Your body fat is very low. Include healthy fats such as olive oil or nuts to keep your energy up.",
        )
    } else if fat_percent < excellent_below {
        Rating::new(
            Band::Excellent,
            "Your body fat is in a fit, healthy range. Keep up your active routine.",
        )
    } else if fat_percent <= standard_max {
        Rating::new(
            Band::Standard,
            "Your body fat is typical and healthy. Steady nutrition and exercise will maintain it.",
        )
    } else {
        let activity = match (sex, older) {
            (Sex::Male, true) => "light strength training",
            (Sex::Male, false) => "cardio such as brisk walking",
            (Sex::Female, true) => "yoga or swimming",
            (Sex::Female, false) => "interval training or walking",
        };
        Rating::new(
            Band::NeedsBoost,
            format!("Your body fat is above the typical range. Try {activity} and more fiber-rich foods to shift toward lean mass."),
        )
    }
}

pub fn classify_muscle_percent(muscle_percent: f64, sex: Sex, age: u32) -> Rating {
    let older = age > 50;
    let (lo, hi) = pick(sex, (33.0, 52.0), (24.0, 42.0));
    if muscle_percent < lo {
        let exercise = match (sex, older) {
            (Sex::Male, true) => "gentle resistance bands",
            (Sex::Male, false) => "squats or light weights",
            (Sex::Female, true) => "yoga or walking",
            (Sex::Female, false) => "body-weight exercises",
        };
        Rating::new(
            Band::NeedsBoost,
            format!("Your muscle level has room to grow. Start with {exercise} three times a week."),
        )
    } else if muscle_percent <= hi {
        Rating::new(
            Band::Standard,
            "Your muscle level supports daily life well. Stay active to keep it.",
        )
    } else {
        Rating::new(
            Band::Athletic,
            "Your muscle level is outstanding and backs your strength and mobility.",
        )
    }
}

pub fn body_type(bmi: f64, fat_percent: f64, muscle_percent: f64, sex: Sex) -> BodyType {
    let (lean_fat, muscle_floor, fat_ceiling, muscle_ceiling) = match sex {
        Sex::Male => (13.0, 33.0, 20.0, 52.0),
        Sex::Female => (20.0, 24.0, 30.0, 42.0),
    };
    if bmi < 18.5 || (fat_percent < lean_fat && muscle_percent < muscle_floor) {
        BodyType::Lean
    } else if ((18.5..=24.9).contains(&bmi)
        && fat_percent <= fat_ceiling
        && muscle_percent >= muscle_floor)
        || muscle_percent > muscle_ceiling
    {
        BodyType::Balanced
    } else {
        BodyType::Rounded
    }
}

fn body_insight(kind: BodyType, profile: &UserProfile, weight_kg: f64) -> String {
    let age = profile.age();
    let height = profile.height_cm();
    let older = age > 50;
    match kind {
        BodyType::Lean => format!(
            "A lean build usually means a fast metabolism. {} calorie-dense foods and {} build strength; aim for {}.",
            if age < 40 { "At your age," } else { "Even now," },
            if older { "gentle resistance work" } else { "strength training" },
            if weight_kg < 70.0 {
                "2,500+ kcal a day"
            } else {
                "about 500 kcal above maintenance"
            },
        ),
        BodyType::Balanced => format!(
            "A balanced build is naturally strong{}. Mix cardio with {} and aim for 2,000-2,500 kcal of balanced nutrients.",
            if height > 175.0 { " on a tall frame" } else { "" },
            match (profile.sex(), age < 50) {
                (Sex::Male, true) => "heavy compound lifts",
                (_, _) if older => "light weights",
                _ => "Pilates or body-weight moves",
            },
        ),
        BodyType::Rounded => format!(
            "A rounded, strong build carries more mass{}. Low-impact activity like {} and fiber-rich meals around 1,800-2,200 kcal boost energy.",
            if height < 160.0 { " on a compact frame" } else { "" },
            if older { "swimming or yoga" } else { "walking or cycling" },
        ),
    }
}

fn goals(
    c: &BodyComposition,
    profile: &UserProfile,
    bmi: &Rating,
    fat: &Rating,
    muscle: &Rating,
) -> Vec<String> {
    let older = profile.age() > 50;
    let mut out = Vec::new();
    if bmi.band == Band::NeedsBoost {
        if c.bmi < 18.5 {
            out.push(format!(
                "BMI ({:.1}): gain 0.5-1 kg per month with nutrient-dense meals and {}. Check with a doctor if the weight loss was unexpected.",
                c.bmi,
                if older { "gentle resistance work" } else { "strength training three times a week" },
            ));
        } else {
            out.push(format!(
                "BMI ({:.1}): lose 0.5-1 kg per month by trimming about 500 kcal a day and {}.",
                c.bmi,
                if older { "walking regularly" } else { "getting 150 minutes of activity a week" },
            ));
        }
    }
    if muscle.band == Band::NeedsBoost {
        out.push(format!(
            "Muscle ({:.1}%): build 0.5-1 kg per month with {} three times a week and 25-40 g protein per meal.",
            c.muscle_percent,
            if older { "light weights or bands" } else { "squats and push-ups" },
        ));
    }
    if fat.band == Band::NeedsBoost {
        out.push(format!(
            "Body fat ({:.1}%): reduce 1-2 % per month with {} and high-protein, high-fiber meals.",
            c.fat_percent,
            if older { "low-impact cardio" } else { "150 minutes of cardio a week" },
        ));
    }
    if out.is_empty() {
        out.push(NOMINAL_GOAL.to_string());
    }
    out
}

/// Classify every metric of `c` for `profile`.
pub fn assess(c: &BodyComposition, profile: &UserProfile, weight_kg: f64) -> Assessment {
    let sex = profile.sex();
    let age = profile.age();

    let weight = classify_weight(weight_kg, sex, profile.height_cm());
    let bmi = classify_bmi(c.bmi);
    let fat_percent = classify_fat_percent(c.fat_percent, sex, age);
    let muscle_percent = classify_muscle_percent(c.muscle_percent, sex, age);

    let (sub_lo, sub_hi) = pick(sex, (10.0, 20.0), (15.0, 25.0));
    let (mm_lo, mm_hi) = pick(sex, (35.0, 50.0), (25.0, 40.0));
    let (sk_lo, sk_hi) = pick(sex, (23.0, 36.0), (17.0, 29.0));
    let water_ok = pick(sex, (50.0, 65.0), (45.0, 60.0));
    let (bone_lo, bone_hi) = pick(sex, (2.5, 4.0), (2.0, 3.5));
    let (pp_lo, pp_hi) = pick(sex, (15.0, 20.0), (12.0, 18.0));
    let (pm_lo, pm_hi) = pick(sex, (12.0, 18.0), (10.0, 15.0));
    let (bmr_lo, bmr_hi) = pick(sex, (1600.0, 2200.0), (1200.0, 1800.0));
    let (bsa_lo, bsa_hi) = pick(sex, (1.7, 2.2), (1.5, 1.9));
    let (ffmi_lo, ffmi_hi) = pick(sex, (17.0, 25.0), (14.0, 20.0));

    let metabolic_age = {
        let diff = i64::from(c.metabolic_age) - i64::from(age);
        if diff < -5 {
            Band::Younger
        } else if diff <= 5 {
            Band::Standard
        } else {
            Band::Older
        }
    };
    let visceral_fat_level = match c.visceral_fat_level {
        0..=9 => Band::Athletic,
        10..=12 => Band::Standard,
        _ => Band::NeedsBoost,
    };

    let body_type = body_type(c.bmi, c.fat_percent, c.muscle_percent, sex);
    let body_insight = body_insight(body_type, profile, weight_kg);
    let goals = goals(c, profile, &bmi, &fat_percent, &muscle_percent);

    Assessment {
        subcutaneous_fat_percent: band_falling(c.subcutaneous_fat_percent, sub_lo, sub_hi),
        muscle_mass: band_rising(c.muscle_mass, mm_lo, mm_hi),
        skeletal_muscle_percent: band_rising(c.skeletal_muscle_percent, sk_lo, sk_hi),
        water_percent: if in_range(c.water_percent, water_ok) {
            Band::Standard
        } else {
            Band::NeedsBoost
        },
        bone_mass: band_rising(c.bone_mass, bone_lo, bone_hi),
        protein_percent: band_rising(c.protein_percent, pp_lo, pp_hi),
        protein_mass: band_rising(c.protein_mass, pm_lo, pm_hi),
        visceral_fat_level,
        bmr: band_rising(c.bmr, bmr_lo, bmr_hi),
        metabolic_age,
        body_surface_area: band_rising(c.body_surface_area, bsa_lo, bsa_hi),
        ideal_body_weight: if in_range(c.ideal_body_weight, weight_range(sex)) {
            Band::Standard
        } else {
            Band::OutOfRange
        },
        ffmi: band_rising(c.ffmi, ffmi_lo, ffmi_hi),
        weight,
        bmi,
        fat_percent,
        muscle_percent,
        body_type,
        body_insight,
        goals,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Sex::Male, 5.9, Band::Athletic)]
    #[case(Sex::Male, 6.0, Band::Excellent)]
    #[case(Sex::Male, 13.5, Band::Excellent)]
    #[case(Sex::Male, 14.0, Band::Standard)]
    #[case(Sex::Male, 20.0, Band::Standard)]
    #[case(Sex::Male, 20.1, Band::NeedsBoost)]
    #[case(Sex::Female, 13.9, Band::Athletic)]
    #[case(Sex::Female, 20.5, Band::Excellent)]
    #[case(Sex::Female, 21.0, Band::Standard)]
    #[case(Sex::Female, 30.0, Band::Standard)]
    #[case(Sex::Female, 30.5, Band::NeedsBoost)]
    fn fat_bands_are_gapless(#[case] sex: Sex, #[case] fat: f64, #[case] band: Band) {
        assert_eq!(classify_fat_percent(fat, sex, 30).band, band);
    }

    #[rstest]
    #[case(18.4, Band::NeedsBoost)]
    #[case(18.5, Band::Standard)]
    #[case(24.9, Band::Standard)]
    #[case(24.95, Band::NeedsBoost)]
    #[case(35.0, Band::NeedsBoost)]
    fn bmi_bands(#[case] bmi: f64, #[case] band: Band) {
        assert_eq!(classify_bmi(bmi).band, band);
    }

    #[test]
    fn bmi_high_messages_differ_by_severity() {
        assert_ne!(classify_bmi(27.0).message, classify_bmi(32.0).message);
    }

    #[rstest]
    #[case(24.95, false)]
    #[case(25.0, true)]
    #[case(29.9, true)]
    #[case(29.95, false)]
    fn slightly_high_bmi_covers_25_to_29_9(#[case] bmi: f64, #[case] slightly: bool) {
        let r = classify_bmi(bmi);
        assert_eq!(r.band, Band::NeedsBoost);
        assert_eq!(r.message.contains("slightly high"), slightly);
        assert_eq!(r.message.contains("above average"), !slightly);
    }

    #[rstest]
    #[case(Sex::Male, 49.9, Band::Athletic)]
    #[case(Sex::Male, 90.0, Band::Standard)]
    #[case(Sex::Male, 90.1, Band::NeedsBoost)]
    #[case(Sex::Female, 39.0, Band::Athletic)]
    #[case(Sex::Female, 80.5, Band::NeedsBoost)]
    fn weight_bands(#[case] sex: Sex, #[case] w: f64, #[case] band: Band) {
        assert_eq!(classify_weight(w, sex, 170.0).band, band);
    }

    #[rstest]
    #[case(17.0, 10.0, 40.0, Sex::Male, BodyType::Lean)]
    #[case(22.0, 12.0, 30.0, Sex::Male, BodyType::Lean)]
    #[case(22.0, 18.0, 40.0, Sex::Male, BodyType::Balanced)]
    #[case(28.0, 30.0, 53.0, Sex::Male, BodyType::Balanced)]
    #[case(28.0, 30.0, 40.0, Sex::Male, BodyType::Rounded)]
    #[case(21.5, 44.0, 42.0, Sex::Female, BodyType::Rounded)]
    #[case(21.5, 25.0, 30.0, Sex::Female, BodyType::Balanced)]
    fn body_types(
        #[case] bmi: f64,
        #[case] fat: f64,
        #[case] muscle: f64,
        #[case] sex: Sex,
        #[case] expected: BodyType,
    ) {
        assert_eq!(body_type(bmi, fat, muscle, sex), expected);
    }

    #[test]
    fn band_helpers_are_closed_intervals() {
        assert_eq!(band_rising(1600.0, 1600.0, 2200.0), Band::Standard);
        assert_eq!(band_rising(2200.0, 1600.0, 2200.0), Band::Standard);
        assert_eq!(band_rising(2200.1, 1600.0, 2200.0), Band::Athletic);
        assert_eq!(band_falling(9.99, 10.0, 20.0), Band::Athletic);
        assert_eq!(band_falling(20.01, 10.0, 20.0), Band::NeedsBoost);
    }

    #[test]
    fn band_labels() {
        assert_eq!(Band::NeedsBoost.to_string(), "Needs Boost");
        assert_eq!(Band::OutOfRange.label(), "Out of Range");
    }
}
