//! Text rendering for a `Measurement`.
//!
//! `render_summary` lists every metric with its band; `render_narrative` is
//! the goal-oriented report appended to the report log.

use crate::types::Measurement;
use std::fmt::Write as _;

/// "Gain X kg", "Reduce X kg" or "Standard" for a signed control delta.
/// `what` is appended after "kg" when non-empty (e.g. "fat").
pub fn control_text(delta: f64, what: &str) -> String {
    let unit = if what.is_empty() {
        "kg".to_string()
    } else {
        format!("kg {what}")
    };
    if delta > 0.0 {
        format!("Gain {} {unit}", delta.abs())
    } else if delta < 0.0 {
        format!("Reduce {} {unit}", delta.abs())
    } else {
        "Standard".to_string()
    }
}

fn sex_label(m: &Measurement) -> &'static str {
    if m.profile.sex().is_male() {
        "Male"
    } else {
        "Female"
    }
}

/// Technical summary: every metric, value and band.
pub fn render_summary(m: &Measurement, timestamp: &str) -> String {
    let c = &m.composition;
    let a = &m.assessment;
    let mut s = String::new();
    // Writing into a String cannot fail.
    let _ = writeln!(s, "=== Body Composition (Detailed) ===");
    let _ = writeln!(s, "Timestamp: {timestamp}");
    let _ = writeln!(s, "Weight: {:.2} kg ({})", m.reading.weight_kg, a.weight.band);
    let _ = writeln!(s, "BMI: {:.1} ({})", c.bmi, a.bmi.band);
    let _ = writeln!(s, "Body Fat %: {:.1} ({})", c.fat_percent, a.fat_percent.band);
    let _ = writeln!(s, "Body Fat Mass: {:.1} kg", c.fat_mass);
    let _ = writeln!(
        s,
        "Subcutaneous Fat %: {:.1} ({})",
        c.subcutaneous_fat_percent, a.subcutaneous_fat_percent
    );
    let _ = writeln!(s, "Subcutaneous Fat Mass: {:.1} kg", c.subcutaneous_fat_mass);
    let _ = writeln!(s, "Muscle %: {:.1} ({})", c.muscle_percent, a.muscle_percent.band);
    let _ = writeln!(s, "Muscle Mass: {:.1} kg ({})", c.muscle_mass, a.muscle_mass);
    let _ = writeln!(
        s,
        "Skeletal Muscle %: {:.1} ({})",
        c.skeletal_muscle_percent, a.skeletal_muscle_percent
    );
    let _ = writeln!(s, "Body Water %: {:.1} ({})", c.water_percent, a.water_percent);
    let _ = writeln!(s, "Body Water Mass: {:.1} kg", c.water_mass);
    let _ = writeln!(s, "Bone %: {:.1}", c.bone_percent);
    let _ = writeln!(s, "Bone Mass: {:.2} kg ({})", c.bone_mass, a.bone_mass);
    let _ = writeln!(s, "Protein %: {:.1} ({})", c.protein_percent, a.protein_percent);
    let _ = writeln!(s, "Protein Mass: {:.2} kg ({})", c.protein_mass, a.protein_mass);
    let _ = writeln!(
        s,
        "Visceral Fat Level: {} ({})",
        c.visceral_fat_level, a.visceral_fat_level
    );
    let _ = writeln!(s, "Visceral Fat Area: {:.1} cm²", c.visceral_fat_area);
    let _ = writeln!(s, "Visceral Fat Mass: {:.1} kg", c.visceral_fat_mass);
    let _ = writeln!(s, "BMR: {:.1} kcal ({})", c.bmr, a.bmr);
    let _ = writeln!(s, "Metabolic Age: {} ({})", c.metabolic_age, a.metabolic_age);
    let _ = writeln!(s, "Fat-Free Body Weight: {:.2} kg", c.fat_free_weight);
    let _ = writeln!(
        s,
        "Body Surface Area: {:.2} m² ({})",
        c.body_surface_area, a.body_surface_area
    );
    let _ = writeln!(
        s,
        "Ideal Body Weight: {:.2} kg ({})",
        c.ideal_body_weight, a.ideal_body_weight
    );
    let _ = writeln!(s, "Standard Weight: {:.2} kg", c.standard_weight);
    let _ = writeln!(
        s,
        "Weight Control: {:.2} kg ({})",
        c.weight_control,
        control_text(c.weight_control, "")
    );
    let _ = writeln!(
        s,
        "Fat Control: {:.2} kg ({})",
        c.fat_control,
        control_text(c.fat_control, "fat")
    );
    let _ = writeln!(
        s,
        "Muscle Control: {:.2} kg ({})",
        c.muscle_control,
        control_text(c.muscle_control, "muscle")
    );
    let _ = writeln!(s, "Body Score: {}", c.body_score);
    let _ = writeln!(s, "FFMI: {:.1} ({})", c.ffmi, a.ffmi);
    if m.reading.has_impedance() {
        let _ = writeln!(s, "Impedance: {:.1} ohms", m.reading.impedance_ohm);
    } else {
        let _ = writeln!(s, "Impedance: N/A");
    }
    let _ = writeln!(
        s,
        "Profile: Age {}, Height {} cm, Sex {}",
        m.profile.age(),
        m.profile.height_cm(),
        sex_label(m)
    );
    let _ = writeln!(s, "=================================");
    s
}

/// Goal-oriented report for the user.
pub fn render_narrative(m: &Measurement, timestamp: &str) -> String {
    let c = &m.composition;
    let a = &m.assessment;
    let rule = "=".repeat(40);
    let mut s = String::new();
    let _ = writeln!(s, "{rule}");
    let _ = writeln!(s, "Your Personalized Body Composition Report");
    let _ = writeln!(s, "{rule}");
    let _ = writeln!(s, "Timestamp: {timestamp}");
    let _ = writeln!(
        s,
        "Profile: Age {} years, Height {} cm, Sex {}",
        m.profile.age(),
        m.profile.height_cm(),
        sex_label(m)
    );
    let _ = writeln!(s);
    let _ = writeln!(
        s,
        "1. Weight: {:.1} kg - {}\n   {}\n",
        m.reading.weight_kg, a.weight.band, a.weight.message
    );
    let _ = writeln!(
        s,
        "2. Body Mass Index (BMI): {:.1} - {}\n   {}\n",
        c.bmi, a.bmi.band, a.bmi.message
    );
    let _ = writeln!(
        s,
        "3. Body Fat: {:.1}% - {}\n   {}\n   Fat Mass: {:.1} kg\n",
        c.fat_percent, a.fat_percent.band, a.fat_percent.message, c.fat_mass
    );
    let _ = writeln!(
        s,
        "4. Muscle: {:.1}% - {}\n   {}\n   Muscle Mass: {:.1} kg\n",
        c.muscle_percent, a.muscle_percent.band, a.muscle_percent.message, c.muscle_mass
    );
    let _ = writeln!(
        s,
        "5. Calories Burned at Rest (BMR): {:.1} kcal - {}\n",
        c.bmr, a.bmr
    );
    let age_note = if u32::from(c.metabolic_age) <= m.profile.age() {
        "You're thriving!"
    } else {
        "More activity or better sleep can bring it down."
    };
    let _ = writeln!(
        s,
        "6. Metabolic Age: {} years - {}\n   {age_note}\n",
        c.metabolic_age, a.metabolic_age
    );
    let _ = writeln!(s, "{}", "-".repeat(40));
    let _ = writeln!(s, "Your Body Type: {}", a.body_type.label());
    let _ = writeln!(s, "{}\n", a.body_insight);
    let _ = writeln!(s, "Your Goals:");
    for goal in &a.goals {
        let _ = writeln!(s, "- {goal}");
    }
    let _ = writeln!(s);
    let _ = writeln!(
        s,
        "Track your progress weekly and consult a doctor if questions arise."
    );
    let _ = writeln!(s, "{rule}");
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::DecodedReading;
    use crate::profile::{Sex, UserProfile};

    fn measurement(impedance_ohm: f64) -> Measurement {
        let profile = UserProfile::new(30, 175.0, Sex::Male).unwrap();
        let reading = DecodedReading {
            weight_kg: 70.5,
            impedance_ohm,
        };
        Measurement::new(reading, profile).unwrap()
    }

    #[test]
    fn summary_lists_metrics_one_per_line() {
        let text = render_summary(&measurement(520.3), "2026-01-01 08:00:00");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "=== Body Composition (Detailed) ===");
        assert_eq!(lines[1], "Timestamp: 2026-01-01 08:00:00");
        assert!(lines.contains(&"Impedance: 520.3 ohms"));
        assert!(lines.contains(&"Profile: Age 30, Height 175 cm, Sex Male"));
        assert_eq!(lines.last(), Some(&"================================="));
        assert!(text.ends_with("=\n"));
    }

    #[test]
    fn summary_without_impedance_says_so() {
        let text = render_summary(&measurement(0.0), "t");
        assert!(text.lines().any(|l| l == "Impedance: N/A"));
    }

    #[test]
    fn narrative_lists_goals_between_rules() {
        let m = measurement(520.3);
        let text = render_narrative(&m, "t");
        let rule = "=".repeat(40);
        assert!(text.starts_with(&format!("{rule}\nYour Personalized Body Composition Report\n")));
        assert!(text.ends_with(&format!("{rule}\n")));
        for goal in &m.assessment.goals {
            assert!(text.contains(&format!("- {goal}\n")));
        }
    }

    #[test]
    fn control_text_sign_conventions() {
        assert_eq!(control_text(1.32, ""), "Gain 1.32 kg");
        assert_eq!(control_text(-3.125, ""), "Reduce 3.125 kg");
        assert_eq!(control_text(-13.99209, "fat"), "Reduce 13.99209 kg fat");
        assert_eq!(control_text(0.0, "muscle"), "Standard");
    }
}
