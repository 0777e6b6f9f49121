//! Deterministic prompt construction.

use schemars::schema_for;
use std::fmt::Write;

use crate::error::PlanError;
use crate::plan::FitnessPlan;
use crate::types::UserProfile;

/// Render the instruction prompt for a user profile.
///
/// Pure function of its input: identical profiles produce identical
/// prompts. Optional profile fields (age, gender, weight, location) are
/// omitted entirely when absent rather than rendered as placeholders.
pub fn build(profile: &UserProfile) -> Result<String, PlanError> {
    let mut prompt = format!(
        "Generate a fitness and diet plan for:\n\
         User: {}, Goal: {}, Level: {}, Diet: {}.\n",
        profile.name, profile.goal, profile.level, profile.dietary
    );

    if let Some(age) = &profile.age {
        let _ = writeln!(prompt, "Age: {age}.");
    }
    if let Some(gender) = &profile.gender {
        let _ = writeln!(prompt, "Gender: {gender}.");
    }
    if let Some(weight) = &profile.weight {
        let _ = writeln!(prompt, "Weight: {weight}.");
    }
    if let Some(location) = &profile.location {
        let _ = writeln!(prompt, "Training location: {location}.");
    }

    prompt.push('\n');
    prompt.push_str(&schema_instruction()?);
    Ok(prompt)
}

/// The JSON-shape half of the prompt, generated from the plan types so the
/// instructed schema can never drift from what the validator accepts.
fn schema_instruction() -> Result<String, PlanError> {
    let schema = serde_json::to_value(schema_for!(FitnessPlan))
        .map_err(|e| PlanError::configuration(format!("plan schema serialization failed: {e}")))?;

    Ok(format!(
        "You must respond with valid JSON that matches this schema:\n{schema:#}\n\n\
         IMPORTANT:\n\
         1. Only return the JSON object, nothing else\n\
         2. Ensure all required fields are present\n\
         3. Follow the schema structure exactly\n\
         4. Use strings for every leaf value, including sets and reps"
    ))
}
