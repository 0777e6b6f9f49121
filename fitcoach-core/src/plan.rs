//! The plan contract returned to callers, and its validation rules.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::PlanError;

/// A complete weekly workout-and-diet plan.
///
/// Field names are the wire contract; `sets` and `reps` are strings by
/// design so answers like "8-12" survive untouched.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FitnessPlan {
    pub motivation: String,
    pub tips: Vec<String>,
    pub weekly_workout: Vec<WorkoutDay>,
    pub weekly_diet: Vec<DietDay>,
}

/// One day of the workout schedule
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct WorkoutDay {
    pub day: String,
    pub exercises: Vec<Exercise>,
}

/// A single exercise prescription
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Exercise {
    pub name: String,
    pub sets: String,
    pub reps: String,
    pub rest: String,
}

/// One day of the diet schedule
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DietDay {
    pub day: String,
    pub meals: Meals,
}

/// Meals for one day
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Meals {
    pub breakfast: String,
    pub lunch: String,
    pub dinner: String,
    pub snacks: String,
}

impl FitnessPlan {
    /// Validate a parsed model response against the plan contract.
    ///
    /// Typed deserialization enforces that every field exists with the
    /// declared type (unknown extra fields are tolerated); the structural
    /// checks then reject degenerate plans. Callers either get a plan that
    /// satisfies the whole contract or a `SchemaViolation` naming the first
    /// offending field.
    pub fn validate(candidate: serde_json::Value) -> Result<Self, PlanError> {
        let plan: FitnessPlan = serde_json::from_value(candidate)
            .map_err(|e| PlanError::schema_violation(e.to_string()))?;
        plan.check()?;
        Ok(plan)
    }

    fn check(&self) -> Result<(), PlanError> {
        if self.tips.is_empty() {
            return Err(PlanError::schema_violation("tips must not be empty"));
        }
        if self.weekly_workout.is_empty() {
            return Err(PlanError::schema_violation(
                "weekly_workout must not be empty",
            ));
        }
        if self.weekly_diet.is_empty() {
            return Err(PlanError::schema_violation("weekly_diet must not be empty"));
        }
        for (i, day) in self.weekly_workout.iter().enumerate() {
            if day.day.trim().is_empty() {
                return Err(PlanError::schema_violation(format!(
                    "weekly_workout[{i}].day must not be empty"
                )));
            }
        }
        for (i, day) in self.weekly_diet.iter().enumerate() {
            if day.day.trim().is_empty() {
                return Err(PlanError::schema_violation(format!(
                    "weekly_diet[{i}].day must not be empty"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_plan_json() -> serde_json::Value {
        json!({
            "motivation": "You are stronger than you think.",
            "tips": ["Drink water", "Sleep 8 hours"],
            "weekly_workout": [
                {
                    "day": "Monday",
                    "exercises": [
                        { "name": "Squats", "sets": "3", "reps": "12", "rest": "60s" }
                    ]
                }
            ],
            "weekly_diet": [
                {
                    "day": "Monday",
                    "meals": {
                        "breakfast": "Oats",
                        "lunch": "Dal and rice",
                        "dinner": "Paneer salad",
                        "snacks": "Almonds"
                    }
                }
            ]
        })
    }

    #[test]
    fn test_valid_plan_accepted() {
        let plan = FitnessPlan::validate(valid_plan_json()).unwrap();
        assert!(!plan.motivation.is_empty());
        assert!(plan.weekly_workout.len() >= 1);
        assert_eq!(plan.weekly_workout[0].exercises[0].sets, "3");
    }

    #[test]
    fn test_missing_weekly_diet_rejected() {
        let mut candidate = valid_plan_json();
        candidate.as_object_mut().unwrap().remove("weekly_diet");

        let err = FitnessPlan::validate(candidate).unwrap_err();
        match err {
            PlanError::SchemaViolation(msg) => assert!(msg.contains("weekly_diet")),
            other => panic!("expected SchemaViolation, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_tips_rejected() {
        let mut candidate = valid_plan_json();
        candidate["tips"] = json!([]);

        let err = FitnessPlan::validate(candidate).unwrap_err();
        assert!(matches!(err, PlanError::SchemaViolation(_)));
    }

    #[test]
    fn test_empty_weekly_workout_rejected() {
        let mut candidate = valid_plan_json();
        candidate["weekly_workout"] = json!([]);

        let err = FitnessPlan::validate(candidate).unwrap_err();
        assert!(matches!(err, PlanError::SchemaViolation(_)));
    }

    #[test]
    fn test_empty_weekly_diet_rejected() {
        let mut candidate = valid_plan_json();
        candidate["weekly_diet"] = json!([]);

        let err = FitnessPlan::validate(candidate).unwrap_err();
        assert!(matches!(err, PlanError::SchemaViolation(_)));
    }

    #[test]
    fn test_unknown_extra_field_tolerated() {
        let mut candidate = valid_plan_json();
        candidate["coach_notes"] = json!("keep it up");

        assert!(FitnessPlan::validate(candidate).is_ok());
    }

    #[test]
    fn test_numeric_sets_rejected() {
        let mut candidate = valid_plan_json();
        candidate["weekly_workout"][0]["exercises"][0]["sets"] = json!(3);

        let err = FitnessPlan::validate(candidate).unwrap_err();
        assert!(matches!(err, PlanError::SchemaViolation(_)));
    }

    #[test]
    fn test_blank_day_label_rejected() {
        let mut candidate = valid_plan_json();
        candidate["weekly_workout"][0]["day"] = json!("  ");

        let err = FitnessPlan::validate(candidate).unwrap_err();
        match err {
            PlanError::SchemaViolation(msg) => assert!(msg.contains("weekly_workout[0].day")),
            other => panic!("expected SchemaViolation, got {other:?}"),
        }
    }

    #[test]
    fn test_rest_day_with_no_exercises_accepted() {
        let mut candidate = valid_plan_json();
        candidate["weekly_workout"]
            .as_array_mut()
            .unwrap()
            .push(json!({ "day": "Sunday", "exercises": [] }));

        let plan = FitnessPlan::validate(candidate).unwrap();
        assert_eq!(plan.weekly_workout.len(), 2);
        assert!(plan.weekly_workout[1].exercises.is_empty());
    }
}
