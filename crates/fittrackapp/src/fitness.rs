//! Weight-loss pacing, workload assessment and distance conversion.
//!
//! Pure functions: nothing here touches storage. The command layer calls them and
//! logs the returned text as history details.

use crate::error::{FitError, Result};
use crate::model::ProfileSnapshot;
use chrono::NaiveDate;
use serde::Serialize;

pub const KM_PER_MILE: f64 = 1.60934;

/// Weekly loss above this is flagged as unhealthy (kg/week).
const MAX_SAFE_WEEKLY_LOSS: f64 = 1.0;
/// Weekly loss below this leaves room for a bigger deficit (kg/week).
const MIN_EFFECTIVE_WEEKLY_LOSS: f64 = 0.5;

/// Pace needed to reach the target weight by the target date, plus one advice line.
pub fn progress(snapshot: &ProfileSnapshot, today: NaiveDate) -> Result<String> {
    snapshot.validate()?;
    let days = (snapshot.target_date - today).num_days();
    if days <= 0 {
        return Err(FitError::Validation(
            "target date must be in the future".to_string(),
        ));
    }

    let weekly = (snapshot.current_weight - snapshot.target_weight) / (days as f64 / 7.0);
    let daily = weekly / 7.0;

    let advice = if weekly > MAX_SAFE_WEEKLY_LOSS {
        "Warning: losing more than 1 kg/week may be unhealthy"
    } else if weekly < MIN_EFFECTIVE_WEEKLY_LOSS {
        "You can increase the calorie deficit slightly"
    } else {
        "This is a safe and effective pace"
    };

    Ok(format!(
        "To reach the goal lose {:.2} kg/week ({:.2} kg/day)\n{}",
        weekly, daily, advice
    ))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkloadLevel {
    Overtraining,
    High,
    Light,
    Optimal,
}

impl WorkloadLevel {
    pub fn assess(workouts: u32, avg_minutes: u32) -> Self {
        let total = u64::from(workouts) * u64::from(avg_minutes);
        if workouts > 6 || total > 420 {
            WorkloadLevel::Overtraining
        } else if workouts > 4 || total > 300 {
            WorkloadLevel::High
        } else if workouts < 3 || total < 150 {
            WorkloadLevel::Light
        } else {
            WorkloadLevel::Optimal
        }
    }

    pub fn recommendation(&self) -> &'static str {
        match self {
            WorkloadLevel::Overtraining => "Overtraining! Rest for 2-3 days.",
            WorkloadLevel::High => "High load. Rest for 1-2 days.",
            WorkloadLevel::Light => "You can add 1-2 workouts.",
            WorkloadLevel::Optimal => "Optimal load!",
        }
    }
}

/// Recommendation text for a week of `workouts` sessions of `avg_minutes` each.
pub fn overtraining(workouts: u32, avg_minutes: u32) -> String {
    WorkloadLevel::assess(workouts, avg_minutes)
        .recommendation()
        .to_string()
}

pub fn miles_to_km(miles: f64) -> Result<String> {
    if !miles.is_finite() || miles < 0.0 {
        return Err(FitError::Validation(format!(
            "distance must be a non-negative number, got {}",
            miles
        )));
    }
    Ok(format!("{:.2} mi = {:.2} km", miles, miles * KM_PER_MILE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    fn goal(current: f64, target: f64, days: i64) -> ProfileSnapshot {
        ProfileSnapshot::new(current, target, today() + Duration::days(days), 3, 45)
    }

    #[test]
    fn test_progress_safe_pace() {
        // 5 kg over 70 days = 0.5 kg/week
        let text = progress(&goal(80.0, 75.0, 70), today()).unwrap();
        assert_eq!(
            text,
            "To reach the goal lose 0.50 kg/week (0.07 kg/day)\nThis is a safe and effective pace"
        );
    }

    #[test]
    fn test_progress_too_fast() {
        let text = progress(&goal(80.0, 70.0, 14), today()).unwrap();
        assert!(text.starts_with("To reach the goal lose 5.00 kg/week"));
        assert!(text.ends_with("may be unhealthy"));
    }

    #[test]
    fn test_progress_slow_pace() {
        let text = progress(&goal(80.0, 79.0, 70), today()).unwrap();
        assert!(text.contains("0.10 kg/week"));
        assert!(text.ends_with("increase the calorie deficit slightly"));
    }

    #[test]
    fn test_progress_rejects_past_or_today() {
        assert!(matches!(
            progress(&goal(80.0, 75.0, 0), today()),
            Err(FitError::Validation(_))
        ));
        assert!(progress(&goal(80.0, 75.0, -3), today()).is_err());
    }

    #[test]
    fn test_workload_thresholds() {
        assert_eq!(WorkloadLevel::assess(7, 30), WorkloadLevel::Overtraining);
        assert_eq!(WorkloadLevel::assess(4, 120), WorkloadLevel::Overtraining);
        assert_eq!(WorkloadLevel::assess(5, 30), WorkloadLevel::High);
        assert_eq!(WorkloadLevel::assess(4, 80), WorkloadLevel::High);
        assert_eq!(WorkloadLevel::assess(2, 60), WorkloadLevel::Light);
        assert_eq!(WorkloadLevel::assess(3, 40), WorkloadLevel::Light);
        assert_eq!(WorkloadLevel::assess(3, 60), WorkloadLevel::Optimal);
        assert_eq!(WorkloadLevel::assess(4, 75), WorkloadLevel::Optimal);
    }

    #[test]
    fn test_workload_does_not_overflow() {
        assert_eq!(WorkloadLevel::assess(3, u32::MAX), WorkloadLevel::Overtraining);
    }

    #[test]
    fn test_overtraining_text() {
        assert_eq!(overtraining(3, 45), "Optimal load!");
    }

    #[test]
    fn test_miles_to_km() {
        assert_eq!(miles_to_km(5.0).unwrap(), "5.00 mi = 8.05 km");
        assert_eq!(miles_to_km(0.0).unwrap(), "0.00 mi = 0.00 km");
        assert!(miles_to_km(-1.0).is_err());
        assert!(miles_to_km(f64::INFINITY).is_err());
    }
}
