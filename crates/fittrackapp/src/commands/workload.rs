use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::fitness;
use crate::model::{operation, CURRENT_PROFILE};
use crate::store::DataStore;
use chrono::NaiveDate;

/// Assess this week's load and log the recommendation.
///
/// If a current profile exists its workout fields are updated; without one only the
/// history entry is written.
pub fn run<S: DataStore + ?Sized>(
    store: &mut S,
    workouts: u32,
    avg_minutes: u32,
    today: NaiveDate,
) -> Result<CmdResult> {
    let text = fitness::overtraining(workouts, avg_minutes);

    let mut result = CmdResult::default();
    if let Some(mut profile) = store.get_profile(CURRENT_PROFILE)? {
        profile.workouts_this_week = workouts;
        profile.avg_workout_duration = avg_minutes;
        store.update_profile(CURRENT_PROFILE, &profile)?;
        result.profile = Some(profile);
    } else {
        result.add_message(CmdMessage::info(
            "No profile yet; run `progress` to store your goal",
        ));
    }

    let entry = store.save_history_entry_dated(today, operation::OVERTRAINING_CHECK, &text)?;
    result.entries.push(entry);
    result.add_message(CmdMessage::success(text));
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ProfileSnapshot;
    use crate::store::memory::fixtures::StoreFixture;
    use crate::store::memory::MemStore;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    #[test]
    fn logs_recommendation_without_profile() {
        let mut store = MemStore::new();

        let result = run(&mut store, 7, 60, today()).unwrap();

        assert!(result.profile.is_none());
        assert_eq!(result.entries[0].operation_type, operation::OVERTRAINING_CHECK);
        assert_eq!(result.entries[0].details, "Overtraining! Rest for 2-3 days.");
        assert!(store.get_profile(CURRENT_PROFILE).unwrap().is_none());
    }

    #[test]
    fn merges_into_existing_profile() {
        let goal = ProfileSnapshot::new(
            80.0,
            75.0,
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            1,
            20,
        );
        let mut store = StoreFixture::new().with_profile(goal).store;

        run(&mut store, 3, 60, today()).unwrap();

        let profile = store.get_profile(CURRENT_PROFILE).unwrap().unwrap();
        assert_eq!(profile.workouts_this_week, 3);
        assert_eq!(profile.avg_workout_duration, 60);
        assert_eq!(profile.current_weight, 80.0);
    }
}
