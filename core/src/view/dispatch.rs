use crate::dataset::LocationDataset;
use crate::filter::FilterState;
use crate::prelude::{TrackError, TrackResult};
use chrono::NaiveDate;

/// A state-changing interaction on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    SetDate(NaiveDate),
    ToggleHour(u8),
    ClearHours,
}

/// Applies `action` to one session's filter. Dates outside the dataset's
/// range are rejected, matching the bounds of the date picker.
pub fn dispatch(
    filter: &mut FilterState,
    dataset: &LocationDataset,
    action: Action,
) -> TrackResult<()> {
    match action {
        Action::SetDate(date) => {
            let (min, max) = dataset.date_range().ok_or(TrackError::NoData)?;
            if date < min || date > max {
                return Err(TrackError::DateOutOfRange { date, min, max });
            }
            filter.set_date(date);
            Ok(())
        }
        Action::ToggleHour(hour) => filter.toggle_hour(hour),
        Action::ClearHours => {
            filter.clear_hours();
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::LocationRecord;
    use chrono::NaiveDateTime;

    fn dataset() -> LocationDataset {
        let at = |text: &str| NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S").unwrap();
        LocationDataset::new(vec![
            LocationRecord::new(at("2024-06-01 08:00:00"), 35.0, 129.0, "a.zip"),
            LocationRecord::new(at("2024-06-03 08:00:00"), 35.0, 129.0, "a.zip"),
        ])
    }

    #[test]
    fn dispatch_applies_actions_in_sequence() {
        let data = dataset();
        let mut filter = FilterState::new();
        let june_third = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();

        dispatch(&mut filter, &data, Action::SetDate(june_third)).unwrap();
        dispatch(&mut filter, &data, Action::ToggleHour(8)).unwrap();
        assert!(filter.is_hour_selected(8));
        dispatch(&mut filter, &data, Action::ClearHours).unwrap();
        assert!(filter.selected_hours().is_empty());
        assert_eq!(filter.selected_date(), Some(june_third));
    }

    #[test]
    fn dates_outside_range_are_rejected() {
        let data = dataset();
        let mut filter = FilterState::new();
        let too_late = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap();
        let err = dispatch(&mut filter, &data, Action::SetDate(too_late)).unwrap_err();
        assert!(matches!(err, TrackError::DateOutOfRange { .. }));
        assert_eq!(filter.selected_date(), None);

        let empty = LocationDataset::empty();
        assert!(matches!(
            dispatch(&mut filter, &empty, Action::SetDate(too_late)),
            Err(TrackError::NoData)
        ));
    }
}
