use crate::dataset::{LocationDataset, LocationRecord};
use crate::prelude::{TrackError, TrackResult, HOURS_PER_DAY};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Date and hour selection of one dashboard session.
///
/// The hour selection only has meaning relative to one date, so any change of
/// date clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    selected_date: Option<NaiveDate>,
    selected_hours: BTreeSet<u8>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected_date(&self) -> Option<NaiveDate> {
        self.selected_date
    }

    pub fn selected_hours(&self) -> &BTreeSet<u8> {
        &self.selected_hours
    }

    pub fn is_hour_selected(&self, hour: u8) -> bool {
        self.selected_hours.contains(&hour)
    }

    pub fn set_date(&mut self, date: NaiveDate) {
        if self.selected_date != Some(date) {
            self.selected_hours.clear();
        }
        self.selected_date = Some(date);
    }

    pub fn toggle_hour(&mut self, hour: u8) -> TrackResult<()> {
        if hour >= HOURS_PER_DAY {
            return Err(TrackError::InvalidHour(hour));
        }
        if !self.selected_hours.remove(&hour) {
            self.selected_hours.insert(hour);
        }
        Ok(())
    }

    pub fn clear_hours(&mut self) {
        self.selected_hours.clear();
    }

    /// Anchors the selection to `dataset`: the date defaults to the earliest
    /// one when none is chosen or the chosen one lies outside the dataset's
    /// range. An empty dataset clears the selection.
    pub fn ensure_date(&mut self, dataset: &LocationDataset) {
        let Some((earliest, latest)) = dataset.date_range() else {
            self.selected_date = None;
            self.selected_hours.clear();
            return;
        };
        match self.selected_date {
            Some(date) if date >= earliest && date <= latest => {}
            _ => self.set_date(earliest),
        }
    }

    /// Restricts a date-filtered set to the selected hours; everything passes
    /// when no hour is selected.
    pub fn effective_set<'a>(&self, filtered: &[&'a LocationRecord]) -> Vec<&'a LocationRecord> {
        if self.selected_hours.is_empty() {
            return filtered.to_vec();
        }
        filtered
            .iter()
            .copied()
            .filter(|record| self.selected_hours.contains(&record.hour()))
            .collect()
    }
}
