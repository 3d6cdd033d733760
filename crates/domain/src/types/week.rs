//! Monday–Sunday week ranges and the in-memory week set

use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use super::intervention::{Intervention, InterventionId};
use super::status::InterventionStatus;
use super::technician::TechnicianId;

/// Inclusive Monday..=Sunday date range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WeekRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl WeekRange {
    /// The week containing `anchor`.
    pub fn containing(anchor: NaiveDate) -> Self {
        let offset = u64::from(anchor.weekday().num_days_from_monday());
        // chrono dates cannot underflow within a week of any representable date
        let start = anchor.checked_sub_days(Days::new(offset)).unwrap_or(anchor);
        let end = start.checked_add_days(Days::new(6)).unwrap_or(start);
        Self { start, end }
    }

    pub fn previous(&self) -> Self {
        Self::containing(self.start.checked_sub_days(Days::new(7)).unwrap_or(self.start))
    }

    pub fn next(&self) -> Self {
        Self::containing(self.start.checked_add_days(Days::new(7)).unwrap_or(self.start))
    }

    /// Monday 00:00 UTC.
    pub fn start_datetime(&self) -> DateTime<Utc> {
        self.start.and_time(NaiveTime::MIN).and_utc()
    }

    /// The following Monday 00:00 UTC (exclusive bound).
    pub fn end_datetime_exclusive(&self) -> DateTime<Utc> {
        let next_monday = self.end.checked_add_days(Days::new(1)).unwrap_or(self.end);
        next_monday.and_time(NaiveTime::MIN).and_utc()
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        let day = at.date_naive();
        day >= self.start && day <= self.end
    }
}

/// Criteria for narrowing the displayed week
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekFilter {
    pub technician_id: Option<TechnicianId>,
    pub status: Option<InterventionStatus>,
    /// Case-insensitive substring over client name and intervention type.
    pub search: Option<String>,
}

impl WeekFilter {
    pub fn technician(mut self, technician_id: TechnicianId) -> Self {
        self.technician_id = Some(technician_id);
        self
    }

    pub fn status(mut self, status: InterventionStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search = Some(text.into());
        self
    }

    pub fn matches(&self, intervention: &Intervention) -> bool {
        if self.technician_id.is_some_and(|id| id != intervention.technician_id) {
            return false;
        }
        if self.status.is_some_and(|status| status != intervention.status) {
            return false;
        }
        match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(text) => {
                let needle = text.to_lowercase();
                intervention.details.client_name.to_lowercase().contains(&needle)
                    || intervention.details.intervention_type.to_lowercase().contains(&needle)
            }
        }
    }
}

/// Interventions of one displayed week
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekSet {
    pub range: WeekRange,
    /// Generation of the load that produced this set (0 = never loaded).
    pub generation: u64,
    pub interventions: Vec<Intervention>,
}

impl WeekSet {
    pub fn empty(range: WeekRange) -> Self {
        Self { range, generation: 0, interventions: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.interventions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interventions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Intervention> {
        self.interventions.iter()
    }

    pub fn get(&self, id: InterventionId) -> Option<&Intervention> {
        self.interventions.iter().find(|i| i.id == Some(id))
    }

    pub fn position(&self, id: InterventionId) -> Option<usize> {
        self.interventions.iter().position(|i| i.id == Some(id))
    }

    pub fn for_technician(
        &self,
        technician_id: TechnicianId,
    ) -> impl Iterator<Item = &Intervention> {
        self.interventions.iter().filter(move |i| i.technician_id == technician_id)
    }

    pub fn filtered(&self, filter: &WeekFilter) -> Vec<&Intervention> {
        self.interventions.iter().filter(|i| filter.matches(i)).collect()
    }

    /// Order by start time, then technician, for stable display.
    pub fn sort(&mut self) {
        self.interventions
            .sort_by(|a, b| a.scheduled_start.cmp(&b.scheduled_start).then(a.technician_id.cmp(&b.technician_id)));
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Weekday};

    use super::*;
    use crate::types::InterventionDetails;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn week_runs_monday_to_sunday() {
        // Thursday
        let week = WeekRange::containing(date(2024, 3, 7));
        assert_eq!(week.start, date(2024, 3, 4));
        assert_eq!(week.end, date(2024, 3, 10));
        assert_eq!(week.start.weekday(), Weekday::Mon);
        assert_eq!(week.end.weekday(), Weekday::Sun);
    }

    #[test]
    fn sunday_belongs_to_the_preceding_monday() {
        let week = WeekRange::containing(date(2024, 3, 10));
        assert_eq!(week.start, date(2024, 3, 4));
    }

    #[test]
    fn navigation_crosses_year_boundary() {
        let week = WeekRange::containing(date(2024, 1, 3));
        assert_eq!(week.previous().start, date(2023, 12, 25));
        assert_eq!(week.next().start, date(2024, 1, 8));
    }

    #[test]
    fn contains_uses_whole_days() {
        let week = WeekRange::containing(date(2024, 3, 4));
        assert!(week.contains(Utc.with_ymd_and_hms(2024, 3, 10, 23, 59, 0).unwrap()));
        assert!(!week.contains(Utc.with_ymd_and_hms(2024, 3, 11, 0, 0, 0).unwrap()));
        assert_eq!(week.end_datetime_exclusive(), Utc.with_ymd_and_hms(2024, 3, 11, 0, 0, 0).unwrap());
    }

    #[test]
    fn filter_combines_criteria() {
        let start = Utc.with_ymd_and_hms(2024, 3, 4, 9, 0, 0).unwrap();
        let a = Intervention::planned(1, start, 1.0, InterventionDetails::new("Bakery Martin", "Repair"));
        let b = Intervention::planned(2, start, 1.0, InterventionDetails::new("City Hall", "Maintenance"));

        assert!(WeekFilter::default().matches(&a));
        assert!(WeekFilter::default().search("bakery").matches(&a));
        assert!(!WeekFilter::default().search("bakery").matches(&b));
        assert!(WeekFilter::default().search("MAINT").matches(&b));
        assert!(!WeekFilter::default().technician(1).matches(&b));
        assert!(!WeekFilter::default().status(InterventionStatus::Done).matches(&a));
        assert!(WeekFilter::default().search("   ").matches(&b));
    }
}
