//! Week statistics derived from the current week set and roster

use fieldplan_domain::constants::DAYS_PER_WEEK;
use fieldplan_domain::{InterventionStatus, Technician, TechnicianLoad, WeekSet, WeekStats};

/// Pure aggregation over a week set. No I/O, no state beyond configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatisticsAggregator {
    days_per_week: u32,
}

impl Default for StatisticsAggregator {
    fn default() -> Self {
        Self { days_per_week: DAYS_PER_WEEK }
    }
}

impl StatisticsAggregator {
    pub fn new(days_per_week: u32) -> Self {
        Self { days_per_week }
    }

    pub fn compute(&self, week: &WeekSet, technicians: &[Technician]) -> WeekStats {
        let total = week.len();
        let planned_or_in_progress = week
            .iter()
            .filter(|i| matches!(i.status, InterventionStatus::Planned | InterventionStatus::InProgress))
            .count();
        let done = week.iter().filter(|i| i.status == InterventionStatus::Done).count();

        WeekStats {
            total,
            planned_or_in_progress,
            done,
            occupancy_rate: self.occupancy_rate(total, technicians.len()),
            technician_count: technicians.len(),
            per_technician: technicians.iter().map(|t| Self::load_of(week, t)).collect(),
        }
    }

    /// `total / (technicians * days)` as a percentage; 0 without technicians.
    #[allow(clippy::cast_precision_loss)]
    pub fn occupancy_rate(&self, total: usize, technician_count: usize) -> f64 {
        let capacity = technician_count as f64 * f64::from(self.days_per_week);
        if capacity == 0.0 {
            return 0.0;
        }
        total as f64 / capacity * 100.0
    }

    fn load_of(week: &WeekSet, technician: &Technician) -> TechnicianLoad {
        let (interventions, booked_hours) = week
            .for_technician(technician.id)
            .filter(|i| i.status.occupies_slot())
            .fold((0, 0.0), |(count, hours), i| (count + 1, hours + i.duration_hours));

        TechnicianLoad {
            technician_id: technician.id,
            name: technician.name.clone(),
            interventions,
            booked_hours,
        }
    }
}
