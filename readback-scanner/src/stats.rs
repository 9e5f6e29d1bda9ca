//! Per-group statistics
//!
//! Channels are split into fixed cohorts. Channel 8 is left out of the upper
//! VAL cohort but still counts toward the all-channel figures.

use crate::types::{Channel, ChannelRecord, Group};
use serde::Serialize;

/// A predefined subset of channel numbers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cohort {
    /// Channels 0-4
    Low,
    /// Channels 5-11 except 8
    High,
    /// Every channel present
    All,
}

impl Cohort {
    /// True if `channel` belongs to this cohort
    pub fn contains(self, channel: Channel) -> bool {
        match self {
            Cohort::Low => channel <= 4,
            Cohort::High => (5..=11).contains(&channel) && channel != 8,
            Cohort::All => true,
        }
    }
}

/// Average, max and min over a non-empty set of values
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Aggregate {
    pub avg: f64,
    pub max: f64,
    pub min: f64,
    /// How many values contributed
    pub count: usize,
}

impl Aggregate {
    /// Aggregate the values, or `None` when there are none
    pub fn of<I: IntoIterator<Item = f64>>(values: I) -> Option<Aggregate> {
        let mut count = 0usize;
        let mut sum = 0.0;
        let mut max = f64::NEG_INFINITY;
        let mut min = f64::INFINITY;

        for value in values {
            count += 1;
            sum += value;
            max = max.max(value);
            min = min.min(value);
        }

        (count > 0).then(|| Aggregate {
            avg: sum / count as f64,
            max,
            min,
            count,
        })
    }
}

/// Statistics for one group; `None` marks an empty cohort
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupStatistics {
    pub val_ch0_4: Option<Aggregate>,
    pub val_ch5_11: Option<Aggregate>,
    pub val_all: Option<Aggregate>,
    pub angle_all: Option<Aggregate>,
    pub oang_all: Option<Aggregate>,
}

impl GroupStatistics {
    /// Compute all cohort aggregates for a group
    pub fn from_group(group: &Group) -> Self {
        Self {
            val_ch0_4: aggregate(group, Cohort::Low, |r| r.val),
            val_ch5_11: aggregate(group, Cohort::High, |r| r.val),
            val_all: aggregate(group, Cohort::All, |r| r.val),
            angle_all: aggregate(group, Cohort::All, |r| r.angle),
            oang_all: aggregate(group, Cohort::All, |r| r.oang),
        }
    }

    /// The five aggregates in report column order
    pub fn columns(&self) -> [Option<Aggregate>; 5] {
        [
            self.val_ch0_4,
            self.val_ch5_11,
            self.val_all,
            self.angle_all,
            self.oang_all,
        ]
    }

    /// Flattened avg/max/min values in report column order (15 cells)
    pub fn flatten(&self) -> Vec<Option<f64>> {
        self.columns()
            .iter()
            .flat_map(|aggregate| match aggregate {
                Some(a) => [Some(a.avg), Some(a.max), Some(a.min)],
                None => [None, None, None],
            })
            .collect()
    }
}

fn aggregate(
    group: &Group,
    cohort: Cohort,
    field: fn(&ChannelRecord) -> Option<f64>,
) -> Option<Aggregate> {
    Aggregate::of(
        group
            .records()
            .filter(|record| cohort.contains(record.channel))
            .filter_map(field),
    )
}

/// Column headers matching [`GroupStatistics::flatten`], led by `Stat_Type`
pub const STATISTICS_HEADERS: [&str; 16] = [
    "Stat_Type",
    "VAL_ch0_4_Avg",
    "VAL_ch0_4_Max",
    "VAL_ch0_4_Min",
    "VAL_ch5_11_Avg",
    "VAL_ch5_11_Max",
    "VAL_ch5_11_Min",
    "VAL_All_Avg",
    "VAL_All_Max",
    "VAL_All_Min",
    "ANGLE_All_Avg",
    "ANGLE_All_Max",
    "ANGLE_All_Min",
    "OANG_All_Avg",
    "OANG_All_Max",
    "OANG_All_Min",
];
