//! Aggregate pipeline metrics over one user's applications.
//!
//! Everything here is a pure function of its input: no store access, no
//! shared state, no failure modes. Durations are expressed in days as `f64`.

use chrono::NaiveDate;
use serde::Serialize;

use crate::types::{Application, ApplicationStatus};

/// A transition between two lifecycle dates on a single application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    AppliedToInterview,
    InterviewToOffer,
    OfferToRejected,
}

impl Phase {
    pub const ALL: [Phase; 3] = [
        Phase::AppliedToInterview,
        Phase::InterviewToOffer,
        Phase::OfferToRejected,
    ];

    /// Start and end dates of this phase, if the application has both.
    #[must_use]
    pub fn boundaries(self, app: &Application) -> Option<(NaiveDate, NaiveDate)> {
        match self {
            Phase::AppliedToInterview => Some((app.date_applied, app.interview_date?)),
            Phase::InterviewToOffer => Some((app.interview_date?, app.offer_date?)),
            Phase::OfferToRejected => Some((app.offer_date?, app.rejected_date?)),
        }
    }

    /// Elapsed days for this phase. Negative when the dates are out of order;
    /// such values are kept as-is.
    #[must_use]
    pub fn duration_days(self, app: &Application) -> Option<f64> {
        self.boundaries(app)
            .map(|(start, end)| (end - start).num_days() as f64)
    }
}

/// Dashboard buckets. "Interviewing" merges two statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageBucket {
    Applied,
    Interviewing,
    Offered,
    Rejected,
}

impl From<ApplicationStatus> for StageBucket {
    fn from(status: ApplicationStatus) -> Self {
        match status {
            s if s.is_interviewing() => StageBucket::Interviewing,
            ApplicationStatus::Offer => StageBucket::Offered,
            ApplicationStatus::Rejected => StageBucket::Rejected,
            _ => StageBucket::Applied,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StageCounts {
    pub total: usize,
    pub applied: usize,
    pub interviewing: usize,
    pub offered: usize,
    pub rejected: usize,
}

impl StageCounts {
    fn record(&mut self, status: ApplicationStatus) {
        self.total += 1;
        match StageBucket::from(status) {
            StageBucket::Applied => self.applied += 1,
            StageBucket::Interviewing => self.interviewing += 1,
            StageBucket::Offered => self.offered += 1,
            StageBucket::Rejected => self.rejected += 1,
        }
    }

    #[must_use]
    pub fn count(&self, bucket: StageBucket) -> usize {
        match bucket {
            StageBucket::Applied => self.applied,
            StageBucket::Interviewing => self.interviewing,
            StageBucket::Offered => self.offered,
            StageBucket::Rejected => self.rejected,
        }
    }

    /// Percentage of all applications in `bucket`; 0 when there are none.
    #[must_use]
    pub fn share(&self, bucket: StageBucket) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.count(bucket) as f64 / self.total as f64 * 100.0
    }
}

/// Mean duration of one phase. `days` is 0 when `samples` is 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PhaseAverage {
    pub days: f64,
    pub samples: usize,
}

impl PhaseAverage {
    #[must_use]
    pub fn has_data(&self) -> bool {
        self.samples > 0
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseAverages {
    pub applied_to_interview: PhaseAverage,
    pub interview_to_offer: PhaseAverage,
    pub offer_to_rejected: PhaseAverage,
}

impl PhaseAverages {
    #[must_use]
    pub fn get(&self, phase: Phase) -> PhaseAverage {
        match phase {
            Phase::AppliedToInterview => self.applied_to_interview,
            Phase::InterviewToOffer => self.interview_to_offer,
            Phase::OfferToRejected => self.offer_to_rejected,
        }
    }

    fn slot(&mut self, phase: Phase) -> &mut PhaseAverage {
        match phase {
            Phase::AppliedToInterview => &mut self.applied_to_interview,
            Phase::InterviewToOffer => &mut self.interview_to_offer,
            Phase::OfferToRejected => &mut self.offer_to_rejected,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ApplicationMetrics {
    pub counts: StageCounts,
    pub averages: PhaseAverages,
}

/// Computes stage counts and average phase durations.
///
/// An application contributes to a phase only when both of that phase's
/// dates are present.
pub fn compute_metrics<'a, I>(applications: I) -> ApplicationMetrics
where
    I: IntoIterator<Item = &'a Application>,
{
    let mut counts = StageCounts::default();
    let mut sums = [0.0_f64; Phase::ALL.len()];
    let mut samples = [0_usize; Phase::ALL.len()];

    for app in applications {
        counts.record(app.status);

        for (idx, phase) in Phase::ALL.into_iter().enumerate() {
            if let Some(days) = phase.duration_days(app) {
                sums[idx] += days;
                samples[idx] += 1;
            }
        }
    }

    let mut averages = PhaseAverages::default();
    for (idx, phase) in Phase::ALL.into_iter().enumerate() {
        if samples[idx] > 0 {
            *averages.slot(phase) = PhaseAverage {
                days: sums[idx] / samples[idx] as f64,
                samples: samples[idx],
            };
        }
    }

    ApplicationMetrics { counts, averages }
}
