//! Job postings owned by recruiters.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::profile::RecruiterId;

/// Stable job identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct JobId(Uuid);

impl JobId {
    /// Generate a new random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an identifier read back from storage.
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Access the underlying UUID.
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Employment arrangement advertised by a posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum JobType {
    /// Standard full-time position.
    FullTime,
    /// Part-time position.
    PartTime,
    /// Fixed-duration internship.
    Internship,
    /// Contract engagement.
    Contract,
}

impl JobType {
    /// Stable snake_case name used in storage and on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FullTime => "full_time",
            Self::PartTime => "part_time",
            Self::Internship => "internship",
            Self::Contract => "contract",
        }
    }
}

impl fmt::Display for JobType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown job type name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown job type: {value}")]
pub struct JobTypeParseError {
    /// The rejected input.
    pub value: String,
}

impl std::str::FromStr for JobType {
    type Err = JobTypeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "full_time" => Ok(Self::FullTime),
            "part_time" => Ok(Self::PartTime),
            "internship" => Ok(Self::Internship),
            "contract" => Ok(Self::Contract),
            other => Err(JobTypeParseError {
                value: other.to_owned(),
            }),
        }
    }
}

/// Validation errors raised by the job constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum JobValidationError {
    /// Title was missing or blank once trimmed.
    #[error("job title must not be empty")]
    EmptyTitle,
    /// Salary was negative.
    #[error("salary must not be negative")]
    NegativeSalary,
}

/// Annual salary in whole currency units.
///
/// ## Invariants
/// - never negative
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct Salary(i64);

impl Salary {
    /// Validate and construct a salary amount.
    pub fn new(amount: i64) -> Result<Self, JobValidationError> {
        if amount < 0 {
            return Err(JobValidationError::NegativeSalary);
        }
        Ok(Self(amount))
    }

    /// The salary amount.
    pub const fn amount(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for Salary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Job posting owned by exactly one recruiter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    /// Stable identifier.
    pub id: JobId,
    /// Owning recruiter profile.
    pub recruiter_id: RecruiterId,
    /// Position title.
    pub title: String,
    /// Long-form description.
    pub description: String,
    /// Free-form location.
    pub location: String,
    /// Employment arrangement.
    pub job_type: JobType,
    /// Advertised salary, when disclosed.
    pub salary: Option<Salary>,
    /// Set once when the posting is created.
    pub posted_at: DateTime<Utc>,
    /// Optional application deadline.
    pub application_deadline: Option<DateTime<Utc>>,
    /// Whether the posting is visible to job seekers.
    pub is_active: bool,
}

impl Job {
    /// Create a new active posting, stamping the posting time once.
    pub fn post(
        recruiter_id: RecruiterId,
        title: String,
        description: String,
        location: String,
        job_type: JobType,
        salary: Option<Salary>,
        application_deadline: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Result<Self, JobValidationError> {
        if title.trim().is_empty() {
            return Err(JobValidationError::EmptyTitle);
        }
        Ok(Self {
            id: JobId::random(),
            recruiter_id,
            title,
            description,
            location,
            job_type,
            salary,
            posted_at: now,
            application_deadline,
            is_active: true,
        })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    fn post(title: &str, salary: Option<Salary>) -> Result<Job, JobValidationError> {
        Job::post(
            RecruiterId::random(),
            title.to_owned(),
            "desc".to_owned(),
            "Remote".to_owned(),
            JobType::FullTime,
            salary,
            None,
            Utc::now(),
        )
    }

    #[test]
    fn posting_requires_a_title() {
        let err = post("   ", None).expect_err("blank title");
        assert_eq!(err, JobValidationError::EmptyTitle);
    }

    #[rstest]
    #[case(0)]
    #[case(90_000)]
    fn non_negative_salaries_are_accepted(#[case] amount: i64) {
        let salary = Salary::new(amount).expect("valid salary");
        assert_eq!(salary.amount(), amount);
    }

    #[test]
    fn negative_salaries_are_rejected() {
        let err = Salary::new(-1).expect_err("negative salary");
        assert_eq!(err, JobValidationError::NegativeSalary);
    }

    #[test]
    fn new_postings_start_active() {
        let job = post("Backend Developer", Salary::new(90_000).ok()).expect("valid job");
        assert!(job.is_active);
        assert_eq!(job.title, "Backend Developer");
    }

    #[rstest]
    #[case("full_time", JobType::FullTime)]
    #[case("part_time", JobType::PartTime)]
    #[case("internship", JobType::Internship)]
    #[case("contract", JobType::Contract)]
    fn job_types_round_trip_their_wire_name(#[case] raw: &str, #[case] expected: JobType) {
        let parsed: JobType = raw.parse().expect("known job type");
        assert_eq!(parsed, expected);
        assert_eq!(parsed.as_str(), raw);
    }
}
