//! Job search criteria: an ad-hoc conjunction of optional predicates.
//!
//! Every criterion is optional; each present criterion narrows the result
//! set and absent criteria impose no constraint. Raw inputs that fail to
//! parse degrade to "criterion ignored", never to an error, so a garbled
//! query string still returns results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::job::{Job, JobType};

/// Raw, possibly garbled search inputs as they arrive from the query string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RawSearchParams {
    /// Company-name substring.
    pub company_name: Option<String>,
    /// Title substring.
    pub job_title: Option<String>,
    /// Exact job type.
    pub job_type: Option<String>,
    /// Location substring.
    pub location: Option<String>,
    /// Minimum salary; kept only if it parses as a non-negative integer.
    pub min_salary: Option<String>,
    /// Lower bound on the posting timestamp; kept only if it parses as
    /// RFC 3339.
    pub posted_after: Option<String>,
    /// Upper bound on the application deadline; kept only if it parses as
    /// RFC 3339.
    pub deadline_before: Option<String>,
}

fn parse_timestamp(raw: Option<String>) -> Option<DateTime<Utc>> {
    non_blank(raw).and_then(|value| {
        DateTime::parse_from_rfc3339(&value)
            .ok()
            .map(|ts| ts.with_timezone(&Utc))
    })
}

/// Parsed search criteria applied as a conjunction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobSearchCriteria {
    /// Case-insensitive company-name substring.
    pub company_name: Option<String>,
    /// Case-insensitive title substring.
    pub title: Option<String>,
    /// Exact job type.
    pub job_type: Option<JobType>,
    /// Case-insensitive location substring.
    pub location: Option<String>,
    /// Minimum salary lower bound.
    pub min_salary: Option<i64>,
    /// Lower bound on the posting timestamp.
    pub posted_after: Option<DateTime<Utc>>,
    /// Upper bound on the application deadline.
    pub deadline_before: Option<DateTime<Utc>>,
}

/// Job joined with the posting company's name, the unit of search results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobPosting {
    /// The posting itself.
    pub job: Job,
    /// Company name of the owning recruiter.
    pub company_name: String,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

impl JobSearchCriteria {
    /// Build criteria from raw inputs.
    ///
    /// Blank strings are treated as absent. An unknown job type or a
    /// non-numeric / negative minimum salary drops that criterion rather
    /// than rejecting the search.
    pub fn from_raw(params: RawSearchParams) -> Self {
        let job_type = non_blank(params.job_type).and_then(|raw| raw.parse::<JobType>().ok());
        let min_salary = non_blank(params.min_salary)
            .and_then(|raw| raw.parse::<i64>().ok())
            .filter(|amount| *amount >= 0);

        Self {
            company_name: non_blank(params.company_name),
            title: non_blank(params.job_title),
            job_type,
            location: non_blank(params.location),
            min_salary,
            posted_after: parse_timestamp(params.posted_after),
            deadline_before: parse_timestamp(params.deadline_before),
        }
    }

    /// Whether no criterion is present.
    pub const fn is_empty(&self) -> bool {
        self.company_name.is_none()
            && self.title.is_none()
            && self.job_type.is_none()
            && self.location.is_none()
            && self.min_salary.is_none()
            && self.posted_after.is_none()
            && self.deadline_before.is_none()
    }

    /// Apply the conjunction to a single posting.
    ///
    /// The Diesel adapter composes the same predicates in SQL; this pure
    /// form backs the in-memory adapter and the monotonicity tests.
    pub fn matches(&self, posting: &JobPosting) -> bool {
        let job = &posting.job;

        if let Some(needle) = &self.company_name
            && !contains_ignore_case(&posting.company_name, needle)
        {
            return false;
        }
        if let Some(needle) = &self.title
            && !contains_ignore_case(&job.title, needle)
        {
            return false;
        }
        if let Some(job_type) = self.job_type
            && job.job_type != job_type
        {
            return false;
        }
        if let Some(needle) = &self.location
            && !contains_ignore_case(&job.location, needle)
        {
            return false;
        }
        if let Some(min_salary) = self.min_salary
            && job.salary.is_none_or(|s| s.amount() < min_salary)
        {
            return false;
        }
        if let Some(posted_after) = self.posted_after
            && job.posted_at < posted_after
        {
            return false;
        }
        if let Some(deadline_before) = self.deadline_before
            && job
                .application_deadline
                .is_none_or(|deadline| deadline > deadline_before)
        {
            return false;
        }
        true
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::job::Salary;
    use crate::domain::profile::RecruiterId;
    use chrono::TimeZone;
    use rstest::rstest;

    fn posting(title: &str, company: &str, salary: Option<i64>) -> JobPosting {
        let job = Job::post(
            RecruiterId::random(),
            title.to_owned(),
            String::new(),
            "Berlin".to_owned(),
            JobType::FullTime,
            salary.map(|s| Salary::new(s).expect("valid salary")),
            Some(Utc.with_ymd_and_hms(2026, 12, 31, 0, 0, 0).single().expect("valid date")),
            Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).single().expect("valid date"),
        )
        .expect("valid job");
        JobPosting {
            job,
            company_name: company.to_owned(),
        }
    }

    #[test]
    fn empty_criteria_match_everything() {
        let criteria = JobSearchCriteria::from_raw(RawSearchParams::default());
        assert!(criteria.is_empty());
        assert!(criteria.matches(&posting("Backend Developer", "Acme", None)));
    }

    #[rstest]
    #[case("backend", true)]
    #[case("BACKEND", true)]
    #[case("frontend", false)]
    fn title_matching_is_case_insensitive_substring(#[case] needle: &str, #[case] expected: bool) {
        let criteria = JobSearchCriteria::from_raw(RawSearchParams {
            job_title: Some(needle.to_owned()),
            ..RawSearchParams::default()
        });
        assert_eq!(criteria.matches(&posting("Backend Developer", "Acme", None)), expected);
    }

    #[rstest]
    #[case("90000", Some(90_000))]
    #[case("abc", None)]
    #[case("-5", None)]
    #[case("  ", None)]
    fn min_salary_is_parsed_or_silently_ignored(
        #[case] raw: &str,
        #[case] expected: Option<i64>,
    ) {
        let criteria = JobSearchCriteria::from_raw(RawSearchParams {
            min_salary: Some(raw.to_owned()),
            ..RawSearchParams::default()
        });
        assert_eq!(criteria.min_salary, expected);
    }

    #[test]
    fn min_salary_excludes_undisclosed_salaries() {
        let criteria = JobSearchCriteria::from_raw(RawSearchParams {
            min_salary: Some("50000".to_owned()),
            ..RawSearchParams::default()
        });
        assert!(criteria.matches(&posting("Dev", "Acme", Some(60_000))));
        assert!(!criteria.matches(&posting("Dev", "Acme", Some(40_000))));
        assert!(!criteria.matches(&posting("Dev", "Acme", None)));
    }

    #[rstest]
    #[case("2026-01-01T00:00:00Z", true)]
    #[case("yesterday", false)]
    #[case("", false)]
    fn timestamps_are_parsed_or_silently_ignored(#[case] raw: &str, #[case] kept: bool) {
        let criteria = JobSearchCriteria::from_raw(RawSearchParams {
            posted_after: Some(raw.to_owned()),
            ..RawSearchParams::default()
        });
        assert_eq!(criteria.posted_after.is_some(), kept);
    }

    #[test]
    fn unknown_job_type_is_ignored_rather_than_rejected() {
        let criteria = JobSearchCriteria::from_raw(RawSearchParams {
            job_type: Some("gig".to_owned()),
            ..RawSearchParams::default()
        });
        assert!(criteria.job_type.is_none());
        assert!(criteria.matches(&posting("Dev", "Acme", None)));
    }

    #[test]
    fn adding_a_criterion_never_widens_the_result_set() {
        let postings = vec![
            posting("Backend Developer", "Acme", Some(90_000)),
            posting("Frontend Developer", "Acme", Some(70_000)),
            posting("Backend Engineer", "Globex", None),
        ];

        let loose = JobSearchCriteria::from_raw(RawSearchParams {
            job_title: Some("developer".to_owned()),
            ..RawSearchParams::default()
        });
        let tight = JobSearchCriteria::from_raw(RawSearchParams {
            job_title: Some("developer".to_owned()),
            min_salary: Some("80000".to_owned()),
            ..RawSearchParams::default()
        });

        let loose_hits = postings.iter().filter(|p| loose.matches(p)).count();
        let tight_hits = postings.iter().filter(|p| tight.matches(p)).count();
        assert!(tight_hits <= loose_hits);
        assert_eq!(loose_hits, 2);
        assert_eq!(tight_hits, 1);
    }
}
