//! Catalog entities: courses, categories, terms, and grades.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One claimable seat in the course catalog.
///
/// Created by the catalog client from remote listings. The only mutation
/// after creation is the engine stamping [`Course::claimed_at`] on a
/// successful claim; a claimed course is never touched again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    /// Stable identifier assigned by the portal.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Free-text description extracted from the portal listing.
    pub info: String,
    /// Claim-method code of the category this course was found under.
    pub claim_code: String,
    /// Academic year the seat belongs to.
    pub academic_year: String,
    /// Term within the academic year.
    pub term: String,
    /// Seat capacity, as reported by the portal.
    pub capacity: String,
    /// Current enrollment, as reported by the portal.
    pub enrolled: String,
    /// Set exactly once, when the seat was successfully claimed.
    #[serde(default)]
    pub claimed_at: Option<DateTime<Utc>>,
}

impl Course {
    /// Formats enrollment as `enrolled/capacity` for display.
    pub fn seats(&self) -> String {
        format!("{}/{}", self.enrolled, self.capacity)
    }
}

/// A course category (claim method) offered for the registration window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Claim-method code sent back with catalog and claim requests.
    pub code: String,
    /// Display name.
    pub name: String,
}

/// Academic-year/term pair for the open registration window, plus the
/// current term the portal considers "now".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermWindow {
    /// Academic year registration is open for.
    pub academic_year: String,
    /// Term registration is open for.
    pub term: String,
    /// The current academic year.
    pub current_academic_year: String,
    /// The current term.
    pub current_term: String,
}

/// One row of the student's grade report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grade {
    /// Course name.
    pub course_name: String,
    /// Assessment type, when the portal reports one.
    pub course_type: Option<String>,
    /// Final score, as reported.
    pub score: String,
    /// Rank within the cohort.
    pub rank: String,
    /// Cohort size.
    pub total_students: String,
}

impl Grade {
    /// Formats rank as `rank/total` for display.
    pub fn standing(&self) -> String {
        format!("{}/{}", self.rank, self.total_students)
    }
}
