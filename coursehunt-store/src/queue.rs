//! The target-queue file.
//!
//! An ordered list of courses pending a claim attempt, durable across
//! process restarts. The file is only rewritten at session end, so an
//! interrupted run resumes from the previous snapshot.

use coursehunt_core::Course;
use std::path::Path;
use tracing::info;

use crate::error::StoreError;
use crate::persistence::{self, default_queue_path};

/// Loads the target queue from the default path.
pub async fn load_courses() -> Result<Vec<Course>, StoreError> {
    load_courses_from(&default_queue_path()).await
}

/// Loads the target queue from a specific path.
///
/// A missing file or an empty list is [`StoreError::NoCourses`]: there is
/// nothing to hunt, which callers treat as recoverable before curation
/// and as a setup error before hunting.
pub async fn load_courses_from(path: &Path) -> Result<Vec<Course>, StoreError> {
    if !path.exists() {
        return Err(StoreError::NoCourses);
    }
    let courses: Vec<Course> = persistence::load_json(path).await?;
    if courses.is_empty() {
        return Err(StoreError::NoCourses);
    }
    Ok(courses)
}

/// Saves the target queue to the default path.
pub async fn save_courses(courses: &[Course]) -> Result<(), StoreError> {
    save_courses_to(&default_queue_path(), courses).await
}

/// Saves the target queue to a specific path, overwriting atomically.
pub async fn save_courses_to(path: &Path, courses: &[Course]) -> Result<(), StoreError> {
    persistence::save_json(path, &courses).await?;
    info!(count = courses.len(), "target queue saved");
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
