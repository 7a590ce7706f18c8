//! Change command - re-review the stored target list.

use anyhow::Result;
use coursehunt_core::Course;
use coursehunt_store::{self as store, StoreError};

use super::{hook_interrupt, review_courses};
use crate::output;
use crate::ExitCode;

/// Runs the change command.
///
/// Walks the existing queue with the same y/n/q review used by `select`;
/// accepted courses stay, skipped ones are dropped. Cancelling keeps the
/// original list untouched.
pub async fn run() -> Result<()> {
    let courses = match store::load_courses().await {
        Ok(courses) => courses,
        Err(e @ StoreError::NoCourses) => {
            output::error(&e.to_string());
            std::process::exit(ExitCode::Error as i32);
        }
        Err(e) => return Err(e.into()),
    };

    let cancel = hook_interrupt();

    let mut kept: Vec<Course> = Vec::new();
    let finished = review_courses(&courses, &mut kept, &cancel).await;
    if !finished && cancel.is_cancelled() {
        kept = courses;
    }

    store::save_courses(&kept).await?;
    output::note(&format!("{} course(s) kept", kept.len()));
    Ok(())
}
