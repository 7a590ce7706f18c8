//! Text output formatting.
//!
//! Human-facing output goes to stdout through these helpers; diagnostics
//! go through `tracing` to stderr.

use coursehunt_core::{Category, Course, Grade};
use coursehunt_engine::{HuntReport, HuntState};
use coursehunt_store::Config;

// ============================================================================
// ANSI Colors
// ============================================================================

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const CYAN: &str = "\x1b[36m";

/// Neutral informational line.
pub fn note(message: &str) {
    println!("{CYAN}{message}{RESET}");
}

/// Something went right.
pub fn success(message: &str) {
    println!("{GREEN}{message}{RESET}");
}

/// Something to pay attention to.
pub fn warn(message: &str) {
    println!("{YELLOW}{message}{RESET}");
}

/// Operator-facing failure line (stderr).
pub fn error(message: &str) {
    eprintln!("{RED}{message}{RESET}");
}

// ============================================================================
// Tables
// ============================================================================

/// Numbered category listing for the select flow.
pub fn print_categories(categories: &[Category]) {
    println!("{BOLD}available categories{RESET}");
    for (index, category) in categories.iter().enumerate() {
        println!("  {CYAN}{:>2}{RESET}  {}", index + 1, category.name);
    }
}

/// One course, in full, for a review decision.
pub fn print_course_detail(course: &Course) {
    println!();
    println!("{BOLD}{}{RESET}  {YELLOW}{}{RESET}", course.name, course.seats());
    for line in course.info.lines() {
        println!("  {line}");
    }
}

/// The stored target list.
pub fn print_selected(courses: &[Course]) {
    println!("{BOLD}target list ({} courses){RESET}", courses.len());
    for course in courses {
        let info = course.info.lines().next().unwrap_or("");
        println!("  {CYAN}{}{RESET}  {info}", course.name);
    }
}

/// Courses already claimed on the portal.
pub fn print_claimed(courses: &[Course]) {
    println!("{BOLD}claimed courses ({}){RESET}", courses.len());
    for course in courses {
        let at = course.claimed_at.map_or_else(String::new, |t| {
            t.with_timezone(&chrono::Local)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string()
        });
        println!(
            "  {GREEN}{}{RESET}  {}  {YELLOW}{at}{RESET}",
            course.name,
            course.seats()
        );
    }
}

/// The grade report.
pub fn print_grades(grades: &[Grade]) {
    println!("{BOLD}grades ({}){RESET}", grades.len());
    for grade in grades {
        println!(
            "  {CYAN}{}{RESET}  {}  {GREEN}{}{RESET}  {YELLOW}{}{RESET}",
            grade.course_name,
            grade.course_type.as_deref().unwrap_or("-"),
            grade.score,
            grade.standing()
        );
    }
}

/// The configuration record, one field per line.
pub fn print_config(config: &Config) {
    for (name, value) in config.entries() {
        println!("  {CYAN}{name:<22}{RESET}{value}");
    }
}

/// End-of-session summary.
pub fn print_report(report: &HuntReport, remaining: &[Course]) {
    for course in &report.claimed {
        success(&format!("claimed: {}", course.name));
    }

    match report.state {
        HuntState::Completed if remaining.is_empty() => {
            success("all target courses claimed");
        }
        HuntState::Completed => {
            warn(&format!(
                "{} course(s) were set aside this session and stay on the list",
                remaining.len()
            ));
        }
        HuntState::Exhausted => {
            error("retry budget exhausted; unclaimed courses were saved");
        }
        HuntState::Cancelled => {
            note("cancelled; progress saved");
        }
        _ => {}
    }

    note(&format!(
        "{} attempt(s), budget spent {}/{}",
        report.attempts.len(),
        report.budget.spent(),
        report.budget.max()
    ));
}
