//! Trait contracts the hunting engine consumes.
//!
//! The engine only ever sees these three interfaces; the portal crate
//! provides the concrete implementations, and tests substitute scripted
//! ones.

use crate::error::{AuthError, PortalError};
use crate::models::{Category, Course, Credentials, Grade, SessionCredential, TermWindow};

/// Obtains and refreshes the opaque session credential.
pub trait SessionProvider: Send + Sync {
    /// Logs in with the given credentials and returns a fresh session.
    ///
    /// Fails with [`AuthError`] when the login markup is unrecognized or
    /// the remote rejects the credentials.
    fn obtain(
        &self,
        credentials: &Credentials,
    ) -> impl std::future::Future<Output = Result<SessionCredential, AuthError>> + Send;
}

/// Attempts to claim one target course.
pub trait ClaimClient: Send + Sync {
    /// Claims a seat in `course` for the authenticated user.
    ///
    /// `Ok(())` means the seat is claimed. Everything else is classified
    /// by [`PortalError`]; the engine inspects nothing beyond that.
    fn claim(
        &self,
        session: &SessionCredential,
        course: &Course,
    ) -> impl std::future::Future<Output = Result<(), PortalError>> + Send;
}

/// Read-only catalog discovery against the portal.
pub trait CatalogClient: Send + Sync {
    /// Discovers the open registration window.
    fn term_window(
        &self,
        session: &SessionCredential,
    ) -> impl std::future::Future<Output = Result<TermWindow, PortalError>> + Send;

    /// Lists the course categories available in the window.
    fn categories(
        &self,
        session: &SessionCredential,
        window: &TermWindow,
    ) -> impl std::future::Future<Output = Result<Vec<Category>, PortalError>> + Send;

    /// Searches a category for courses matching `keyword` (empty keyword
    /// returns the whole category).
    fn search(
        &self,
        session: &SessionCredential,
        category: &Category,
        window: &TermWindow,
        keyword: &str,
    ) -> impl std::future::Future<Output = Result<Vec<Course>, PortalError>> + Send;

    /// Lists the courses already claimed by the authenticated user.
    fn claimed_courses(
        &self,
        session: &SessionCredential,
        window: &TermWindow,
    ) -> impl std::future::Future<Output = Result<Vec<Course>, PortalError>> + Send;

    /// Fetches the student's grade report.
    fn grades(
        &self,
        session: &SessionCredential,
    ) -> impl std::future::Future<Output = Result<Vec<Grade>, PortalError>> + Send;
}
