//! Process-fatal conditions.

/// Abort the process because a service that must exist is gone.
///
/// Never returns and never unwinds.
pub fn missing_service(service: &str) -> ! {
    tracing::error!(service, "Required service is not available, aborting");
    std::process::abort()
}
