pub mod appointments;
pub mod dashboard;
pub mod members;
pub mod responsibilities;
pub mod services;
pub mod unlock;
pub mod upcoming;

/// Treat an empty flag value as "not set".
pub fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
