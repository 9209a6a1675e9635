use thiserror::Error;

/// Errors surfaced by grid layout. All of them are caller bugs caught before
/// any cell or item is touched.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GridError {
    #[error("invalid grid configuration: `{field}` = {value}")]
    InvalidConfig { field: &'static str, value: f64 },
}

pub type Result<T, E = GridError> = std::result::Result<T, E>;
