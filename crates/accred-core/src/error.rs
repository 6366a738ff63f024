//! # Error Hierarchy
//!
//! Structured error types for the domain layer, built with `thiserror`.
//! Validation errors carry the offending field so the API can report it
//! back to the registration form.

use thiserror::Error;

/// Domain primitive and registration validation failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required name field is shorter than two characters after trimming.
    #[error("{field} must contain at least 2 characters")]
    NameTooShort {
        /// Wire name of the field.
        field: &'static str,
    },

    /// The email address does not look like `local@domain.tld`.
    #[error("invalid email address: {0:?}")]
    InvalidEmail(String),

    /// The phone number is not 7 to 12 digits.
    #[error("phone number must be 7 to 12 digits, got {0:?}")]
    InvalidPhone(String),

    /// A free-text field exceeds its length cap.
    #[error("{field} must not exceed {max} characters")]
    FieldTooLong {
        /// Wire name of the field.
        field: &'static str,
        /// Maximum number of characters.
        max: usize,
    },

    /// A ticket identifier was empty after trimming.
    #[error("ticket identifier must not be empty")]
    EmptyTicketId,

    /// The configured ticket prefix cannot produce readable ticket IDs.
    #[error("invalid ticket prefix: {0:?}")]
    InvalidTicketPrefix(String),

    /// A stored record claims `checkedIn` without `checkedInAt` or the reverse.
    #[error("participant {ticket_id} has inconsistent check-in fields")]
    InconsistentAttendance {
        /// Ticket of the offending record.
        ticket_id: String,
    },

    /// Unknown value for a check-in policy setting.
    #[error("unknown check-in policy {0:?}; expected \"idempotent\" or \"reject\"")]
    UnknownCheckInPolicy(String),
}

/// Failures while rendering the participant export.
#[derive(Error, Debug)]
pub enum ExportError {
    /// The CSV writer failed (includes I/O failures of the sink).
    #[error("CSV export failed: {0}")]
    Csv(#[from] csv::Error),

    /// The rendered export was not valid UTF-8.
    #[error("CSV export produced invalid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// The writer could not be flushed into its buffer.
    #[error("CSV export could not be finalized: {0}")]
    Finalize(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_messages_name_the_field() {
        let err = ValidationError::NameTooShort { field: "firstName" };
        assert!(err.to_string().contains("firstName"));

        let err = ValidationError::FieldTooLong {
            field: "opinion",
            max: 2000,
        };
        assert!(err.to_string().contains("opinion"));
        assert!(err.to_string().contains("2000"));
    }

    #[test]
    fn inconsistent_attendance_mentions_ticket() {
        let err = ValidationError::InconsistentAttendance {
            ticket_id: "AS-2026-0001".into(),
        };
        assert!(err.to_string().contains("AS-2026-0001"));
    }
}
