//! A lightweight success-or-failure value for operations whose callers
//! often only care *whether* something worked, plus the [`Fault`] error it
//! turns into at the point where a real `Result` is needed.

use std::fmt;

use thiserror::Error;

use crate::memory::{MemoryError, PtrOrStreamError};

/// The coarse classification of a [`Fault`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FaultKind {
    General,
    OutOfRange,
    InvalidOperation,
    Io,
}

impl fmt::Display for FaultKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FaultKind::General => "general",
            FaultKind::OutOfRange => "out of range",
            FaultKind::InvalidOperation => "invalid operation",
            FaultKind::Io => "io",
        };
        write!(formatter, "{}", name)
    }
}

/// The error form of a failed [`Outcome`].
#[derive(Error, Debug)]
#[error("A fault of kind '{kind}' occurred! {message}")]
pub struct Fault {
    kind: FaultKind,
    message: String,
}

impl Fault {

    pub fn new(kind: FaultKind, message: impl Into<String>) -> Fault {
        Fault { kind, message: message.into() }
    }

    pub fn kind(&self) -> FaultKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<MemoryError> for Fault {
    fn from(error: MemoryError) -> Fault {
        Fault::new(FaultKind::OutOfRange, error.to_string())
    }
}

impl From<PtrOrStreamError> for Fault {
    fn from(error: PtrOrStreamError) -> Fault {
        let kind = match &error {
            PtrOrStreamError::NotAPtrError => FaultKind::InvalidOperation,
            PtrOrStreamError::NotAStreamError => FaultKind::InvalidOperation,
            PtrOrStreamError::IoError(..) => FaultKind::Io,
        };
        Fault::new(kind, error.to_string())
    }
}

/// The result of an operation, carrying a value on success and a kind plus
/// an optional message on failure.
///
/// Unlike `Result`, an `Outcome` can be inspected without consuming it and
/// compares equal to another `Outcome` whenever both succeeded with equal
/// values or both failed with the same [`FaultKind`]; the message is
/// deliberately excluded from equality. [`check`] and [`get`] convert to a
/// `Result` at the boundary.
///
/// [`check`]: Outcome::check
/// [`get`]: Outcome::get
#[derive(Debug)]
pub struct Outcome<T = ()> {
    value: Option<T>,
    success: bool,
    message: Option<String>,
    kind: FaultKind,
}

impl <T> Outcome<T> {

    /// Creates a successful outcome carrying the given value.
    pub fn success(value: T) -> Outcome<T> {
        Outcome {
            value: Some(value),
            success: true,
            message: None,
            kind: FaultKind::General,
        }
    }

    /// Creates a failed outcome of kind [`FaultKind::General`].
    pub fn failure(message: impl Into<String>) -> Outcome<T> {
        Outcome::failure_of_kind(FaultKind::General, message)
    }

    /// Creates a failed outcome of the given kind.
    pub fn failure_of_kind(kind: FaultKind, message: impl Into<String>) -> Outcome<T> {
        Outcome {
            value: None,
            success: false,
            message: Some(message.into()),
            kind,
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn is_failure(&self) -> bool {
        !self.success
    }

    /// The failure message, if there is one.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// The failure's kind. Meaningless for a successful outcome.
    pub fn kind(&self) -> FaultKind {
        self.kind
    }

    /// The carried value, if the outcome succeeded.
    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    /// The carried value, discarding any failure.
    pub fn ok(self) -> Option<T> {
        self.value
    }

    /// Converts into a `Result`, dropping the value.
    pub fn check(&self) -> Result<(), Fault> {
        if self.success {
            Ok(())
        }
        else {
            Err(self.to_fault())
        }
    }

    /// Converts into a `Result`, carrying the value over.
    pub fn get(self) -> Result<T, Fault> {
        match self.value {
            Some(value) if self.success => Ok(value),
            _ => Err(self.to_fault()),
        }
    }

    fn to_fault(&self) -> Fault {
        Fault::new(self.kind, self.message.clone().unwrap_or_default())
    }
}

impl <T> PartialEq for Outcome<T>
where T: PartialEq {
    fn eq(&self, other: &Outcome<T>) -> bool {
        if self.success != other.success {
            return false;
        }
        if self.success {
            self.value == other.value
        }
        else {
            self.kind == other.kind
        }
    }
}

impl <T> From<Fault> for Outcome<T> {
    fn from(fault: Fault) -> Outcome<T> {
        Outcome::failure_of_kind(fault.kind, fault.message)
    }
}

impl <T> From<MemoryError> for Outcome<T> {
    fn from(error: MemoryError) -> Outcome<T> {
        Outcome::from(Fault::from(error))
    }
}

impl <T> From<PtrOrStreamError> for Outcome<T> {
    fn from(error: PtrOrStreamError) -> Outcome<T> {
        Outcome::from(Fault::from(error))
    }
}

#[cfg(test)]
mod test {
    use hamcrest2::prelude::*;

    use crate::memory::{ConstPtr, PtrOrStreamError};
    use crate::result::{Fault, FaultKind, Outcome};

    #[test]
    fn test_that_a_successful_outcome_carries_its_value() {

        let outcome = Outcome::success(42);

        assert_that!(outcome.is_success(), is(true));
        assert_that!(outcome.value(), is(equal_to(Some(&42))));
        assert_that!(outcome.message(), is(equal_to(None)));
        assert_that!(outcome.get().unwrap(), is(equal_to(42)));
    }

    #[test]
    fn test_that_a_failed_outcome_carries_kind_and_message() {

        let outcome: Outcome<i32> = Outcome::failure_of_kind(FaultKind::OutOfRange, "Too far!");

        assert_that!(outcome.is_failure(), is(true));
        assert_that!(outcome.kind(), is(equal_to(FaultKind::OutOfRange)));
        assert_that!(outcome.message(), is(equal_to(Some("Too far!"))));

        let fault = outcome.get().unwrap_err();

        assert_that!(fault.kind(), is(equal_to(FaultKind::OutOfRange)));
        assert_that!(fault.message(), is(equal_to("Too far!")));
    }

    #[test]
    fn test_that_equality_ignores_the_message() {

        let left: Outcome<i32> = Outcome::failure("One reason!");
        let right: Outcome<i32> = Outcome::failure("Another reason!");

        assert_that!(left == right, is(true));

        let success = Outcome::success(1);
        let other_success = Outcome::success(2);

        assert_that!(success == other_success, is(false));
        assert_that!(success == Outcome::success(1), is(true));
        assert_that!(success == left, is(false));
    }

    #[test]
    fn test_that_view_errors_become_out_of_range_faults() {

        let data = [1, 2, 3];
        let ptr = ConstPtr::new(&data);

        let error = ptr.at(7).unwrap_err();
        let outcome: Outcome<i32> = Outcome::from(error);

        assert_that!(outcome.is_failure(), is(true));
        assert_that!(outcome.kind(), is(equal_to(FaultKind::OutOfRange)));
    }

    #[test]
    fn test_that_backend_mismatches_become_invalid_operation_faults() {

        let fault = Fault::from(PtrOrStreamError::NotAPtrError);

        assert_that!(fault.kind(), is(equal_to(FaultKind::InvalidOperation)));
    }

    #[test]
    fn test_that_io_errors_become_io_faults() {

        let error = std::io::Error::new(std::io::ErrorKind::Other, "Broken!");
        let fault = Fault::from(PtrOrStreamError::IoError(error));

        assert_that!(fault.kind(), is(equal_to(FaultKind::Io)));
    }

    #[test]
    fn test_that_check_reports_without_consuming_the_value() {

        let outcome = Outcome::success("payload");

        assert_that!(outcome.check().is_ok(), is(true));
        assert_that!(outcome.ok(), is(equal_to(Some("payload"))));

        let failed: Outcome<&str> = Outcome::failure("No payload!");

        assert_that!(failed.check().is_err(), is(true));
    }
}
