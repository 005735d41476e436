//! Validation - Pure field checks that report every violation at once.
//!
//! Checks never short-circuit: a record with three bad fields produces
//! three errors in a single pass, so a caller can surface all of them
//! together. Validation has no side effects and never touches a store.
//!
//! ## Example
//!
//! ```ignore
//! impl Validate for HeritageSite {
//!     fn validate(&self) -> ValidationReport {
//!         let mut checks = Checks::new();
//!         checks.require("name", &self.name);
//!         checks.in_range("year", self.year, -3000, 2100);
//!         checks.finish()
//!     }
//! }
//! ```

/// Outcome of validating a record: either clean or a list of reasons.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationReport {
    errors: Vec<String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<String> {
        self.errors
    }

    /// Append an error from outside the field checks (e.g. cross-field
    /// rules the session enforces, such as id immutability).
    pub fn push(&mut self, error: impl Into<String>) {
        self.errors.push(error.into());
    }
}

/// Trait for records that know how to validate themselves.
pub trait Validate {
    fn validate(&self) -> ValidationReport;
}

/// Accumulator for field-level predicates.
///
/// Every check runs unconditionally and records its violation; `finish`
/// folds the results into a [`ValidationReport`].
#[derive(Debug, Default)]
pub struct Checks {
    errors: Vec<String>,
}

impl Checks {
    pub fn new() -> Self {
        Checks::default()
    }

    /// Required string field: empty and whitespace-only are treated
    /// identically to absent.
    pub fn require(&mut self, field: &str, value: &str) -> &mut Self {
        if value.trim().is_empty() {
            self.errors.push(format!("{}: required", field));
        }
        self
    }

    /// Numeric field within inclusive bounds.
    pub fn in_range(&mut self, field: &str, value: i64, min: i64, max: i64) -> &mut Self {
        if value < min || value > max {
            self.errors
                .push(format!("{}: {} out of range [{}, {}]", field, value, min, max));
        }
        self
    }

    /// String-typed enum membership (for fields not yet parsed into a
    /// Rust enum, e.g. raw form input).
    pub fn one_of(&mut self, field: &str, value: &str, allowed: &[&str]) -> &mut Self {
        if !allowed.contains(&value.trim()) {
            self.errors.push(format!(
                "{}: {:?} not one of {:?}",
                field, value, allowed
            ));
        }
        self
    }

    /// Arbitrary predicate with a caller-supplied message.
    pub fn ensure(&mut self, condition: bool, message: impl Into<String>) -> &mut Self {
        if !condition {
            self.errors.push(message.into());
        }
        self
    }

    pub fn finish(self) -> ValidationReport {
        ValidationReport {
            errors: self.errors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_checks_are_valid() {
        let mut checks = Checks::new();
        checks.require("name", "Great Wall");
        checks.in_range("year", 220, -3000, 2100);
        checks.one_of("status", "ACTIVE", &["ACTIVE", "INACTIVE", "PENDING"]);
        let report = checks.finish();
        assert!(report.is_valid());
        assert!(report.errors().is_empty());
    }

    #[test]
    fn empty_and_whitespace_fail_require() {
        let mut checks = Checks::new();
        checks.require("name", "");
        checks.require("location", "   ");
        let report = checks.finish();
        assert_eq!(report.errors().len(), 2);
        assert!(report.errors()[0].contains("name"));
        assert!(report.errors()[1].contains("location"));
    }

    #[test]
    fn range_bounds_are_inclusive() {
        let mut checks = Checks::new();
        checks.in_range("year", -3000, -3000, 2100);
        checks.in_range("year", 2100, -3000, 2100);
        assert!(checks.finish().is_valid());

        let mut checks = Checks::new();
        checks.in_range("year", 2101, -3000, 2100);
        let report = checks.finish();
        assert!(!report.is_valid());
        assert!(report.errors()[0].contains("out of range"));
    }

    #[test]
    fn all_violations_reported_in_one_pass() {
        let mut checks = Checks::new();
        checks.require("name", "");
        checks.in_range("year", 9999, -3000, 2100);
        checks.one_of("status", "RETIRED", &["ACTIVE", "INACTIVE", "PENDING"]);
        checks.ensure(false, "custom rule broken");
        let report = checks.finish();
        assert_eq!(report.errors().len(), 4);
    }

    #[test]
    fn report_push_appends() {
        let mut report = ValidationReport::default();
        assert!(report.is_valid());
        report.push("id: cannot change");
        assert!(!report.is_valid());
        assert_eq!(report.into_errors(), vec!["id: cannot change".to_string()]);
    }
}
