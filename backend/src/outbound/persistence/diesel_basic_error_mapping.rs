//! Shared Diesel error mapping for the account repositories.

use tracing::debug;

use super::pool::PoolError;

/// Map pool errors into a repository-specific connection error constructor.
pub(crate) fn map_basic_pool_error<E, C>(error: PoolError, connection: C) -> E
where
    C: FnOnce(String) -> E,
{
    let message = match error {
        PoolError::Checkout { message }
        | PoolError::Build { message }
        | PoolError::Unresponsive { message } => message,
    };
    connection(message)
}

/// Map common Diesel error variants into query/connection constructors.
///
/// `NotFound`, query-builder failures and unexpected database errors map to
/// query errors; closed connections map to connection errors.
pub(crate) fn map_basic_diesel_error<E, Q, C>(
    error: diesel::result::Error,
    query: Q,
    connection: C,
) -> E
where
    Q: Fn(&'static str) -> E,
    C: Fn(&'static str) -> E,
{
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => query("record not found"),
        DieselError::QueryBuilderError(_) => query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            connection("database connection error")
        }
        DieselError::DatabaseError(_, _) => query("database error"),
        _ => query("database error"),
    }
}

/// Name of the unique column a violated constraint protects, if any.
///
/// Constraint names follow PostgreSQL's `<table>_<column>_key` convention.
pub(crate) fn unique_violation_column(
    error: &diesel::result::Error,
    columns: &[&'static str],
) -> Option<&'static str> {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    let DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) = error else {
        return None;
    };
    let constraint = info.constraint_name().unwrap_or_default();
    columns
        .iter()
        .copied()
        .find(|column| constraint.contains(column))
        .or(Some("unknown"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};
    use rstest::rstest;

    #[derive(Debug)]
    struct StubInfo {
        constraint: Option<&'static str>,
    }

    impl DatabaseErrorInformation for StubInfo {
        fn message(&self) -> &str {
            "duplicate key value violates unique constraint"
        }
        fn details(&self) -> Option<&str> {
            None
        }
        fn hint(&self) -> Option<&str> {
            None
        }
        fn table_name(&self) -> Option<&str> {
            Some("users")
        }
        fn column_name(&self) -> Option<&str> {
            None
        }
        fn constraint_name(&self) -> Option<&str> {
            self.constraint
        }
        fn statement_position(&self) -> Option<i32> {
            None
        }
    }

    fn unique_violation(constraint: Option<&'static str>) -> DieselError {
        DieselError::DatabaseError(
            DatabaseErrorKind::UniqueViolation,
            Box::new(StubInfo { constraint }),
        )
    }

    const COLUMNS: &[&str] = &["email", "google_id", "referral_code"];

    #[rstest]
    #[case(Some("users_email_key"), Some("email"))]
    #[case(Some("users_google_id_key"), Some("google_id"))]
    #[case(Some("users_referral_code_key"), Some("referral_code"))]
    #[case(None, Some("unknown"))]
    fn unique_violations_name_the_column(
        #[case] constraint: Option<&'static str>,
        #[case] expected: Option<&'static str>,
    ) {
        assert_eq!(
            unique_violation_column(&unique_violation(constraint), COLUMNS),
            expected
        );
    }

    #[rstest]
    fn other_errors_are_not_unique_violations() {
        assert_eq!(unique_violation_column(&DieselError::NotFound, COLUMNS), None);
    }

    #[rstest]
    fn pool_errors_map_to_connection_constructor() {
        let mapped: String = map_basic_pool_error(PoolError::checkout("timed out"), |message| {
            format!("connection: {message}")
        });
        assert_eq!(mapped, "connection: timed out");
    }

    #[rstest]
    #[case(DieselError::NotFound, "query: record not found")]
    #[case(DieselError::RollbackTransaction, "query: database error")]
    fn diesel_errors_map_to_query_constructor(#[case] error: DieselError, #[case] expected: &str) {
        let mapped: String = map_basic_diesel_error(
            error,
            |message| format!("query: {message}"),
            |message| format!("connection: {message}"),
        );
        assert_eq!(mapped, expected);
    }
}
