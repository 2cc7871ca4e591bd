/// Macro to generate the repository-error conversion for service errors
///
/// Usage:
/// ```ignore
/// impl_service_error_conversions!(UserServiceError, InternalServerError);
/// ```
///
/// Conflicts that the service does not translate itself fall through to the
/// internal variant.
#[macro_export]
macro_rules! impl_service_error_conversions {
  ($error_type:ty, $internal_variant:ident) => {
    impl From<$crate::domains::user::repository::RepositoryError> for $error_type {
      fn from(err: $crate::domains::user::repository::RepositoryError) -> Self {
        use $crate::domains::user::repository::RepositoryError;
        match err {
          RepositoryError::DatabaseError(msg) => <$error_type>::$internal_variant(format!("Database error: {}", msg)),
          RepositoryError::Conflict(constraint) => {
            <$error_type>::$internal_variant(format!("Unexpected constraint violation: {}", constraint))
          }
        }
      }
    }
  };
}
