//! Port abstraction for applicant record persistence and its errors.

use async_trait::async_trait;

use crate::domain::UserRecord;

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
    }
}

/// Store of applicant records keyed by national id for reads and by user id
/// for writes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fetch the record registered under a national id.
    async fn find_by_national_id(
        &self,
        national_id: &str,
    ) -> Result<Option<UserRecord>, UserPersistenceError>;

    /// Write a record keyed by its user id.
    ///
    /// `None` fields keep the stored value; validity flags are always
    /// written. A missing row is created.
    async fn update_by_id(&self, record: &UserRecord) -> Result<(), UserPersistenceError>;
}

/// Fixture implementation: no records exist and writes are discarded.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureUserRepository;

#[async_trait]
impl UserRepository for FixtureUserRepository {
    async fn find_by_national_id(
        &self,
        _national_id: &str,
    ) -> Result<Option<UserRecord>, UserPersistenceError> {
        Ok(None)
    }

    async fn update_by_id(&self, _record: &UserRecord) -> Result<(), UserPersistenceError> {
        Ok(())
    }
}
