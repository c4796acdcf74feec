use std::sync::Arc;

use tinyledger_core::{DomainError, DomainResult, UserId};
use tinyledger_users::User;

use crate::store::InMemoryStore;

/// Storage for users.
pub trait UserRepository: Send + Sync {
    /// Store a new user. Fails if a user with the same id exists.
    fn save(&self, user: User) -> DomainResult<Arc<User>>;
    fn get(&self, id: UserId) -> Option<Arc<User>>;
}

impl<S> UserRepository for Arc<S>
where
    S: UserRepository + ?Sized,
{
    fn save(&self, user: User) -> DomainResult<Arc<User>> {
        (**self).save(user)
    }

    fn get(&self, id: UserId) -> Option<Arc<User>> {
        (**self).get(id)
    }
}

#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: InMemoryStore<UserId, Arc<User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl UserRepository for InMemoryUserRepository {
    fn save(&self, user: User) -> DomainResult<Arc<User>> {
        let id = user.id_typed();
        let user = Arc::new(user);
        if !self.users.insert_new(id, user.clone()) {
            return Err(DomainError::user_already_exists(id));
        }
        tracing::debug!(user_id = %id, "user stored");
        Ok(user)
    }

    fn get(&self, id: UserId) -> Option<Arc<User>> {
        self.users.get(&id)
    }
}
