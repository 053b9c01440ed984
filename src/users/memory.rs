//! In-memory stores for handler tests.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::users::model::{NewUser, User};
use crate::users::repo::{StoreError, UserStore};

#[derive(Default)]
pub struct MemoryUserStore {
    rows: Mutex<BTreeMap<i32, User>>,
    next_id: AtomicUsize,
    calls: AtomicUsize,
}

impl MemoryUserStore {
    /// Number of store operations issued so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn touch(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn list(&self) -> Result<Vec<User>, StoreError> {
        self.touch();
        Ok(self.rows.lock().unwrap().values().cloned().collect())
    }

    async fn get(&self, user_id: i32) -> Result<Option<User>, StoreError> {
        self.touch();
        Ok(self.rows.lock().unwrap().get(&user_id).cloned())
    }

    async fn insert(&self, user: NewUser) -> Result<User, StoreError> {
        self.touch();
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) as i32 + 1;
        let user = user.with_id(id);
        self.rows.lock().unwrap().insert(id, user.clone());
        Ok(user)
    }

    async fn update(&self, user_id: i32, user: &NewUser) -> Result<(), StoreError> {
        self.touch();
        let mut rows = self.rows.lock().unwrap();
        if let Some(row) = rows.get_mut(&user_id) {
            *row = user.clone().with_id(user_id);
        }
        Ok(())
    }

    async fn delete(&self, user_id: i32) -> Result<(), StoreError> {
        self.touch();
        self.rows.lock().unwrap().remove(&user_id);
        Ok(())
    }
}

/// Every call fails as if the database were unreachable.
pub struct FailingUserStore;

fn unreachable_db() -> StoreError {
    StoreError::Database(sqlx::Error::PoolTimedOut)
}

#[async_trait]
impl UserStore for FailingUserStore {
    async fn list(&self) -> Result<Vec<User>, StoreError> {
        Err(unreachable_db())
    }

    async fn get(&self, _user_id: i32) -> Result<Option<User>, StoreError> {
        Err(unreachable_db())
    }

    async fn insert(&self, _user: NewUser) -> Result<User, StoreError> {
        Err(unreachable_db())
    }

    async fn update(&self, _user_id: i32, _user: &NewUser) -> Result<(), StoreError> {
        Err(unreachable_db())
    }

    async fn delete(&self, _user_id: i32) -> Result<(), StoreError> {
        Err(unreachable_db())
    }
}
