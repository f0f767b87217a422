//! Session pointer: the single persisted reference to the signed-in account.
//!
//! # Invariants
//! - The session slot holds a bare account id string.
//! - A pointer to an account that no longer exists resolves to `None`.

use super::store::StoreAccess;
use super::unit_of_work::UnitOfWork;
use crate::model::account::Account;
use crate::model::AccountId;
use log::info;

impl UnitOfWork<'_> {
    /// Case-insensitive username plus exact password match. On success the
    /// account becomes the active session.
    pub fn authenticate(&mut self, username: &str, password: &str) -> Option<Account> {
        let account = self
            .list::<Account>()
            .iter()
            .find(|account| account.has_username(username) && account.password == password)
            .cloned();
        match &account {
            Some(account) => {
                self.set_session_pointer(Some(account.id.clone()));
                info!(
                    "event=session_start module=repo status=ok account_id={}",
                    account.id
                );
            }
            None => info!("event=session_start module=repo status=rejected"),
        }
        account
    }

    pub fn end_session(&mut self) {
        self.set_session_pointer(None);
        info!("event=session_end module=repo status=ok");
    }

    pub fn session_account_id(&mut self) -> Option<AccountId> {
        self.session_pointer()
    }

    pub fn current_session(&mut self) -> Option<Account> {
        let account_id = self.session_pointer()?;
        self.find_account(&account_id)
    }
}

/// Session pointer contract.
pub trait SessionRepository: StoreAccess {
    fn authenticate(&self, username: &str, password: &str) -> Option<Account> {
        self.unit_of_work(|unit| unit.authenticate(username, password))
    }

    fn end_session(&self) {
        self.unit_of_work(|unit| unit.end_session())
    }

    /// Raw pointer value, without resolving the account.
    fn session_account_id(&self) -> Option<AccountId> {
        self.unit_of_work(|unit| unit.session_account_id())
    }

    /// Resolves the pointer to the full account record.
    fn current_session(&self) -> Option<Account> {
        self.unit_of_work(|unit| unit.current_session())
    }
}

impl<S: StoreAccess> SessionRepository for S {}
