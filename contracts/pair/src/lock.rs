// Reentrancy lock
//
// Held for the whole entry point, callback window included. Dropping the
// guard clears the flag on every exit path.

use duoswap_math::DuoError;
use soroban_sdk::Env;

use crate::storage::DataKey;

pub struct ReentrancyLock<'a> {
    env: &'a Env,
}

impl<'a> ReentrancyLock<'a> {
    pub fn acquire(env: &'a Env) -> Result<Self, DuoError> {
        let instance = env.storage().instance();
        if instance.has(&DataKey::Locked) {
            return Err(DuoError::Locked);
        }
        instance.set(&DataKey::Locked, &true);
        Ok(Self { env })
    }
}

impl Drop for ReentrancyLock<'_> {
    fn drop(&mut self) {
        self.env.storage().instance().remove(&DataKey::Locked);
    }
}
