use crate::storage::{get_state, set_state};
use clamm_types::Error;
use soroban_sdk::Env;

/// Exclusive hold on the pool state for the duration of one entry point.
///
/// Acquiring fails with `Error::Locked` while another hold is live. The flag
/// is cleared again when the guard drops, on every exit path. State must be
/// read after the guard is acquired so later writes keep the flag set.
pub struct PoolLock {
    env: Env,
}

impl PoolLock {
    pub fn acquire(env: &Env) -> Result<Self, Error> {
        let mut state = get_state(env)?;
        if !state.unlocked {
            return Err(Error::Locked);
        }
        state.unlocked = false;
        set_state(env, &state);
        Ok(Self { env: env.clone() })
    }
}

impl Drop for PoolLock {
    fn drop(&mut self) {
        if let Ok(mut state) = get_state(&self.env) {
            state.unlocked = true;
            set_state(&self.env, &state);
        }
    }
}
