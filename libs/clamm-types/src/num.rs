use soroban_sdk::{Env, U256};

/// Conversion from a host `U256` into the math kernel's word type.
pub trait ToWord {
    fn to_word(&self) -> ethnum::U256;
}

impl ToWord for U256 {
    fn to_word(&self) -> ethnum::U256 {
        let mut buf = [0u8; 32];
        self.to_be_bytes().copy_into_slice(&mut buf);
        ethnum::U256::from_be_bytes(buf)
    }
}

/// Conversion from a math kernel word into a host `U256`.
pub trait ToHost {
    fn to_host(&self, env: &Env) -> U256;
}

impl ToHost for ethnum::U256 {
    fn to_host(&self, env: &Env) -> U256 {
        let (hi, lo) = self.into_words();
        U256::from_parts(env, (hi >> 64) as u64, hi as u64, (lo >> 64) as u64, lo as u64)
    }
}
