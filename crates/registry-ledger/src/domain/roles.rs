//! # Roles
//!
//! Role identifiers are 32 bytes. The admin role is all zeros; every other
//! role is the keccak256 of its name.

use registry_signatures::{keccak256, Hash};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Name hashed into [`RoleId::beneficiary`].
pub const BENEFICIARY_ROLE: &str = "BENEFICIARY_ROLE";

/// Name used in diagnostics for [`RoleId::DEFAULT_ADMIN`].
pub const DEFAULT_ADMIN_ROLE: &str = "DEFAULT_ADMIN_ROLE";

/// 32-byte role identifier.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoleId(pub Hash);

impl RoleId {
    /// Administers every role, including itself.
    pub const DEFAULT_ADMIN: Self = Self([0u8; 32]);

    /// `keccak256(name)`
    pub fn named(name: &str) -> Self {
        Self(keccak256(name.as_bytes()))
    }

    /// Role allowed to move the beneficiary.
    pub fn beneficiary() -> Self {
        Self::named(BENEFICIARY_ROLE)
    }
}

impl fmt::Debug for RoleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RoleId(0x")?;
        for byte in &self.0[..4] {
            write!(f, "{byte:02x}")?;
        }
        write!(f, "..)")
    }
}
