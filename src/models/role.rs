/// Registration roles
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Roles that own a record set in the store. Each role maps to one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    ResellerPanel,
    AdminPanel,
    PantherPanel,
    Owner,
}

/// Returned when a role identifier is not one of [`Role::ALL`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRole(pub String);

impl fmt::Display for UnknownRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown role '{}'", self.0)
    }
}

impl std::error::Error for UnknownRole {}

impl Role {
    pub const ALL: [Role; 4] = [Role::ResellerPanel, Role::AdminPanel, Role::PantherPanel, Role::Owner];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::ResellerPanel => "resellerpanel",
            Role::AdminPanel => "adminpanel",
            Role::PantherPanel => "pantherpanel",
            Role::Owner => "owner",
        }
    }

    /// Path of this role's record set inside the repository
    ///
    /// # Examples
    ///
    /// ```
    /// use rolereg::models::Role;
    ///
    /// assert_eq!(Role::Owner.store_path("database/user"), "database/user/owner.json");
    /// assert_eq!(Role::AdminPanel.store_path("users"), "users/adminpanel.json");
    /// ```
    pub fn store_path(&self, base_path: &str) -> String {
        format!("{}/{}.json", base_path, self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    /// Exact, case-sensitive match against the role identifiers
    ///
    /// # Examples
    ///
    /// ```
    /// use rolereg::models::Role;
    ///
    /// assert_eq!("owner".parse::<Role>(), Ok(Role::Owner));
    /// assert!("Owner".parse::<Role>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| UnknownRole(s.to_string()))
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
