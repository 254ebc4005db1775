//! Capability tags carried in a token's `roles` claim.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A named capability. The set of roles is closed: a token naming any other
/// role fails validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub const ALL: [Role; 2] = [Role::Admin, Role::User];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::User => "USER",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ValidationError;

    /// Role names are matched exactly; `admin` is not `ADMIN`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownRole(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_roles() {
        assert_eq!("ADMIN".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!("USER".parse::<Role>().unwrap(), Role::User);
    }

    #[test]
    fn test_parse_is_exact() {
        assert!(matches!(
            "admin".parse::<Role>(),
            Err(ValidationError::UnknownRole(name)) if name == "admin"
        ));
    }

    #[test]
    fn test_serde_uses_wire_names() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), r#""ADMIN""#);
        let role: Role = serde_json::from_str(r#""USER""#).unwrap();
        assert_eq!(role, Role::User);
    }
}
