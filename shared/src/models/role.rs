//! Role Model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Worker role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Restaurant owner / administrator
    #[serde(rename = "dueno", alias = "admin", alias = "owner")]
    Owner,
    #[serde(rename = "cocinero", alias = "cook")]
    Cook,
    #[serde(rename = "garzon", alias = "waiter")]
    Waiter,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Owner => "dueno",
            Self::Cook => "cocinero",
            Self::Waiter => "garzon",
        }
    }

    /// Roles that watch the live order queues
    pub fn watches_orders(self) -> bool {
        matches!(self, Self::Cook | Self::Waiter)
    }

    pub fn is_admin(self) -> bool {
        matches!(self, Self::Owner)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dueno" | "dueño" | "admin" | "owner" => Ok(Self::Owner),
            "cocinero" | "cook" => Ok(Self::Cook),
            "garzon" | "garzón" | "waiter" => Ok(Self::Waiter),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse() {
        assert_eq!("Garzón".parse::<Role>(), Ok(Role::Waiter));
        assert_eq!("admin".parse::<Role>(), Ok(Role::Owner));
        assert!("cajero".parse::<Role>().is_err());
        let r: Role = serde_json::from_str(r#""cook""#).unwrap();
        assert_eq!(r, Role::Cook);
        assert_eq!(serde_json::to_string(&Role::Cook).unwrap(), r#""cocinero""#);
    }
}
