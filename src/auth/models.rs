//! Authentication models

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// User roles. Each role owns a disjoint route subtree and layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Platform operator - sees every store, vendor and customer
    Superadmin,
    /// Store owner - manages their own catalogue and orders
    Vendor,
    /// Shopper - cart, orders and profile
    Customer,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Superadmin, Role::Vendor, Role::Customer];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Superadmin => "superadmin",
            Role::Vendor => "vendor",
            Role::Customer => "customer",
        }
    }

    /// Landing page after a successful login
    pub fn home(&self) -> &'static str {
        match self {
            Role::Superadmin => "/dashboard",
            Role::Vendor => "/vendor/dashboard",
            Role::Customer => "/customer/dashboard",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "superadmin" => Ok(Role::Superadmin),
            "vendor" => Ok(Role::Vendor),
            "customer" => Ok(Role::Customer),
            other => Err(Error::UnknownRole(other.to_string())),
        }
    }
}

/// The user object the backend returns at login and that is persisted
/// under the `user` storage key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "UserWire")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    pub role: Role,

    /// Everything else the backend sent (phone, storeName, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Wire form of [`User`]. Backends may send `_id`, `id` or both;
/// `_id` wins when present.
#[derive(Deserialize)]
struct UserWire {
    #[serde(default, rename = "_id")]
    mongo_id: Option<String>,

    #[serde(default)]
    id: Option<String>,

    #[serde(default)]
    email: Option<String>,

    #[serde(default)]
    name: Option<String>,

    role: Role,

    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl TryFrom<UserWire> for User {
    type Error = String;

    fn try_from(wire: UserWire) -> Result<Self, Self::Error> {
        let id = wire
            .mongo_id
            .or(wire.id)
            .ok_or_else(|| "missing field `_id`".to_string())?;

        Ok(Self {
            id,
            email: wire.email,
            name: wire.name,
            role: wire.role,
            extra: wire.extra,
        })
    }
}

impl User {
    /// Stand-in used when the stored `user` value is missing or unreadable
    pub fn placeholder(id: &str, role: Role) -> Self {
        Self {
            id: id.to_string(),
            email: None,
            name: None,
            role,
            extra: Map::new(),
        }
    }
}

/// Login credentials
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Raw login response. Kept loose so a missing token or an unknown role
/// can be reported instead of failing deserialization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub token: Option<String>,

    #[serde(default)]
    pub user: Option<Value>,

    #[serde(default)]
    pub message: Option<String>,
}

/// Account registration payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    /// Vendors only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_name: Option<String>,

    /// Vendors only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gst_number: Option<String>,
}
