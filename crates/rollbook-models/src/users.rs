//! New-user form data and the user creation result.
//!
//! [`UserForm`] is the flat record an administrator fills in; it is checked by
//! the validation helper before submission. [`CreatedUser`] is what the user
//! creation API answers with, and [`FinalCredentials`] decides which ID and
//! password are shown to the administrator afterwards.

use crate::ids::Identifier;
use rollbook_core::Credential;
use rollbook_core::serde::deserialize_optional_trimmed;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A new-user form as submitted by an administrator.
///
/// Every field is optional at this level; blank values deserialize to `None`
/// and are reported by validation rather than rejected during parsing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserForm {
    #[serde(default, deserialize_with = "deserialize_optional_trimmed")]
    pub first_name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_trimmed")]
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_trimmed")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_trimmed")]
    pub phone: Option<String>,
    /// `YYYY-MM-DD`
    #[serde(default, deserialize_with = "deserialize_optional_trimmed")]
    pub date_of_birth: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_trimmed")]
    pub gender: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_trimmed")]
    pub address: Option<String>,
    /// Class or grade, required for students.
    #[serde(
        rename = "class",
        default,
        deserialize_with = "deserialize_optional_trimmed"
    )]
    pub class_name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_trimmed")]
    pub father_name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_trimmed")]
    pub mother_name: Option<String>,
}

/// Accepted gender values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [Self::Male, Self::Female, Self::Other]
            .into_iter()
            .find(|g| g.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown gender '{}'", s.trim()))
    }
}

/// Response of the user creation API.
///
/// The API owns final ID and password assignment; either value may be absent
/// when it accepted the proposal as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedUser {
    #[serde(default, deserialize_with = "deserialize_optional_trimmed")]
    pub user_id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_trimmed")]
    pub temporary_password: Option<String>,
}

/// The ID and password to show the administrator once a user was created.
#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalCredentials {
    pub user_id: String,
    pub password: String,
    pub server_assigned_id: bool,
    pub server_assigned_password: bool,
}

impl FinalCredentials {
    /// Server-assigned values take precedence over the local proposal.
    pub fn resolve(proposed_id: &Identifier, proposed: &Credential, created: &CreatedUser) -> Self {
        let (user_id, server_assigned_id) = match &created.user_id {
            Some(id) => (id.clone(), id != &proposed_id.to_string()),
            None => (proposed_id.to_string(), false),
        };
        let (password, server_assigned_password) = match &created.temporary_password {
            Some(password) => (password.clone(), password != proposed.as_str()),
            None => (proposed.as_str().to_string(), false),
        };

        Self {
            user_id,
            password,
            server_assigned_id,
            server_assigned_password,
        }
    }
}

impl fmt::Debug for FinalCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FinalCredentials")
            .field("user_id", &self.user_id)
            .field("server_assigned_id", &self.server_assigned_id)
            .field("server_assigned_password", &self.server_assigned_password)
            .finish_non_exhaustive()
    }
}
