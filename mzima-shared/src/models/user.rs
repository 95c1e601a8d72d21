//! User profile, partial updates and the persisted field table.

use serde::{Deserialize, Serialize};
use strum::EnumIter;

/// Profile of the currently authenticated user.
///
/// Every field always carries a value of its declared shape: an empty
/// string or an empty list stands for "unknown".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserProfile {
    /// Server-side identifier of the user. Empty when logged out.
    #[serde(rename = "userId")]
    pub user_id: String,
    /// Display name.
    pub realname: String,
    /// Email address.
    pub email: String,
    /// Role name, e.g. `admin` or `user`.
    pub role: String,
    /// Permissions granted through the role.
    pub permissions: Vec<String>,
    /// Gravatar hash or URL.
    pub gravatar: String,
    /// Preferred interface language.
    pub language: String,
    /// Privileges the user may exercise on the current deployment.
    pub allowed_privileges: Vec<String>,
}

impl UserProfile {
    /// Returns `true` when the profile belongs to a logged-in user.
    #[must_use]
    pub fn is_logged(&self) -> bool {
        !self.user_id.is_empty()
    }

    /// Merges every field present in `update` into this profile.
    pub fn apply(&mut self, update: &UserProfileUpdate) {
        if let Some(value) = &update.user_id {
            self.user_id.clone_from(value);
        }
        if let Some(value) = &update.realname {
            self.realname.clone_from(value);
        }
        if let Some(value) = &update.email {
            self.email.clone_from(value);
        }
        if let Some(value) = &update.role {
            self.role.clone_from(value);
        }
        if let Some(value) = &update.permissions {
            self.permissions.clone_from(value);
        }
        if let Some(value) = &update.gravatar {
            self.gravatar.clone_from(value);
        }
        if let Some(value) = &update.language {
            self.language.clone_from(value);
        }
        if let Some(value) = &update.allowed_privileges {
            self.allowed_privileges.clone_from(value);
        }
    }
}

/// A partial profile; `None` fields are left untouched by a merge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserProfileUpdate {
    /// New user id.
    #[serde(rename = "userId", skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// New display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub realname: Option<String>,
    /// New email address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// New role name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// New permission list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Vec<String>>,
    /// New gravatar.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gravatar: Option<String>,
    /// New language.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// New privilege list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_privileges: Option<Vec<String>>,
}

/// One persisted field of a [`UserProfile`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum UserField {
    /// [`UserProfile::user_id`].
    UserId,
    /// [`UserProfile::realname`].
    Realname,
    /// [`UserProfile::email`].
    Email,
    /// [`UserProfile::role`].
    Role,
    /// [`UserProfile::permissions`].
    Permissions,
    /// [`UserProfile::gravatar`].
    Gravatar,
    /// [`UserProfile::language`].
    Language,
    /// [`UserProfile::allowed_privileges`].
    AllowedPrivileges,
}

/// Value of a single profile field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// A scalar string.
    Text(String),
    /// An ordered list of strings.
    List(Vec<String>),
}

impl UserField {
    /// Logical storage key for this field.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::UserId => "userId",
            Self::Realname => "realname",
            Self::Email => "email",
            Self::Role => "role",
            Self::Permissions => "permissions",
            Self::Gravatar => "gravatar",
            Self::Language => "language",
            Self::AllowedPrivileges => "allowed_privileges",
        }
    }

    /// Returns `true` for fields holding an ordered list of strings.
    #[must_use]
    pub const fn is_list(self) -> bool {
        matches!(self, Self::Permissions | Self::AllowedPrivileges)
    }

    /// Reads this field from a partial update, if present.
    #[must_use]
    pub fn get_update(self, update: &UserProfileUpdate) -> Option<FieldValue> {
        match self {
            Self::UserId => update.user_id.clone().map(FieldValue::Text),
            Self::Realname => update.realname.clone().map(FieldValue::Text),
            Self::Email => update.email.clone().map(FieldValue::Text),
            Self::Role => update.role.clone().map(FieldValue::Text),
            Self::Permissions => update.permissions.clone().map(FieldValue::List),
            Self::Gravatar => update.gravatar.clone().map(FieldValue::Text),
            Self::Language => update.language.clone().map(FieldValue::Text),
            Self::AllowedPrivileges => update.allowed_privileges.clone().map(FieldValue::List),
        }
    }

    /// Writes `value` into this field of `profile`.
    ///
    /// A value of the wrong shape is coerced: a list stored into a text
    /// field is comma-joined, text stored into a list field is split.
    pub fn set(self, profile: &mut UserProfile, value: FieldValue) {
        match self {
            Self::UserId => profile.user_id = value.into_text(),
            Self::Realname => profile.realname = value.into_text(),
            Self::Email => profile.email = value.into_text(),
            Self::Role => profile.role = value.into_text(),
            Self::Permissions => profile.permissions = value.into_list(),
            Self::Gravatar => profile.gravatar = value.into_text(),
            Self::Language => profile.language = value.into_text(),
            Self::AllowedPrivileges => profile.allowed_privileges = value.into_list(),
        }
    }
}

impl FieldValue {
    /// Converts into a text value.
    #[must_use]
    pub fn into_text(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::List(items) => items.join(","),
        }
    }

    /// Converts into a list value.
    #[must_use]
    pub fn into_list(self) -> Vec<String> {
        match self {
            Self::List(items) => items,
            Self::Text(text) if text.is_empty() => Vec::new(),
            Self::Text(text) => text.split(',').map(str::to_string).collect(),
        }
    }
}
