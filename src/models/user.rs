// src/models/user.rs

use serde::{Deserialize, Serialize};

/// Profile document under `users/{uid}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub name: Option<String>,
    /// Relative upload path, e.g. `/uploads/3fa1….png`.
    #[serde(default)]
    pub avatar: Option<String>,
}

/// A session member as shown in the roster. Derived on every poll, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Participant {
    pub uid: String,
    pub name: String,
    pub avatar: Option<String>,
}

impl Participant {
    /// Combines a uid with its (possibly missing) profile.
    /// `public_url` is prefixed to relative avatar paths.
    pub fn from_profile(uid: &str, profile: Option<UserProfile>, public_url: &str) -> Self {
        let profile = profile.unwrap_or_default();
        Self {
            uid: uid.to_string(),
            name: profile
                .name
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| "Anonymous".to_string()),
            avatar: profile
                .avatar
                .filter(|a| !a.is_empty())
                .map(|a| format!("{}{}", public_url.trim_end_matches('/'), a)),
        }
    }
}
