use serde::{Deserialize, Serialize};

pub const DEFAULT_NAME: &str = "Your name";
pub const DEFAULT_EMAIL: &str = "you@example.com";

/// Profile details kept on the device.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub name: String,
    pub email: String,
    pub phone: String,
}

/// What the identity provider knows about the signed-in user.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Identity {
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl Profile {
    /// Merges the stored profile with the identity.
    ///
    /// Name and phone prefer what the user saved locally; the email prefers
    /// the identity provider.
    pub fn resolve(stored: Option<&Profile>, identity: &Identity) -> Profile {
        let stored_field = |pick: fn(&Profile) -> &str| {
            stored
                .map(pick)
                .filter(|value| !value.is_empty())
                .map(str::to_string)
        };
        let identity_field = |value: &Option<String>| value.clone().filter(|v| !v.is_empty());

        Profile {
            name: stored_field(|p| &p.name)
                .or_else(|| identity_field(&identity.display_name))
                .unwrap_or_else(|| DEFAULT_NAME.to_string()),
            email: identity_field(&identity.email)
                .or_else(|| stored_field(|p| &p.email))
                .unwrap_or_else(|| DEFAULT_EMAIL.to_string()),
            phone: stored_field(|p| &p.phone)
                .or_else(|| identity_field(&identity.phone))
                .unwrap_or_default(),
        }
    }
}
