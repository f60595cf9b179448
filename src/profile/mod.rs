//! Customer Profile
//!
//! Contact details, saved delivery addresses and past orders.

use thiserror::Error;

use crate::profile::addresses::AddressId;

pub mod addresses;
pub mod history;

/// Errors validating profile data.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProfileError {
    /// A field is shorter than its minimum length.
    #[error("{field} must be at least {min} characters")]
    TooShort {
        /// Field name
        field: &'static str,

        /// Minimum number of characters
        min: usize,
    },

    /// Email is not of the form `local@domain.tld`.
    #[error("invalid email address: {0}")]
    InvalidEmail(String),

    /// Avatar URL is not an http(s) URL.
    #[error("invalid avatar URL: {0}")]
    InvalidAvatarUrl(String),

    /// No saved address has this id.
    #[error("address {0} not found")]
    AddressNotFound(AddressId),
}

/// Customer contact details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    name: String,
    email: String,
    phone: Option<String>,
    avatar_url: Option<String>,
}

impl UserProfile {
    /// Create a validated profile.
    ///
    /// # Errors
    ///
    /// Returns a [`ProfileError`] if the name is under 2 characters, the email is malformed,
    /// the phone number is under 10 characters, or the avatar URL is not http(s).
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        phone: Option<String>,
        avatar_url: Option<String>,
    ) -> Result<Self, ProfileError> {
        let name = name.into().trim().to_string();
        let email = email.into().trim().to_string();

        require_len("name", &name, 2)?;

        if !looks_like_email(&email) {
            return Err(ProfileError::InvalidEmail(email));
        }

        if let Some(phone) = &phone {
            require_len("phone", phone, 10)?;
        }

        if let Some(url) = avatar_url
            .as_ref()
            .filter(|url| !(url.starts_with("http://") || url.starts_with("https://")))
        {
            return Err(ProfileError::InvalidAvatarUrl(url.clone()));
        }

        Ok(Self {
            name,
            email,
            phone,
            avatar_url,
        })
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Email address.
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Phone number, if given.
    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }

    /// Avatar URL, if given.
    pub fn avatar_url(&self) -> Option<&str> {
        self.avatar_url.as_deref()
    }
}

pub(crate) fn require_len(field: &'static str, value: &str, min: usize) -> Result<(), ProfileError> {
    if value.trim().chars().count() < min {
        return Err(ProfileError::TooShort { field, min });
    }

    Ok(())
}

fn looks_like_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    let Some((host, tld)) = domain.rsplit_once('.') else {
        return false;
    };

    !local.is_empty() && !host.is_empty() && !tld.is_empty() && !domain.contains('@')
}
