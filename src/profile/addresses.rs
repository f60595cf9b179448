//! Saved Addresses

use std::fmt;

use tracing::debug;

use crate::profile::{ProfileError, require_len};

/// Saved address id, e.g. `addr3`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AddressId(String);

impl AddressId {
    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AddressId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AddressId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Address form input, for adding or editing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewAddress {
    /// Street line, at least 3 characters
    pub street: String,

    /// City, at least 2 characters
    pub city: String,

    /// State, at least 2 characters
    pub state: String,

    /// Zip code, at least 5 characters
    pub zip: String,

    /// Make this the default delivery address
    pub is_default: bool,
}

impl NewAddress {
    fn validate(&self) -> Result<(), ProfileError> {
        require_len("street", &self.street, 3)?;
        require_len("city", &self.city, 2)?;
        require_len("state", &self.state, 2)?;
        require_len("zip", &self.zip, 5)?;

        Ok(())
    }
}

/// A saved delivery address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    id: AddressId,
    street: String,
    city: String,
    state: String,
    zip: String,
    is_default: bool,
}

impl Address {
    /// Address id.
    pub fn id(&self) -> &AddressId {
        &self.id
    }

    /// Street line.
    pub fn street(&self) -> &str {
        &self.street
    }

    /// City.
    pub fn city(&self) -> &str {
        &self.city
    }

    /// State.
    pub fn state(&self) -> &str {
        &self.state
    }

    /// Zip code.
    pub fn zip(&self) -> &str {
        &self.zip
    }

    /// Whether this is the default delivery address.
    pub fn is_default(&self) -> bool {
        self.is_default
    }

    fn apply(&mut self, form: NewAddress) {
        self.street = form.street;
        self.city = form.city;
        self.state = form.state;
        self.zip = form.zip;
        self.is_default = form.is_default;
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}, {} {}", self.street, self.city, self.state, self.zip)
    }
}

/// Saved addresses, with at most one default.
#[derive(Debug, Clone, Default)]
pub struct AddressBook {
    addresses: Vec<Address>,
    next_id: u64,
}

impl AddressBook {
    /// Create an empty address book.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Save a new address and return its id.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::TooShort`] if a field is under its minimum length.
    pub fn add(&mut self, form: NewAddress) -> Result<AddressId, ProfileError> {
        form.validate()?;

        self.next_id = self.next_id.saturating_add(1);

        let id = AddressId(format!("addr{}", self.next_id));

        if form.is_default {
            self.clear_default();
        }

        self.addresses.push(Address {
            id: id.clone(),
            street: form.street,
            city: form.city,
            state: form.state,
            zip: form.zip,
            is_default: form.is_default,
        });

        debug!(address = %id, "saved address");

        Ok(id)
    }

    /// Replace a saved address.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::TooShort`] if a field is under its minimum length, or
    /// [`ProfileError::AddressNotFound`] if no address has this id.
    pub fn update(&mut self, id: &AddressId, form: NewAddress) -> Result<(), ProfileError> {
        form.validate()?;

        if !self.addresses.iter().any(|address| &address.id == id) {
            return Err(ProfileError::AddressNotFound(id.clone()));
        }

        if form.is_default {
            self.clear_default();
        }

        if let Some(address) = self.addresses.iter_mut().find(|address| &address.id == id) {
            address.apply(form);
        }

        Ok(())
    }

    /// Delete a saved address; nothing happens if it is absent.
    ///
    /// Deleting the default address leaves no default.
    pub fn remove(&mut self, id: &AddressId) -> Option<Address> {
        let index = self.addresses.iter().position(|address| &address.id == id)?;

        Some(self.addresses.remove(index))
    }

    /// Make an address the default, clearing the flag on every other address.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::AddressNotFound`] if no address has this id.
    pub fn set_default(&mut self, id: &AddressId) -> Result<(), ProfileError> {
        if !self.addresses.iter().any(|address| &address.id == id) {
            return Err(ProfileError::AddressNotFound(id.clone()));
        }

        for address in &mut self.addresses {
            address.is_default = &address.id == id;
        }

        Ok(())
    }

    /// The default address, if one is set.
    pub fn default_address(&self) -> Option<&Address> {
        self.addresses.iter().find(|address| address.is_default)
    }

    /// Find an address by id.
    pub fn get(&self, id: &AddressId) -> Option<&Address> {
        self.addresses.iter().find(|address| &address.id == id)
    }

    /// Addresses in the order they were saved.
    pub fn iter(&self) -> impl Iterator<Item = &Address> {
        self.addresses.iter()
    }

    /// Number of saved addresses.
    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    /// Whether no addresses are saved.
    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }

    fn clear_default(&mut self) {
        for address in &mut self.addresses {
            address.is_default = false;
        }
    }
}
