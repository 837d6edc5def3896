use chrono::{DateTime, Utc};

use crate::domain::value_objects::*;

/// A registered badge holder.
///
/// `available` is the soft-delete flag: rows are never removed, they are
/// marked unavailable and drop out of listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    name: DisplayName,
    email: Email,
    rfid: RfidTag,
    available: bool,
    entered_department: Option<bool>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Column values for an insert. The store assigns id and timestamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: DisplayName,
    pub email: Email,
    pub rfid: RfidTag,
    pub available: bool,
    pub entered_department: Option<bool>,
}

impl NewUser {
    pub fn new(name: DisplayName, email: Email, rfid: RfidTag) -> Self {
        Self {
            name,
            email,
            rfid,
            available: true,
            entered_department: None,
        }
    }
}

/// Partial overwrite of a stored row. `None` leaves the column as is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserChanges {
    pub name: Option<DisplayName>,
    pub email: Option<Email>,
    pub rfid: Option<RfidTag>,
    pub available: Option<bool>,
}

impl UserChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.rfid.is_none() && self.available.is_none()
    }
}

/// Row selection for bulk reads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UserFilter {
    pub available: Option<bool>,
}

impl UserFilter {
    pub fn available_only() -> Self {
        Self { available: Some(true) }
    }
}

impl User {
    #[allow(clippy::too_many_arguments)]
    pub fn from_persistence(
        id: UserId,
        name: DisplayName,
        email: Email,
        rfid: RfidTag,
        available: bool,
        entered_department: Option<bool>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            email,
            rfid,
            available,
            entered_department,
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn name(&self) -> &DisplayName {
        &self.name
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn rfid(&self) -> &RfidTag {
        &self.rfid
    }

    pub fn is_available(&self) -> bool {
        self.available
    }

    pub fn entered_department(&self) -> Option<bool> {
        self.entered_department
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}
