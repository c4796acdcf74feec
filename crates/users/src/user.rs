use serde::{Deserialize, Serialize};

use tinyledger_core::{Entity, UserId};

/// A person owning one or more ledgers.
///
/// Field validation (blank names, email shape) is done at the HTTP boundary;
/// the entity itself only carries identity and contact details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    id: UserId,
    first_name: String,
    last_name: String,
    email_address: Option<String>,
}

impl User {
    /// Register a new user under a freshly generated id.
    pub fn register(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email_address: Option<String>,
    ) -> Self {
        Self::with_id(UserId::new(), first_name, last_name, email_address)
    }

    pub fn with_id(
        id: UserId,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email_address: Option<String>,
    ) -> Self {
        Self {
            id,
            first_name: first_name.into(),
            last_name: last_name.into(),
            email_address,
        }
    }

    pub fn id_typed(&self) -> UserId {
        self.id
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn email_address(&self) -> Option<&str> {
        self.email_address.as_deref()
    }
}

impl Entity for User {
    type Id = UserId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
