use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use bookshop_core::{AuthorId, DomainError, DomainResult, Entity};

/// Author record. Read-only in the order flow; books reference it by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    id: AuthorId,
    name: String,
    created_at: DateTime<Utc>,
}

impl Author {
    pub fn new(
        id: AuthorId,
        name: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }
        Ok(Self {
            id,
            name,
            created_at,
        })
    }

    pub fn id_typed(&self) -> AuthorId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Entity for Author {
    type Id = AuthorId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
