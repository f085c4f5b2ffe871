//! Tenant capability for owner-scoped data access.
//!
//! Every room, cabinet, product, item and inventory log row belongs to exactly
//! one user. Repository methods for those tables take a [`Tenant`] instead of
//! a bare user id, so an owner filter cannot be forgotten at a call site: the
//! only way to reach owner-scoped rows is through a value that came out of
//! request authentication.

use serde::Serialize;

use crate::types::DbId;

/// The authenticated owner on whose behalf a query or mutation runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Tenant {
    user_id: DbId,
}

impl Tenant {
    /// Build a tenant from a user id that has already been authenticated
    /// (a verified JWT subject, or a freshly created user in tests).
    pub fn authenticated(user_id: DbId) -> Self {
        Self { user_id }
    }

    /// The owning user's id, used as the `owner_id` bind in every scoped query.
    pub fn user_id(&self) -> DbId {
        self.user_id
    }
}
