//! Users: the user document model and the ledger that mutates it.
//!
//! - [`user`]: the stored document and the views returned to clients.
//! - [`ledger`]: registration, profile, points, inventory and journeys.
pub mod ledger;
pub mod user;

use self::user::UserId;
use crate::core::error::Error;

/// Users may only read or write their own document.
///
/// # Errors
///
/// Will return [`Error::NotDocumentOwner`] if `caller` is not `owner`.
pub fn authorize_owner(caller: &UserId, owner: &UserId) -> Result<(), Error> {
    if caller == owner {
        Ok(())
    } else {
        Err(Error::NotDocumentOwner {
            caller: caller.clone(),
            owner: owner.clone(),
        })
    }
}
