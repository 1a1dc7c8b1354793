pub mod articles;
pub mod auth;
pub mod users;

use crate::{auth::Identity, error::AppError, error::AuthRejection};

/// Numeric user id carried by a token. Ids are issued from the `users`
/// table, so anything else means the token was not minted here.
pub(crate) fn user_id(identity: &Identity) -> Result<i64, AppError> {
    identity
        .id
        .parse()
        .map_err(|_| AppError::Auth(AuthRejection::InvalidOrExpiredToken))
}
