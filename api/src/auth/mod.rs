pub mod middleware;
pub mod password;
pub mod role;
pub mod token;

pub use middleware::{CurrentUser, RoleGuard};
pub use role::Role;
pub use token::{Identity, TokenService};
