pub mod claims;
pub mod jwt;
pub mod middleware;
pub mod password;
pub mod utils;

pub use claims::Claims;
pub use jwt::JwtService;
pub use middleware::{AuthenticatedUser, RequireRoles};
pub use password::{hash_password, verify_password};
pub use utils::{require_role, require_self_or_staff};
