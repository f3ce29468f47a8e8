use crate::{
    auth::Claims,
    errors::{AppError, AppResult},
    models::domain::user::UserRole,
};

/// Role gate shared by the middleware and handlers.
pub fn require_role(claims: &Claims, allowed: &[UserRole]) -> AppResult<()> {
    if !allowed.is_empty() && !allowed.contains(&claims.role) {
        return Err(AppError::Forbidden("Permission denied".to_string()));
    }
    Ok(())
}

/// Students may only act on their own records; staff may act on anyone's.
pub fn require_self_or_staff(claims: &Claims, student_id: &str) -> AppResult<()> {
    if !claims.role.is_staff() && claims.sub != student_id {
        return Err(AppError::Forbidden(
            "You can only access your own submissions".to_string(),
        ));
    }
    Ok(())
}
