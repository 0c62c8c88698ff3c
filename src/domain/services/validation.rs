use crate::domain::models::note::NoteChanges;
use crate::domain::models::user::Role;
use crate::error::AppError;

pub const MIN_PASSWORD_LEN: usize = 6;
pub const MAX_TITLE_LEN: usize = 200;
pub const MAX_CONTENT_LEN: usize = 10_000;

/// Slugs must already be in canonical form (`^[a-z0-9-]+$`); nothing is rewritten here.
pub fn validate_slug(slug: &str) -> Result<(), AppError> {
    let valid = !slug.is_empty()
        && slug.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    if valid {
        Ok(())
    } else {
        Err(AppError::Validation(
            "Organization slug can only contain lowercase letters, numbers, and hyphens".into(),
        ))
    }
}

/// Accepts `local@domain.tld` with no whitespace and exactly one `@`.
pub fn validate_email(email: &str) -> Result<(), AppError> {
    let email = email.trim();
    let valid = !email.chars().any(char::is_whitespace)
        && match email.split_once('@') {
            Some((local, domain)) => {
                !local.is_empty()
                    && !domain.contains('@')
                    && domain
                        .rsplit_once('.')
                        .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
            }
            None => false,
        };
    if valid {
        Ok(())
    } else {
        Err(AppError::Validation("Invalid email format".into()))
    }
}

pub fn validate_password(password: &str) -> Result<(), AppError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation(format!(
            "Password must be at least {} characters long",
            MIN_PASSWORD_LEN
        )));
    }
    Ok(())
}

pub fn parse_role(role: &str) -> Result<Role, AppError> {
    Role::parse(role).ok_or_else(|| AppError::Validation("Invalid role. Must be admin or member".into()))
}

/// Trims the title and checks both fields are present and within bounds.
pub fn validate_note(title: Option<&str>, content: Option<&str>) -> Result<NoteChanges, AppError> {
    let title = title.map(str::trim).unwrap_or_default();
    let content = content.unwrap_or_default();

    if title.is_empty() || content.trim().is_empty() {
        return Err(AppError::Validation("Title and content are required".into()));
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(AppError::Validation(format!("Title must be at most {} characters", MAX_TITLE_LEN)));
    }
    if content.chars().count() > MAX_CONTENT_LEN {
        return Err(AppError::Validation(format!("Content must be at most {} characters", MAX_CONTENT_LEN)));
    }

    Ok(NoteChanges {
        title: title.to_string(),
        content: content.to_string(),
    })
}
