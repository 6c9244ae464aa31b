use crate::server::response::ApiError;

const MAX_USER_NAME_LEN: usize = 64;

fn is_valid_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.'
}

fn validate_name(name: &str, max_len: usize) -> Result<(), String> {
    if name.is_empty() {
        return Err("User name cannot be empty".to_string());
    }
    if name.len() > max_len {
        return Err(format!("User name cannot exceed {max_len} characters"));
    }
    if !name.chars().all(is_valid_name_char) {
        return Err(
            "User name can only contain alphanumeric characters, hyphens, underscores, and periods"
                .to_string(),
        );
    }
    if name.starts_with(['-', '_', '.']) {
        return Err("User name must start with a letter or digit".to_string());
    }
    Ok(())
}

/// Plain-string variant for callers outside the HTTP layer (the CLI).
pub fn check_user_name(name: &str) -> Result<(), String> {
    validate_name(name, MAX_USER_NAME_LEN)
}

pub fn validate_user_name(name: &str) -> Result<(), ApiError> {
    check_user_name(name).map_err(ApiError::bad_request)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_names() {
        assert!(check_user_name("alice").is_ok());
        assert!(check_user_name("alice.smith-2").is_ok());
        assert!(check_user_name("").is_err());
        assert!(check_user_name("-alice").is_err());
        assert!(check_user_name("alice smith").is_err());
        assert!(check_user_name(&"a".repeat(65)).is_err());
    }
}
