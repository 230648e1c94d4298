//! Input validation utilities

/// Validate a task short name (used in URLs and file paths)
pub fn validate_task_name(name: &str) -> Result<(), &'static str> {
    if name.is_empty() {
        return Err("Task name cannot be empty");
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err("Task name can only contain letters, numbers, underscores, and hyphens");
    }
    Ok(())
}

/// Validate a language tag such as `en`, `it` or `pt-BR`
pub fn validate_language_tag(tag: &str) -> Result<(), &'static str> {
    let mut parts = tag.split('-');
    let primary = parts.next().unwrap_or_default();
    if !(2..=3).contains(&primary.len()) || !primary.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err("Language tag must start with a 2 or 3 letter code");
    }
    if parts.any(|p| p.is_empty() || p.len() > 8 || !p.chars().all(|c| c.is_ascii_alphanumeric()))
    {
        return Err("Invalid language tag subtag");
    }
    Ok(())
}

/// Validate-derive adapter for task names
pub(crate) fn task_name(name: &str) -> Result<(), validator::ValidationError> {
    validate_task_name(name).map_err(|msg| {
        let mut err = validator::ValidationError::new("task_name");
        err.message = Some(msg.into());
        err
    })
}

/// Validate-derive adapter for a single language tag
pub(crate) fn language_tag(tag: &str) -> Result<(), validator::ValidationError> {
    validate_language_tag(tag).map_err(|msg| {
        let mut err = validator::ValidationError::new("language_tag");
        err.message = Some(msg.into());
        err
    })
}

/// Validate-derive adapter for lists of language tags
pub(crate) fn language_tags(tags: &[String]) -> Result<(), validator::ValidationError> {
    tags.iter().try_for_each(|tag| language_tag(tag))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_task_name() {
        assert!(validate_task_name("batch").is_ok());
        assert!(validate_task_name("sum-of_two2").is_ok());
        assert!(validate_task_name("").is_err());
        assert!(validate_task_name("two words").is_err());
        assert!(validate_task_name("../etc").is_err());
    }

    #[test]
    fn test_validate_language_tag() {
        assert!(validate_language_tag("en").is_ok());
        assert!(validate_language_tag("ita").is_ok());
        assert!(validate_language_tag("pt-BR").is_ok());
        assert!(validate_language_tag("e").is_err());
        assert!(validate_language_tag("english").is_err());
        assert!(validate_language_tag("en-").is_err());
    }
}
