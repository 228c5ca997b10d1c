use crate::error::AppError;
use std::path::Path;

/// Validates the configuration settings
///
/// # Arguments
/// * `api_domain` - The API domain to validate
/// * `log_file_path` - Optional log file path to validate
/// * `http_timeout_seconds` - Request timeout
///
/// # Returns
/// * `Ok(())` - Configuration is valid
/// * `Err(AppError)` - Configuration validation failed
///
/// # Validation Rules
/// - API domain cannot be empty
/// - API domain must be a valid URL or domain name
/// - If log file path is provided, it cannot be empty
/// - Log file path parent directory must exist or be creatable
/// - Timeout must be positive
pub fn validate_config(
    api_domain: &str,
    log_file_path: &Option<String>,
    http_timeout_seconds: u64,
) -> Result<(), AppError> {
    if api_domain.is_empty() {
        return Err(AppError::config_error("API domain cannot be empty"));
    }

    if !api_domain.starts_with("http://") && !api_domain.starts_with("https://") {
        // Without a scheme it should at least look like a host name
        if !api_domain.contains('.') && !api_domain.starts_with("localhost") {
            return Err(AppError::config_error(
                "API domain must be a valid URL or domain name",
            ));
        }
    }

    if http_timeout_seconds == 0 {
        return Err(AppError::config_error(
            "HTTP timeout must be at least one second",
        ));
    }

    if let Some(log_path) = log_file_path {
        if log_path.is_empty() {
            return Err(AppError::config_error("Log file path cannot be empty"));
        }

        if let Some(parent) = Path::new(log_path).parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| {
                AppError::config_error(format!(
                    "Cannot create log directory '{}': {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_valid_configs() {
        assert!(validate_config("https://api.chess.com/pub", &None, 30).is_ok());
        assert!(validate_config("api.example.com", &None, 30).is_ok());
        assert!(validate_config("localhost:8080", &None, 1).is_ok());
        assert!(validate_config("http://127.0.0.1:9000", &None, 5).is_ok());
    }

    #[test]
    fn test_invalid_configs() {
        assert!(validate_config("", &None, 30).is_err());
        assert!(validate_config("notadomain", &None, 30).is_err());
        assert!(validate_config("https://api.example.com", &Some(String::new()), 30).is_err());
        assert!(validate_config("https://api.example.com", &None, 0).is_err());
    }

    #[test]
    fn test_log_parent_is_created() {
        let temp_dir = tempdir().unwrap();
        let log_path = temp_dir.path().join("nested").join("logs").join("app.log");
        let log_path = Some(log_path.to_string_lossy().to_string());

        validate_config("https://api.example.com", &log_path, 30).unwrap();
        assert!(temp_dir.path().join("nested").join("logs").exists());
    }
}
