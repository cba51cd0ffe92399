//! Environment configuration for different deployment stages

use std::env;

use tracing::Level;

/// Local development project URL (the platform's default local stack)
const DEVELOPMENT_PROJECT_URL: &str = "http://localhost:54321";

/// Application environment configuration
///
/// Read once at process start; the project URL and API key are not validated
/// beyond presence. A malformed URL simply yields non-resolving requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    /// Production environment
    Production,
    /// Staging environment
    Staging,
    /// Development environment (uses a local storage stack)
    Development,
}

impl Environment {
    /// Creates an Environment from the `APP_ENV` environment variable
    ///
    /// # Panics
    ///
    /// Panics if `APP_ENV` contains an invalid value
    #[must_use]
    pub fn from_env() -> Self {
        let env = env::var("APP_ENV")
            .unwrap_or_else(|_| "development".to_string())
            .trim()
            .to_lowercase();

        match env.as_str() {
            "production" => Self::Production,
            "staging" => Self::Staging,
            "development" => Self::Development,
            _ => panic!("Invalid environment: {env}"),
        }
    }

    /// Returns the storage project's root URL
    ///
    /// # Panics
    ///
    /// Panics if the `SUPABASE_PROJECT_URL` environment variable is not set
    /// in production or staging
    #[must_use]
    pub fn project_url(&self) -> String {
        match self {
            Self::Production | Self::Staging => env::var("SUPABASE_PROJECT_URL")
                .expect("SUPABASE_PROJECT_URL environment variable is not set"),
            Self::Development => env::var("SUPABASE_PROJECT_URL")
                .unwrap_or_else(|_| DEVELOPMENT_PROJECT_URL.to_string()),
        }
    }

    /// Returns the project's public (anon) API key
    ///
    /// # Panics
    ///
    /// Panics if the `SUPABASE_ANON_KEY` environment variable is not set
    /// in production or staging
    #[must_use]
    pub fn api_key(&self) -> String {
        match self {
            Self::Production | Self::Staging => env::var("SUPABASE_ANON_KEY")
                .expect("SUPABASE_ANON_KEY environment variable is not set"),
            Self::Development => {
                env::var("SUPABASE_ANON_KEY").unwrap_or_else(|_| "local-anon-key".to_string())
            }
        }
    }

    /// Tracing level for this environment, overridable via `TRACING_LEVEL`
    #[must_use]
    pub fn tracing_level(&self) -> Level {
        env::var("TRACING_LEVEL")
            .ok()
            .and_then(|val| val.parse::<Level>().ok())
            .unwrap_or(match self {
                Self::Production | Self::Staging => Level::INFO,
                Self::Development => Level::DEBUG,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_environment_from_env() {
        // Test development (default)
        env::remove_var("APP_ENV");
        assert_eq!(Environment::from_env(), Environment::Development);

        // Test explicit development
        env::set_var("APP_ENV", "development");
        assert_eq!(Environment::from_env(), Environment::Development);

        // Test staging
        env::set_var("APP_ENV", "staging");
        assert_eq!(Environment::from_env(), Environment::Staging);

        // Test production
        env::set_var("APP_ENV", "production");
        assert_eq!(Environment::from_env(), Environment::Production);

        env::remove_var("APP_ENV");
    }

    #[test]
    #[serial]
    #[should_panic(expected = "Invalid environment: invalid")]
    fn test_invalid_environment() {
        env::set_var("APP_ENV", "invalid");
        let _environment = Environment::from_env();
    }

    #[test]
    #[serial]
    fn test_development_defaults() {
        env::remove_var("SUPABASE_PROJECT_URL");
        env::remove_var("SUPABASE_ANON_KEY");

        let env_config = Environment::Development;
        assert_eq!(env_config.project_url(), DEVELOPMENT_PROJECT_URL);
        assert_eq!(env_config.api_key(), "local-anon-key");
    }

    #[test]
    #[serial]
    fn test_project_url_override() {
        env::set_var("SUPABASE_PROJECT_URL", "https://abc.supabase.co");

        let env_config = Environment::Development;
        assert_eq!(env_config.project_url(), "https://abc.supabase.co");

        env::remove_var("SUPABASE_PROJECT_URL");
    }

    #[test]
    #[serial]
    fn test_tracing_level_defaults() {
        env::remove_var("TRACING_LEVEL");
        assert_eq!(Environment::Production.tracing_level(), Level::INFO);
        assert_eq!(Environment::Development.tracing_level(), Level::DEBUG);

        env::set_var("TRACING_LEVEL", "warn");
        assert_eq!(Environment::Production.tracing_level(), Level::WARN);
        env::remove_var("TRACING_LEVEL");
    }
}
