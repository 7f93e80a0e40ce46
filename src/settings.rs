use serde::{Deserialize, Serialize};
use std::fs;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BridgrsSettings {
    pub storage: StorageSettings,
    pub provider: ProviderSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Key prefix isolating this application's records in a shared store
    pub namespace: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSettings {
    /// Watchdog budget platform bridges give a native credential operation
    /// before resolving it as timed out
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    pub level: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            namespace: "bridgrs".to_string(),
        }
    }
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            timeout_ms: 60_000, // Matches the usual relying-party ceremony timeout
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl BridgrsSettings {
    /// Load settings from configuration files and environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Environment initialization fails
    /// - Settings file cannot be read or parsed
    /// - TOML parsing fails
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        // Initialize environment and logging
        Self::initialize_environment()?;

        // Load base settings from TOML or defaults
        let mut settings = Self::load_base_settings()?;

        // Apply environment variable overrides
        Self::apply_env_overrides(&mut settings);

        Ok(settings)
    }

    /// Initialize environment variables and logging
    ///
    /// # Errors
    ///
    /// Returns an error if logger initialization fails
    fn initialize_environment() -> Result<(), Box<dyn std::error::Error>> {
        Self::load_env_file();
        env_logger::try_init()?;
        Ok(())
    }

    /// Load base settings from TOML file(s) or use defaults
    /// Settings are loaded with the following priority (highest to lowest):
    /// 1. Environment variables (applied separately after loading base settings)
    /// 2. Settings.toml in `BRIDGRS_SECRETS_DIR` (if specified and exists)
    /// 3. Settings.toml in current directory (if exists)
    /// 4. Default settings
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Settings file cannot be read
    /// - TOML parsing fails
    fn load_base_settings() -> Result<Self, Box<dyn std::error::Error>> {
        // 1. Start with default settings
        let mut settings = Self::default();

        // 2. Try to load from Settings.toml in current directory (lower priority)
        let default_config_path = std::path::PathBuf::from("Settings.toml");
        if default_config_path.exists() {
            let toml_content = fs::read_to_string(&default_config_path)?;
            settings = basic_toml::from_str(&toml_content)?;
            println!(
                "✓ Loaded base settings from {}",
                default_config_path.display()
            );
        }

        // 3. If BRIDGRS_SECRETS_DIR is set and contains Settings.toml, override with those settings (higher priority)
        if let Ok(secrets_dir) = std::env::var("BRIDGRS_SECRETS_DIR") {
            let secrets_path = std::path::Path::new(&secrets_dir).join("Settings.toml");
            if secrets_path.exists() {
                let secrets_toml_content = fs::read_to_string(&secrets_path)?;
                let secrets_settings: Self = basic_toml::from_str(&secrets_toml_content)?;

                println!("✓ Overriding settings from {}", secrets_path.display());

                // Replace settings with those from secrets directory
                settings = secrets_settings;
            } else {
                println!(
                    "ℹ BRIDGRS_SECRETS_DIR set but no Settings.toml found at: {}",
                    secrets_path.display()
                );
            }
        }

        Ok(settings)
    }

    /// Apply environment variable overrides to settings
    fn apply_env_overrides(settings: &mut Self) {
        Self::apply_storage_env_overrides(&mut settings.storage);
        Self::apply_provider_env_overrides(&mut settings.provider);
        Self::apply_logging_env_overrides(&mut settings.logging);
    }

    /// Apply environment overrides for storage settings
    pub fn apply_storage_env_overrides(storage_settings: &mut StorageSettings) {
        if let Ok(namespace) = std::env::var("STORAGE_NAMESPACE") {
            if !namespace.is_empty() {
                storage_settings.namespace = namespace;
            }
        }
    }

    /// Apply environment overrides for provider settings
    pub fn apply_provider_env_overrides(provider_settings: &mut ProviderSettings) {
        Self::apply_numeric_env_override("PROVIDER_TIMEOUT_MS", &mut provider_settings.timeout_ms);
    }

    /// Helper function to apply numeric environment variable overrides
    fn apply_numeric_env_override(env_var: &str, target: &mut u64) {
        if let Ok(value_str) = std::env::var(env_var) {
            if let Ok(value) = value_str.parse::<u64>() {
                *target = value;
            }
        }
    }

    /// Apply environment overrides for logging settings
    fn apply_logging_env_overrides(logging_settings: &mut LoggingSettings) {
        if let Ok(log_level) = std::env::var("RUST_LOG") {
            logging_settings.level = log_level;
        }
    }

    /// Load environment variables from .env file
    fn load_env_file() {
        if let Ok(contents) = std::fs::read_to_string(".env") {
            for line in contents.lines() {
                if let Some((key, value)) = line.split_once('=') {
                    std::env::set_var(key.trim(), value.trim());
                }
            }
        }
    }
}
