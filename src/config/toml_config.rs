use crate::core::ConfigProvider;
use crate::domain::model::DocType;
use crate::utils::error::{CatalogError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_positive_number, validate_url, Validate};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub wizard: WizardConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WizardConfig {
    #[serde(default = "default_banner_seconds")]
    pub banner_dismiss_seconds: u64,
    #[serde(default = "default_required_docs")]
    pub required_doc_types: Vec<DocType>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub json: bool,
}

fn default_base_url() -> String {
    "http://localhost:8080/api".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_banner_seconds() -> u64 {
    5
}

fn default_required_docs() -> Vec<DocType> {
    DocType::TECHNICAL.to_vec()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout(),
        }
    }
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            banner_dismiss_seconds: default_banner_seconds(),
            required_doc_types: default_required_docs(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

impl CatalogConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(CatalogError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| CatalogError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${CATALOG_API_URL})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| CatalogError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_url("api.base_url", &self.api.base_url)?;
        validate_positive_number("api.timeout_seconds", self.api.timeout_seconds, 1)?;
        validate_positive_number("wizard.banner_dismiss_seconds", self.wizard.banner_dismiss_seconds, 1)?;
        validate_non_empty_string("logging.level", &self.logging.level)?;

        let docs = &self.wizard.required_doc_types;
        if docs.is_empty() {
            return Err(CatalogError::MissingConfigError {
                field: "wizard.required_doc_types".to_string(),
            });
        }

        let mut seen = HashSet::new();
        for doc_type in docs {
            if !seen.insert(*doc_type) {
                return Err(CatalogError::InvalidConfigValueError {
                    field: "wizard.required_doc_types".to_string(),
                    value: doc_type.to_string(),
                    reason: "Listed more than once".to_string(),
                });
            }
            if doc_type.category() != docs[0].category() {
                return Err(CatalogError::InvalidConfigValueError {
                    field: "wizard.required_doc_types".to_string(),
                    value: doc_type.to_string(),
                    reason: "Product and technical documentation types cannot be mixed".to_string(),
                });
            }
        }

        Ok(())
    }
}

impl ConfigProvider for CatalogConfig {
    fn api_base_url(&self) -> &str {
        &self.api.base_url
    }

    fn request_timeout_seconds(&self) -> u64 {
        self.api.timeout_seconds
    }

    fn banner_dismiss_seconds(&self) -> u64 {
        self.wizard.banner_dismiss_seconds
    }
}

impl Validate for CatalogConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
