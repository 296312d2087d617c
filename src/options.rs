//! Client configuration.
//!
//! Options can be built in code or read from the environment:
//!
//! - `AZURE_SUBSCRIPTION_ID` (required by [`EnvConfig`]) - subscription to operate on
//! - `AZURE_ACCESS_TOKEN` (required by [`EnvConfig`]) - bearer token for ARM
//! - `AZURE_RESOURCE_MANAGER_ENDPOINT` (optional) - overrides the cloud's endpoint
//! - `AZURE_CLOUD` (optional) - `public` (default), `china` or `usgovernment`

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{ArmError, Result};

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// Azure cloud environments with well-known ARM endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cloud {
    /// Azure public cloud.
    #[default]
    AzurePublic,
    /// Azure operated by 21Vianet.
    AzureChina,
    /// Azure US Government.
    AzureGovernment,
}

impl Cloud {
    /// The Resource Manager endpoint for this cloud.
    pub fn endpoint(&self) -> &'static str {
        match self {
            Cloud::AzurePublic => "https://management.azure.com",
            Cloud::AzureChina => "https://management.chinacloudapi.cn",
            Cloud::AzureGovernment => "https://management.usgovcloudapi.net",
        }
    }

    /// The token audience for this cloud.
    pub fn audience(&self) -> &'static str {
        match self {
            Cloud::AzurePublic => "https://management.core.windows.net/",
            Cloud::AzureChina => "https://management.core.chinacloudapi.cn",
            Cloud::AzureGovernment => "https://management.core.usgovcloudapi.net",
        }
    }
}

impl FromStr for Cloud {
    type Err = ArmError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "public" | "azurepublic" | "azurecloud" => Ok(Cloud::AzurePublic),
            "china" | "azurechina" | "azurechinacloud" => Ok(Cloud::AzureChina),
            "usgovernment" | "azuregovernment" | "azureusgovernment" => {
                Ok(Cloud::AzureGovernment)
            }
            other => Err(ArmError::ConfigMissing(format!("unknown cloud '{other}'"))),
        }
    }
}

/// Options shared by every client created from one pipeline.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Cloud whose endpoint is used when `endpoint` is not set.
    pub cloud: Cloud,
    /// Explicit endpoint, e.g. a fake server URL.
    pub endpoint: Option<String>,
    /// Application ID prepended to the user agent.
    pub application_id: Option<String>,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            cloud: Cloud::default(),
            endpoint: None,
            application_id: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ClientOptions {
    /// Options targeting an explicit endpoint.
    #[must_use]
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: Some(endpoint.into()),
            ..Default::default()
        }
    }

    /// Set the application ID reported in the user agent.
    #[must_use]
    pub fn application_id(mut self, id: impl Into<String>) -> Self {
        self.application_id = Some(id.into());
        self
    }

    /// Set the per-request timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The endpoint requests are sent to.
    pub fn resolved_endpoint(&self) -> &str {
        self.endpoint
            .as_deref()
            .unwrap_or_else(|| self.cloud.endpoint())
    }

    /// Read the optional endpoint settings from the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if `AZURE_CLOUD` names an unknown cloud.
    pub fn from_env() -> Result<Self> {
        let cloud = match env::var("AZURE_CLOUD") {
            Ok(value) => value.parse()?,
            Err(_) => Cloud::default(),
        };
        let endpoint = env::var("AZURE_RESOURCE_MANAGER_ENDPOINT").ok();

        Ok(Self {
            cloud,
            endpoint,
            ..Default::default()
        })
    }
}

/// Everything needed to build a client factory from the environment.
#[derive(Clone)]
pub struct EnvConfig {
    /// Subscription ID.
    pub subscription_id: String,
    /// Bearer token.
    pub access_token: String,
    /// Pipeline options.
    pub options: ClientOptions,
}

impl std::fmt::Debug for EnvConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnvConfig")
            .field("subscription_id", &self.subscription_id)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl EnvConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if `AZURE_SUBSCRIPTION_ID` or `AZURE_ACCESS_TOKEN` is not set.
    pub fn from_env() -> Result<Self> {
        let subscription_id = env::var("AZURE_SUBSCRIPTION_ID").map_err(|_| {
            ArmError::ConfigMissing("AZURE_SUBSCRIPTION_ID environment variable not set".to_string())
        })?;
        let access_token = env::var("AZURE_ACCESS_TOKEN").map_err(|_| {
            ArmError::ConfigMissing("AZURE_ACCESS_TOKEN environment variable not set".to_string())
        })?;

        Ok(Self {
            subscription_id,
            access_token,
            options: ClientOptions::from_env()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_endpoint_is_public_cloud() {
        let options = ClientOptions::default();
        assert_eq!(options.resolved_endpoint(), "https://management.azure.com");
    }

    #[test]
    fn test_explicit_endpoint_wins() {
        let options = ClientOptions {
            cloud: Cloud::AzureChina,
            ..ClientOptions::with_endpoint("http://127.0.0.1:8080")
        };
        assert_eq!(options.resolved_endpoint(), "http://127.0.0.1:8080");
    }

    #[test]
    fn test_cloud_from_str() {
        assert_eq!("china".parse::<Cloud>().unwrap(), Cloud::AzureChina);
        assert_eq!(
            "AzureUSGovernment".parse::<Cloud>().unwrap(),
            Cloud::AzureGovernment
        );
        assert!("mars".parse::<Cloud>().is_err());
    }
}
