use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

/// Represents the different deployments the client can talk to.
#[derive(Clone, Default, Copy, PartialEq, Eq)]
pub enum Environment {
    /// Local development server.
    Local,
    /// Staging deployment for pre-production testing.
    Staging,
    /// The public site.
    #[default]
    Production,
}

impl Environment {
    /// Returns the site URL associated with the environment.
    pub fn base_url(&self) -> String {
        match self {
            Environment::Local => "http://localhost:8000".to_string(),
            Environment::Staging => "https://staging.beer-analytics.com".to_string(),
            Environment::Production => "https://www.beer-analytics.com".to_string(),
        }
    }

    /// Returns the tracking endpoint, if telemetry is enabled for the environment.
    pub fn telemetry_url(&self) -> Option<String> {
        match self {
            Environment::Production => Some("https://stats.beer-analytics.com/matomo.php".to_string()),
            // Never pollute the production statistics from development setups
            Environment::Local | Environment::Staging => None,
        }
    }

    /// Site id under which telemetry is recorded.
    pub fn telemetry_site_id(&self) -> u32 {
        match self {
            Environment::Production => 1,
            Environment::Local | Environment::Staging => 0,
        }
    }
}

impl FromStr for Environment {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Environment::Local),
            "staging" => Ok(Environment::Staging),
            "production" | "prod" => Ok(Environment::Production),
            _ => Err(()),
        }
    }
}

impl Display for Environment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Local => write!(f, "Local"),
            Environment::Staging => write!(f, "Staging"),
            Environment::Production => write!(f, "Production"),
        }
    }
}

impl Debug for Environment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Environment::{}, URL: {}", self, self.base_url())
    }
}
