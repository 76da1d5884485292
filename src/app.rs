//! Typed settings for the hosted-application launcher.
//!
//! The launcher starts an application process and polls its listener; it only
//! needs the port and how long to keep polling.

use crate::error::{OptionError, OptionResult};
use crate::registry::Registry;
use serde::Serialize;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppConfig {
    /// Local port the application listens on.
    pub listen_port: u16,
    /// How long to wait for the listener to come up.
    #[serde(serialize_with = "serialize_secs")]
    pub startup_timeout: Duration,
}

fn serialize_secs<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_f64(d.as_secs_f64())
}

impl AppConfig {
    /// Read the launcher settings from the registry's current values.
    pub fn from_registry(registry: &Registry) -> OptionResult<Self> {
        let port = registry.get_option("listen_port")?;
        let listen_port = port
            .as_int()
            .and_then(|p| u16::try_from(p).ok())
            .ok_or_else(|| {
                OptionError::invalid(format!("{} is not a usable port", port)).at_path("listen_port")
            })?;

        let timeout = registry.get_option("apps.startup_timeout")?;
        let startup_timeout = timeout
            .as_float()
            .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
            .ok_or_else(|| {
                OptionError::invalid(format!("{} is not a usable timeout", timeout))
                    .at_path("apps.startup_timeout")
            })?;

        Ok(Self {
            listen_port,
            startup_timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{DEFAULT_LISTEN_PORT, default_schema};

    fn registry() -> Registry {
        Registry::with_env_source(default_schema().unwrap(), |_| None)
    }

    #[test]
    fn test_defaults() {
        let app = AppConfig::from_registry(&registry()).unwrap();
        assert_eq!(i64::from(app.listen_port), DEFAULT_LISTEN_PORT);
        assert_eq!(app.startup_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_follows_current_values() {
        let mut reg = registry();
        reg.set_option("listen_port", "9001").unwrap();
        reg.set_option("startup_timeout", 2.5).unwrap();
        let app = AppConfig::from_registry(&reg).unwrap();
        assert_eq!(app.listen_port, 9001);
        assert_eq!(app.startup_timeout, Duration::from_millis(2500));
    }

    #[test]
    fn test_environment_port() {
        let reg = Registry::with_env_source(default_schema().unwrap(), |var| {
            (var == "OPTREG_APPS_LISTEN_PORT").then(|| "8080".to_string())
        });
        assert_eq!(AppConfig::from_registry(&reg).unwrap().listen_port, 8080);
    }

    #[test]
    fn test_serializes_timeout_as_seconds() {
        let app = AppConfig::from_registry(&registry()).unwrap();
        let json = serde_json::to_value(&app).unwrap();
        assert_eq!(json["listen_port"], 8000);
        assert_eq!(json["startup_timeout"], 30.0);
    }
}
