use std::env;

/// Where the host listens, read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostConfig {
    pub host: String,
    pub port: u16,
    pub open_browser: bool,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 8080,
            open_browser: true,
        }
    }
}

impl HostConfig {
    /// `MARCHES_HOST`, `MARCHES_PORT` and `MARCHES_OPEN_BROWSER`; unset or
    /// unparsable values keep their default.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            host: lookup("MARCHES_HOST")
                .filter(|h| !h.trim().is_empty())
                .unwrap_or(defaults.host),
            port: lookup("MARCHES_PORT")
                .and_then(|p| p.trim().parse().ok())
                .unwrap_or(defaults.port),
            open_browser: lookup("MARCHES_OPEN_BROWSER")
                .map(|v| !matches!(v.trim().to_ascii_lowercase().as_str(), "0" | "false" | "no" | "off"))
                .unwrap_or(defaults.open_browser),
        }
    }

    pub fn url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        assert_eq!(HostConfig::from_lookup(lookup(&[])), HostConfig::default());
    }

    #[test]
    fn reads_overrides_and_ignores_bad_port() {
        let config = HostConfig::from_lookup(lookup(&[
            ("MARCHES_HOST", "0.0.0.0"),
            ("MARCHES_PORT", "not-a-port"),
            ("MARCHES_OPEN_BROWSER", "off"),
        ]));
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert!(!config.open_browser);
        assert_eq!(config.url(), "http://0.0.0.0:8080");
    }
}
