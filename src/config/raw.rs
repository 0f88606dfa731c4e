use duration_str::{deserialize_duration, deserialize_option_duration};
use serde::Deserialize;
use std::time::Duration;

const DEFAULT_CONFIG_FILE: &str = include_str!("wealthmap.default.toml");

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    pub backend: Option<Backend>,
    pub map: Option<Map>,
    pub authorization: Option<Authorization>,
}

impl Default for Config {
    fn default() -> Self {
        let cfg: Self = toml::from_str(DEFAULT_CONFIG_FILE).expect("Default configuration");
        cfg
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Backend {
    pub url: Option<String>,
    pub anon_key: Option<String>,
    #[serde(default, deserialize_with = "deserialize_option_duration")]
    pub timeout: Option<Duration>,
    pub logo_bucket: Option<String>,
}

impl Default for Backend {
    fn default() -> Self {
        Config::default().backend.expect("Backend configuration")
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Map {
    /// Latitude and longitude in degrees.
    pub center: [f64; 2],
    pub zoom: f64,
    #[serde(deserialize_with = "deserialize_duration")]
    pub debounce: Duration,
    pub viewport: [u32; 2],
}

impl Default for Map {
    fn default() -> Self {
        Config::default().map.expect("Map configuration")
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Authorization {
    pub admin_override: bool,
}

impl Default for Authorization {
    fn default() -> Self {
        Config::default()
            .authorization
            .expect("Authorization configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn parse_default_config_from_file() {
        let cfg: Config = toml::from_str(DEFAULT_CONFIG_FILE).unwrap();
        assert!(cfg.backend.is_some());
        assert!(cfg.map.is_some());
        assert!(cfg.authorization.is_some());
    }

    #[test]
    fn default_map_config() {
        let cfg = Map::default();
        assert_eq!([37.7749, -122.4194], cfg.center);
        assert_eq!(13.0, cfg.zoom);
        assert_eq!(Duration::from_millis(300), cfg.debounce);
        assert_eq!([1024, 768], cfg.viewport);
    }

    #[test]
    fn default_backend_config_has_no_credentials() {
        let cfg = Backend::default();
        assert_eq!(Some(""), cfg.url.as_deref());
        assert_eq!(Some(""), cfg.anon_key.as_deref());
        assert_eq!(Some(Duration::from_secs(10)), cfg.timeout);
        assert_eq!(Some("company-logos"), cfg.logo_bucket.as_deref());
    }

    #[test]
    fn parse_full_config_example_from_file() {
        let cfg_string = fs::read_to_string("src/config/wealthmap.full-example.toml").unwrap();
        let cfg: Config = toml::from_str(&cfg_string).unwrap();
        assert!(cfg.authorization.unwrap().admin_override);
    }

    #[test]
    fn sections_are_optional() {
        let cfg: Config = toml::from_str("[authorization]\nadmin-override = true\n").unwrap();
        assert!(cfg.backend.is_none());
        assert!(cfg.map.is_none());
    }
}
