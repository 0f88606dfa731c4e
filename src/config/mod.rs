use anyhow::{anyhow, Result};
use std::{env, fs, io::ErrorKind, path::Path};

use wealthmap_core::{
    authorization::{Policy, SelfServicePolicy},
    entities::MapPoint,
    map::{MapViewConfig, MAX_ZOOM, MIN_ZOOM},
};
use wealthmap_gateways::{BackendConfig, DEFAULT_LOGO_BUCKET, DEFAULT_TIMEOUT};

mod raw;

const DEFAULT_CONFIG_FILE_NAME: &str = "wealthmap.toml";

const ENV_NAME_BACKEND_URL: &str = "WEALTHMAP_BACKEND_URL";
const ENV_NAME_BACKEND_ANON_KEY: &str = "WEALTHMAP_BACKEND_ANON_KEY";

pub struct Config {
    pub backend: BackendConfig,
    pub map: Map,
    pub policy: Policy,
}

pub struct Map {
    pub view: MapViewConfig,
    /// Pixel size of the rendered viewport.
    pub width_px: u32,
    pub height_px: u32,
}

impl Config {
    pub fn try_load_from_file_or_default<P: AsRef<Path>>(file_path: Option<P>) -> Result<Self> {
        let file_path: &Path = file_path.as_ref().map(|p| p.as_ref()).unwrap_or_else(|| {
            log::debug!("No configuration file specified. load {DEFAULT_CONFIG_FILE_NAME}");
            Path::new(DEFAULT_CONFIG_FILE_NAME)
        });

        let raw_config = match fs::read_to_string(file_path) {
            Ok(cfg_string) => toml::from_str(&cfg_string)?,
            Err(err) => match err.kind() {
                ErrorKind::NotFound => {
                    log::debug!(
                        "{} not found => load default configuration.",
                        file_path.display()
                    );
                    Ok(raw::Config::default())
                }
                _ => Err(err),
            }?,
        };
        let mut cfg = Self::try_from(raw_config)?;
        cfg.apply_env_overrides(|name| env::var(name).ok());
        Ok(cfg)
    }

    fn apply_env_overrides<F>(&mut self, var: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = var(ENV_NAME_BACKEND_URL) {
            self.backend.url = Some(url);
        }
        if let Some(key) = var(ENV_NAME_BACKEND_ANON_KEY) {
            self.backend.anon_key = Some(key);
        }
    }
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.filter(|s| !s.trim().is_empty())
}

impl TryFrom<raw::Config> for Config {
    type Error = anyhow::Error;
    fn try_from(from: raw::Config) -> Result<Self> {
        let raw::Config {
            backend,
            map,
            authorization,
        } = from;

        let raw::Backend {
            url,
            anon_key,
            timeout,
            logo_bucket,
        } = backend.unwrap_or_default();

        let backend = BackendConfig {
            url: non_empty(url),
            anon_key: non_empty(anon_key),
            timeout: timeout.unwrap_or(DEFAULT_TIMEOUT),
            logo_bucket: non_empty(logo_bucket).unwrap_or_else(|| DEFAULT_LOGO_BUCKET.to_string()),
        };

        let raw::Map {
            center: [lat, lng],
            zoom,
            debounce,
            viewport: [width_px, height_px],
        } = map.unwrap_or_default();

        let center = MapPoint::try_from_lat_lng_deg(lat, lng)
            .ok_or_else(|| anyhow!("Invalid map center {lat},{lng}"))?;
        if !(MIN_ZOOM..=MAX_ZOOM).contains(&zoom) {
            return Err(anyhow!("Map zoom {zoom} is out of range"));
        }
        if width_px == 0 || height_px == 0 {
            return Err(anyhow!("Empty map viewport {width_px}x{height_px}"));
        }
        let map = Map {
            view: MapViewConfig {
                center,
                zoom,
                debounce,
            },
            width_px,
            height_px,
        };

        let raw::Authorization { admin_override } = authorization.unwrap_or_default();
        let self_service = if admin_override {
            log::info!("Company admins may act on self-service resources of their employees");
            SelfServicePolicy::OwnerOrCompanyAdmin
        } else {
            SelfServicePolicy::OwnerOnly
        };

        Ok(Self {
            backend,
            map,
            policy: Policy::new(self_service),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn parse(s: &str) -> Result<Config> {
        let raw: raw::Config = toml::from_str(s)?;
        Config::try_from(raw)
    }

    #[test]
    fn load_default_config() {
        let file: Option<&Path> = None;
        let cfg = Config::try_load_from_file_or_default(file).unwrap();
        assert_eq!(Duration::from_millis(300), cfg.map.view.debounce);
        assert_eq!(SelfServicePolicy::OwnerOnly, cfg.policy.self_service);
    }

    #[test]
    fn blank_credentials_are_missing() {
        let cfg = Config::try_from(raw::Config::default()).unwrap();
        assert!(cfg.backend.url.is_none());
        assert!(cfg.backend.anon_key.is_none());
        assert_eq!(DEFAULT_TIMEOUT, cfg.backend.timeout);
        assert_eq!(DEFAULT_LOGO_BUCKET, cfg.backend.logo_bucket);
    }

    #[test]
    fn environment_overrides_credentials() {
        let mut cfg = parse("[backend]\nurl = \"https://from-file.example\"\n").unwrap();
        cfg.apply_env_overrides(|name| match name {
            ENV_NAME_BACKEND_ANON_KEY => Some("anon".to_string()),
            _ => None,
        });
        assert_eq!(Some("https://from-file.example"), cfg.backend.url.as_deref());
        assert_eq!(Some("anon"), cfg.backend.anon_key.as_deref());
    }

    #[test]
    fn admin_override_is_explicit() {
        let cfg = parse("[authorization]\nadmin-override = true\n").unwrap();
        assert_eq!(SelfServicePolicy::OwnerOrCompanyAdmin, cfg.policy.self_service);
    }

    #[test]
    fn reject_invalid_map_settings() {
        let map = |center: &str, zoom: &str, viewport: &str| {
            format!(
                "[map]\ncenter = {center}\nzoom = {zoom}\ndebounce = \"300ms\"\nviewport = {viewport}\n"
            )
        };
        assert!(parse(&map("[37.7, -122.4]", "13.0", "[800, 600]")).is_ok());
        assert!(parse(&map("[95.0, -122.4]", "13.0", "[800, 600]")).is_err());
        assert!(parse(&map("[37.7, -122.4]", "30.0", "[800, 600]")).is_err());
        assert!(parse(&map("[37.7, -122.4]", "13.0", "[0, 600]")).is_err());
    }
}
