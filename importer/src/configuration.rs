use std::path::PathBuf;

use anyhow::Result;

const DEFAULT_APP_ENV: &str = "prod";
const DEFAULT_LOCAL_API_BASE_URL: &str = "http://localhost:3000";

/// Everything the importer reads from the environment, gathered once at startup.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Lowercased, like "prod" or "local".
    pub app_env: String,
    /// Folders to scan for .kmz files, in the order given.
    pub folders: Vec<PathBuf>,
    /// Prefixes every image URL written to the catalog.
    pub api_base_url: String,
}

impl Config {
    pub fn from_env() -> Result<Config> {
        Config::from_lookup(|key| std::env::var(key).ok())
    }

    /// `APP_ENV` picks which `BASE_DIR_{ENV}` and `API_BASE_URL_*` apply. `BASE_DIR_{ENV}` is
    /// required and may hold several folders, separated like `PATH` is on this platform.
    pub fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Result<Config> {
        let app_env =
            value_or_default(lookup("APP_ENV"), DEFAULT_APP_ENV.to_string()).to_lowercase();

        let base_dir_key = format!("BASE_DIR_{}", app_env.to_uppercase());
        let raw_folders = match lookup(&base_dir_key) {
            Some(x) if !x.is_empty() => x,
            _ => bail!("The {} variable isn't set", base_dir_key),
        };
        let folders: Vec<PathBuf> = std::env::split_paths(&raw_folders)
            .filter_map(|path| {
                let path = path.to_string_lossy().trim().to_string();
                if path.is_empty() {
                    None
                } else {
                    Some(PathBuf::from(path))
                }
            })
            .collect();
        if folders.is_empty() {
            bail!("The {} variable doesn't contain any paths", base_dir_key);
        }

        let api_base_url = if app_env == "prod" {
            value_or_default(lookup("API_BASE_URL_PROD"), String::new())
        } else {
            value_or_default(
                lookup("API_BASE_URL_LOCAL"),
                DEFAULT_LOCAL_API_BASE_URL.to_string(),
            )
        };

        Ok(Config {
            app_env,
            folders,
            api_base_url,
        })
    }
}

fn value_or_default<T>(maybe_value: Option<T>, default: T) -> T {
    if let Some(value) = maybe_value {
        return value;
    }
    default
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    fn join(paths: &[&str]) -> String {
        std::env::join_paths(paths)
            .unwrap()
            .into_string()
            .unwrap()
    }

    #[test]
    fn defaults_to_prod() {
        let config = Config::from_lookup(lookup(&[
            ("BASE_DIR_PROD", "/srv/kmz"),
            ("API_BASE_URL_PROD", "https://maps.example.com"),
            ("BASE_DIR_LOCAL", "/tmp/ignored"),
        ]))
        .unwrap();
        assert_eq!(
            config,
            Config {
                app_env: "prod".to_string(),
                folders: vec![PathBuf::from("/srv/kmz")],
                api_base_url: "https://maps.example.com".to_string(),
            }
        );
    }

    #[test]
    fn prod_api_url_defaults_to_empty() {
        let config = Config::from_lookup(lookup(&[("BASE_DIR_PROD", "/srv/kmz")])).unwrap();
        assert_eq!(config.api_base_url, "");
    }

    #[test]
    fn local_env() {
        let config = Config::from_lookup(lookup(&[
            ("APP_ENV", "Local"),
            ("BASE_DIR_LOCAL", join(&["/a", " /b ", ""]).as_str()),
        ]))
        .unwrap();
        assert_eq!(config.app_env, "local");
        assert_eq!(
            config.folders,
            vec![PathBuf::from("/a"), PathBuf::from("/b")]
        );
        assert_eq!(config.api_base_url, "http://localhost:3000");
    }

    #[test]
    fn missing_base_dir() {
        let err = Config::from_lookup(lookup(&[("APP_ENV", "local")])).unwrap_err();
        assert!(err.to_string().contains("BASE_DIR_LOCAL"));

        let err = Config::from_lookup(lookup(&[("BASE_DIR_PROD", "")])).unwrap_err();
        assert!(err.to_string().contains("BASE_DIR_PROD"));
    }

    #[test]
    fn blank_base_dir() {
        let blank = join(&["  ", " "]);
        let err = Config::from_lookup(lookup(&[("BASE_DIR_PROD", blank.as_str())])).unwrap_err();
        assert!(err.to_string().contains("doesn't contain any paths"));
    }
}
