use serde::Deserialize;
use std::path::PathBuf;

#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,

    // Plant.id credentials. Identification is disabled when unset.
    pub plant_id_api_key: Option<String>,

    // Front-end files
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
    #[serde(default = "default_index_document")]
    pub index_document: String,
    pub images_dir: Option<PathBuf>,

    #[serde(default = "default_max_upload_size")]
    pub max_upload_size_mb: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5050
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("./static")
}

fn default_index_document() -> String {
    "challenges.html".to_string()
}

fn default_max_upload_size() -> u64 {
    20
}

impl Config {
    pub fn from_env() -> Result<Self, envy::Error> {
        Self::from_vars(std::env::vars())
    }

    pub fn from_vars<I>(vars: I) -> Result<Self, envy::Error>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter(vars)
    }

    pub fn plant_id_api_key(&self) -> Option<&str> {
        self.plant_id_api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    pub fn images_dir_path(&self) -> PathBuf {
        self.images_dir
            .clone()
            .unwrap_or_else(|| self.static_dir.join("images1"))
    }

    pub fn max_request_body_bytes(&self) -> usize {
        // Allow some overhead for multipart boundaries/headers.
        ((self.max_upload_size_mb + 1) * 1024 * 1024) as usize
    }
}
