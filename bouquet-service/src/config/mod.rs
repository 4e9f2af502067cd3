use secrecy::Secret;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

/// Port the service listens on unless `APP__PORT` says otherwise.
pub const DEFAULT_PORT: u16 = 8790;

/// Request bodies above this size are rejected before reaching a handler.
pub const DEFAULT_BODY_LIMIT_BYTES: usize = 2 * 1024 * 1024;

const DEFAULT_OPENAI_API_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_IMAGE_MODEL: &str = "gpt-image-1";
const DEFAULT_IMAGE_SIZE: &str = "1024x1024";
const DEFAULT_CLOUDINARY_API_BASE_URL: &str = "https://api.cloudinary.com/v1_1";
const DEFAULT_CLOUDINARY_FOLDER: &str = "bouquet-ai";
/// Landing page assets shipped with the crate, independent of the working directory.
const DEFAULT_STATIC_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/public");

#[derive(Debug, Clone)]
pub struct BouquetConfig {
    pub common: core_config::Config,
    pub server: ServerConfig,
    pub openai: OpenAiConfig,
    /// Present only when every Cloudinary credential is set.
    pub cloudinary: Option<CloudinaryConfig>,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Directory holding `index.html` and its assets.
    pub static_dir: String,
    pub body_limit_bytes: usize,
}

#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// Checked per request; an unset key turns every generation into a 400.
    pub api_key: Option<Secret<String>>,
    pub api_base_url: String,
    pub model: String,
    pub image_size: String,
}

#[derive(Debug, Clone)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: Secret<String>,
    pub folder: String,
    pub api_base_url: String,
}

impl BouquetConfig {
    pub fn load() -> Result<Self, AppError> {
        let common = core_config::Config::load(DEFAULT_PORT)?;
        Ok(Self::from_lookup(common, |key| env::var(key).ok()))
    }

    /// Build the service settings from any key lookup. Blank values count as unset.
    pub fn from_lookup<F>(common: core_config::Config, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let get_or = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_string());

        let cloudinary = match (
            get("CLOUDINARY_CLOUD_NAME"),
            get("CLOUDINARY_API_KEY"),
            get("CLOUDINARY_API_SECRET"),
        ) {
            (Some(cloud_name), Some(api_key), Some(api_secret)) => Some(CloudinaryConfig {
                cloud_name,
                api_key,
                api_secret: Secret::new(api_secret),
                folder: get_or("CLOUDINARY_FOLDER", DEFAULT_CLOUDINARY_FOLDER),
                api_base_url: get_or("CLOUDINARY_API_BASE_URL", DEFAULT_CLOUDINARY_API_BASE_URL),
            }),
            (None, None, None) => None,
            _ => {
                tracing::warn!(
                    "Cloudinary credentials are incomplete; image upload stays disabled"
                );
                None
            }
        };

        BouquetConfig {
            common,
            server: ServerConfig {
                static_dir: get_or("STATIC_DIR", DEFAULT_STATIC_DIR),
                body_limit_bytes: get("BODY_LIMIT_BYTES")
                    .and_then(|value| value.parse().ok())
                    .unwrap_or(DEFAULT_BODY_LIMIT_BYTES),
            },
            openai: OpenAiConfig {
                api_key: get("OPENAI_API_KEY").map(Secret::new),
                api_base_url: get_or("OPENAI_API_BASE_URL", DEFAULT_OPENAI_API_BASE_URL),
                model: get_or("OPENAI_IMAGE_MODEL", DEFAULT_IMAGE_MODEL),
                image_size: get_or("OPENAI_IMAGE_SIZE", DEFAULT_IMAGE_SIZE),
            },
            cloudinary,
        }
    }
}
