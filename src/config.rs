use std::net::SocketAddr;
use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "CropPulse";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default listen address for the local dashboard API.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8501";

/// Knowledge base file name inside the app data directory.
pub const KNOWLEDGE_FILE: &str = "knowledge.json";

/// Pretrained leaf-disease classifier shipped with the app.
pub const CLASSIFIER_MODEL_NAME: &str = "mobilenet_v2_1.0_224-plant-disease-identification";

/// Get the application data directory
/// ~/CropPulse/ on all platforms (user-visible)
pub fn app_data_dir() -> PathBuf {
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    home.join(APP_NAME)
}

/// Get the models directory (for ONNX classifiers)
pub fn models_dir() -> PathBuf {
    app_data_dir().join("models")
}

/// Get the classifier model directory.
/// `CROPPULSE_MODEL_DIR` overrides the default location.
pub fn classifier_model_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("CROPPULSE_MODEL_DIR") {
        return PathBuf::from(dir);
    }
    models_dir().join(CLASSIFIER_MODEL_NAME)
}

/// Get the knowledge base path.
/// `CROPPULSE_KNOWLEDGE` overrides the default location.
pub fn knowledge_path() -> PathBuf {
    if let Ok(path) = std::env::var("CROPPULSE_KNOWLEDGE") {
        return PathBuf::from(path);
    }
    app_data_dir().join(KNOWLEDGE_FILE)
}

/// Debug builds count as dev.
pub fn is_dev() -> bool {
    cfg!(debug_assertions)
}

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    if is_dev() {
        "croppulse_lib=debug,croppulse=debug,tower_http=info"
    } else {
        "croppulse_lib=info,croppulse=info,warn"
    }
}

/// Runtime settings for the API server, resolved from the environment.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub model_dir: PathBuf,
    pub knowledge_path: PathBuf,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let bind_addr = std::env::var("CROPPULSE_BIND")
            .ok()
            .and_then(|raw| match raw.parse::<SocketAddr>() {
                Ok(addr) => Some(addr),
                Err(e) => {
                    tracing::warn!(raw, error = %e, "Invalid CROPPULSE_BIND, using default");
                    None
                }
            })
            .unwrap_or_else(default_bind_addr);

        Self {
            bind_addr,
            model_dir: classifier_model_dir(),
            knowledge_path: knowledge_path(),
        }
    }
}

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 8501))
}
