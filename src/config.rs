/// Runtime configuration, read once at startup from the environment
/// (a `.env` file is honored via dotenvy).
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub database_path: String,
    pub upload_dir: String,
}

impl Config {
    pub fn from_env() -> Self {
        Config {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string()),
            database_path: std::env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "data/rams.db".to_string()),
            upload_dir: std::env::var("UPLOAD_DIR").unwrap_or_else(|_| "data/uploads".to_string()),
        }
    }
}
