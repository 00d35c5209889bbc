use anyhow::anyhow;
use anyhow::Result;
use serde::Deserialize;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8081;
pub const DEFAULT_PASSWORD_ENV: &str = "ADMIN_PASSWORD";

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub admin: AdminConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: default_host(), port: default_port(), worker_threads: Some(4) }
    }
}

/// Where the admin portal secret comes from. The secret itself never lives in the file.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminConfig {
    #[serde(default = "default_password_env")]
    pub password_env: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self { password_env: default_password_env() }
    }
}

fn default_host() -> String { DEFAULT_HOST.to_string() }
fn default_port() -> u16 { DEFAULT_PORT }
fn default_password_env() -> String { DEFAULT_PASSWORD_ENV.to_string() }

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    parse(&content)
}

pub fn parse(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_default()?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// Config built from `SERVER_HOST`/`SERVER_PORT`/`TOKIO_WORKER_THREADS`,
    /// used when no config file is present.
    pub fn from_env() -> Result<Self> {
        let mut cfg = AppConfig::default();
        if let Ok(host) = std::env::var("SERVER_HOST") {
            cfg.server.host = host;
        }
        if let Some(port) = std::env::var("SERVER_PORT").ok().and_then(|p| p.parse::<u16>().ok()) {
            cfg.server.port = port;
        }
        cfg.server.worker_threads = std::env::var("TOKIO_WORKER_THREADS")
            .ok()
            .and_then(|v| v.parse::<usize>().ok());
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// File config when the file exists, env otherwise. A file that exists but
    /// fails to parse or validate is an error, never a silent fallback.
    pub fn load_or_env() -> Result<Self> {
        let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        Self::load_or_env_from(&path)
    }

    pub fn load_or_env_from(path: &str) -> Result<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Self::from_env(),
            Err(e) => return Err(anyhow!("cannot read config file {path}: {e}")),
        };
        let mut cfg = parse(&content).map_err(|e| anyhow!("invalid config file {path}: {e}"))?;
        cfg.normalize_and_validate()
            .map_err(|e| anyhow!("invalid config file {path}: {e}"))?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.admin.validate()?;
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = DEFAULT_HOST.to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        if let Some(w) = self.worker_threads {
            if w == 0 { self.worker_threads = Some(4); }
        } else {
            self.worker_threads = Some(4);
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl AdminConfig {
    fn validate(&self) -> Result<()> {
        if self.password_env.trim().is_empty() {
            return Err(anyhow!("admin.password_env must name an environment variable"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let mut cfg = parse("").unwrap();
        cfg.normalize_and_validate().unwrap();
        assert_eq!(cfg.server.bind_addr(), "127.0.0.1:8081");
        assert_eq!(cfg.server.worker_threads, Some(4));
        assert_eq!(cfg.admin.password_env, "ADMIN_PASSWORD");
    }

    #[test]
    fn file_values_override_defaults() {
        let mut cfg = parse(
            r#"
            [server]
            host = ""
            port = 9000
            worker_threads = 0

            [admin]
            password_env = "COASTER_ADMIN_SECRET"
            "#,
        )
        .unwrap();
        cfg.normalize_and_validate().unwrap();
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.server.port, 9000);
        assert_eq!(cfg.server.worker_threads, Some(4));
        assert_eq!(cfg.admin.password_env, "COASTER_ADMIN_SECRET");
    }

    #[test]
    fn zero_port_is_rejected() {
        let mut cfg = parse("[server]\nport = 0\n").unwrap();
        assert!(cfg.normalize_and_validate().is_err());
    }

    fn write_temp_config(name: &str, content: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("configs_{}_{}.toml", name, std::process::id()));
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn invalid_file_is_an_error_not_an_env_fallback() {
        let path = write_temp_config("invalid", "[server]\nport = 0\n\n[admin]\npassword_env = \"MY_SECRET\"\n");
        let err = AppConfig::load_or_env_from(path.to_str().unwrap()).unwrap_err();
        assert!(err.to_string().contains("server.port"), "{err}");

        let path2 = write_temp_config("broken", "[server\nport = ");
        assert!(AppConfig::load_or_env_from(path2.to_str().unwrap()).is_err());

        let _ = std::fs::remove_file(&path);
        let _ = std::fs::remove_file(&path2);
    }

    #[test]
    fn valid_file_wins_over_env_defaults() {
        let path = write_temp_config("valid", "[server]\nport = 9100\n\n[admin]\npassword_env = \"MY_SECRET\"\n");
        let cfg = AppConfig::load_or_env_from(path.to_str().unwrap()).unwrap();
        assert_eq!(cfg.server.port, 9100);
        assert_eq!(cfg.admin.password_env, "MY_SECRET");
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn missing_file_falls_back_to_env() {
        let missing = std::env::temp_dir().join(format!("configs_absent_{}.toml", std::process::id()));
        let cfg = AppConfig::load_or_env_from(missing.to_str().unwrap()).unwrap();
        assert_eq!(cfg.admin.password_env, DEFAULT_PASSWORD_ENV);
    }

    #[test]
    fn blank_password_env_is_rejected() {
        let mut cfg = parse("[admin]\npassword_env = \" \"\n").unwrap();
        assert!(cfg.normalize_and_validate().is_err());
    }
}
