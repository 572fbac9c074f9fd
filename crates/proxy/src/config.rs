use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

/// Proxy configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProxyConfig {
    /// Proxy bind address
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Proxy listening port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Executable spawned for every request
    #[serde(default = "default_backend_command")]
    pub backend_command: String,

    /// Arguments passed to the backend executable
    #[serde(default)]
    pub backend_args: Vec<String>,

    /// Port handed to the backend through its environment
    #[serde(default = "default_backend_port")]
    pub backend_port: u16,

    /// Environment variable carrying `backend_port`
    #[serde(default = "default_port_env_var")]
    pub port_env_var: String,

    /// Enable CORS
    #[serde(default = "default_true")]
    pub enable_cors: bool,

    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            port: default_port(),
            backend_command: default_backend_command(),
            backend_args: Vec::new(),
            backend_port: default_backend_port(),
            port_env_var: default_port_env_var(),
            enable_cors: default_true(),
            log_level: default_log_level(),
        }
    }
}

impl ProxyConfig {
    /// Load configuration from `.env`, an optional `proxy.toml`, and
    /// `SIMCHECK_PROXY__*` environment variables, in increasing precedence.
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let builder = config::Config::builder()
            .add_source(config::File::with_name("proxy").required(false))
            .add_source(
                config::Environment::with_prefix("SIMCHECK_PROXY")
                    .separator("__")
                    .list_separator(" ")
                    .with_list_parse_key("backend_args")
                    .try_parsing(true),
            );

        let config: ProxyConfig = builder.build()?.try_deserialize()?;
        if config.backend_command.trim().is_empty() {
            anyhow::bail!("backend_command must not be empty");
        }
        if config.port_env_var.trim().is_empty() {
            anyhow::bail!("port_env_var must not be empty");
        }

        Ok(config)
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        let addr_str = format!("{}:{}", self.bind_addr, self.port);
        Ok(addr_str.parse()?)
    }
}

fn default_bind_addr() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_backend_command() -> String {
    "./backend".to_string()
}

fn default_backend_port() -> u16 {
    8081
}

fn default_port_env_var() -> String {
    "PORT".to_string()
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}
