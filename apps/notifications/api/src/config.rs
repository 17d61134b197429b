use core_config::{AppInfo, FromEnv, app_info, server::ServerConfig};
use domain_notifications::SmtpConfig;

pub use core_config::Environment;

/// Port the service listens on when `PORT` is unset.
pub const DEFAULT_PORT: u16 = 8082;

/// Application-specific configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub server: ServerConfig,
    pub smtp: SmtpConfig,
    pub environment: Environment,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let server = ServerConfig::from_env_with_default_port(DEFAULT_PORT)?;
        let smtp = SmtpConfig::from_env()?; // Missing sender leaves the transport unconfigured

        Ok(Self {
            app: app_info!(),
            server,
            smtp,
            environment,
        })
    }
}
