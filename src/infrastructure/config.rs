//! 配置基础设施
//!
//! 加载顺序：配置文件（不存在时使用默认值），再由环境变量覆盖。

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// 服务配置结构
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP 服务配置
    pub http: HttpConfig,
    /// 数据库配置
    pub database: DatabaseConfig,
    /// 日志配置
    pub logging: LoggingConfig,
}

/// HTTP 服务配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// 绑定地址
    pub bind_address: String,
    /// HTTP 服务端口
    pub port: u16,
}

/// 数据库连接配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// 完整连接串，设置后优先于下面的分项
    pub url: Option<String>,
    pub host: String,
    pub user: String,
    pub password: String,
    pub dbname: String,
    pub port: u16,
    /// disable, allow, prefer, require, verify-ca, verify-full
    pub sslmode: String,
    /// 连接池最大连接数
    pub max_connections: u32,
}

/// 日志配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 日志级别 (trace, debug, info, warn, error)
    pub level: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            host: "localhost".to_string(),
            user: "postgres".to_string(),
            password: "yourpassword".to_string(),
            dbname: "crud_db".to_string(),
            port: 5432,
            sslmode: "disable".to_string(),
            max_connections: 10,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

const VALID_SSL_MODES: [&str; 6] = [
    "disable",
    "allow",
    "prefer",
    "require",
    "verify-ca",
    "verify-full",
];

const VALID_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

impl HttpConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}

impl DatabaseConfig {
    /// 用于日志输出的连接目标，不含密码
    pub fn display_target(&self) -> String {
        match &self.url {
            Some(url) => mask_password(url),
            None => format!(
                "postgres://{}:***@{}:{}/{} (sslmode={})",
                self.user, self.host, self.port, self.dbname, self.sslmode
            ),
        }
    }

    #[cfg(feature = "database")]
    pub fn connect_options(&self) -> Result<sqlx::postgres::PgConnectOptions, ConfigError> {
        use sqlx::postgres::{PgConnectOptions, PgSslMode};
        use std::str::FromStr;

        if let Some(url) = &self.url {
            return PgConnectOptions::from_str(url)
                .map_err(|e| ConfigError::Parse(format!("DATABASE_URL: {}", e)));
        }

        let ssl_mode = PgSslMode::from_str(&self.sslmode)
            .map_err(|e| ConfigError::Validation(format!("sslmode: {}", e)))?;

        Ok(PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.dbname)
            .ssl_mode(ssl_mode))
    }
}

fn mask_password(url: &str) -> String {
    let Some(scheme_end) = url.find("://") else {
        return url.to_string();
    };
    let rest = &url[scheme_end + 3..];
    let (Some(at), Some(colon)) = (rest.rfind('@'), rest.find(':')) else {
        return url.to_string();
    };
    if colon > at {
        return url.to_string();
    }
    format!("{}{}:***{}", &url[..scheme_end + 3], &rest[..colon], &rest[at..])
}

impl Config {
    /// 从配置文件加载配置
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::FileRead(e.to_string()))?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// 用环境变量覆盖配置项
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("DATABASE_URL") {
            self.database.url = Some(url);
        }
        if let Some(host) = lookup("DB_HOST") {
            self.database.host = host;
        }
        if let Some(user) = lookup("DB_USER") {
            self.database.user = user;
        }
        if let Some(password) = lookup("DB_PASSWORD") {
            self.database.password = password;
        }
        if let Some(dbname) = lookup("DB_NAME") {
            self.database.dbname = dbname;
        }
        if let Some(port) = lookup("DB_PORT") {
            self.database.port = parse_port("DB_PORT", &port)?;
        }
        if let Some(sslmode) = lookup("DB_SSLMODE") {
            self.database.sslmode = sslmode;
        }
        if let Some(bind) = lookup("HTTP_BIND") {
            self.http.bind_address = bind;
        }
        if let Some(port) = lookup("HTTP_PORT") {
            self.http.port = parse_port("HTTP_PORT", &port)?;
        }
        if let Some(level) = lookup("LOG_LEVEL") {
            self.logging.level = level.to_lowercase();
        }
        Ok(())
    }

    /// 验证配置的有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.http.port == 0 {
            return Err(ConfigError::Validation("HTTP端口必须大于0".to_string()));
        }
        if self.http.bind_address.is_empty() {
            return Err(ConfigError::Validation("绑定地址不能为空".to_string()));
        }

        if self.database.url.is_none() {
            if self.database.host.is_empty() {
                return Err(ConfigError::Validation("数据库主机不能为空".to_string()));
            }
            if self.database.dbname.is_empty() {
                return Err(ConfigError::Validation("数据库名不能为空".to_string()));
            }
            if self.database.port == 0 {
                return Err(ConfigError::Validation("数据库端口必须大于0".to_string()));
            }
            if !VALID_SSL_MODES.contains(&self.database.sslmode.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "无效的 sslmode: {}，有效值: {:?}",
                    self.database.sslmode, VALID_SSL_MODES
                )));
            }
        }
        if self.database.max_connections == 0 {
            return Err(ConfigError::Validation("连接池大小必须大于0".to_string()));
        }

        if !VALID_LOG_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::Validation(format!(
                "无效的日志级别: {}，有效值: {:?}",
                self.logging.level, VALID_LOG_LEVELS
            )));
        }

        Ok(())
    }
}

fn parse_port(key: &str, value: &str) -> Result<u16, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Parse(format!("{} 不是有效端口: {}", key, value)))
}

/// 配置错误类型
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("文件读取错误: {0}")]
    FileRead(String),
    #[error("配置解析错误: {0}")]
    Parse(String),
    #[error("配置验证错误: {0}")]
    Validation(String),
}

/// 从文件、默认值和环境变量加载并验证配置
pub fn load_config() -> Result<Config, ConfigError> {
    let config_paths = ["config.toml", "./config/config.toml"];

    let mut config = match config_paths.iter().find(|p| Path::new(p).exists()) {
        Some(path) => {
            println!("从配置文件加载: {}", path);
            Config::load_from_file(path)?
        }
        None => Config::default(),
    };

    config.apply_env(|key| std::env::var(key).ok())?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_match_fixed_deployment() {
        let config = Config::default();
        assert_eq!(config.http.port, 8080);
        assert_eq!(config.database.host, "localhost");
        assert_eq!(config.database.dbname, "crud_db");
        assert_eq!(config.database.port, 5432);
        assert_eq!(config.database.sslmode, "disable");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
            [database]
            host = "db.internal"

            [http]
            port = 9000
            "#,
        )
        .unwrap();
        assert_eq!(config.database.host, "db.internal");
        assert_eq!(config.database.user, "postgres");
        assert_eq!(config.http.port, 9000);
        assert_eq!(config.http.bind_address, "0.0.0.0");
    }

    #[test]
    fn env_overrides_file_values() {
        let mut config = Config::default();
        config
            .apply_env(env(&[
                ("DB_HOST", "pg"),
                ("DB_PORT", "6543"),
                ("HTTP_PORT", "3000"),
                ("LOG_LEVEL", "DEBUG"),
            ]))
            .unwrap();
        assert_eq!(config.database.host, "pg");
        assert_eq!(config.database.port, 6543);
        assert_eq!(config.http.port, 3000);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn bad_env_port_is_rejected() {
        let mut config = Config::default();
        let err = config.apply_env(env(&[("DB_PORT", "five")])).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn validate_rejects_unknown_values() {
        let mut config = Config::default();
        config.database.sslmode = "sometimes".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.logging.level = "loud".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.http.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn display_target_hides_password() {
        let mut db = DatabaseConfig::default();
        assert!(!db.display_target().contains("yourpassword"));

        db.url = Some("postgres://app:s3cret@db:5432/shop".to_string());
        assert_eq!(db.display_target(), "postgres://app:***@db:5432/shop");
    }

    #[cfg(feature = "database")]
    #[test]
    fn connect_options_from_fields() {
        let options = DatabaseConfig::default().connect_options().unwrap();
        assert_eq!(options.get_host(), "localhost");
        assert_eq!(options.get_port(), 5432);
        assert_eq!(options.get_database(), Some("crud_db"));
    }
}
