use crate::error::{Error, Result};
use dotenvy::dotenv;
use std::env;
use std::sync::OnceLock;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    pub questions_path: String,
    pub uploads_dir: String,
    pub static_dir: String,
    pub session_ttl_secs: u64,
    pub public_rps: u32,
    pub max_upload_bytes: usize,
    pub smtp: Option<SmtpConfig>,
    pub mail_from: String,
}

/// Relay settings; only present when host, user and password are all set.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub secure: bool,
    pub user: String,
    pub pass: String,
}

pub static CONFIG: OnceLock<Config> = OnceLock::new();

pub const DEFAULT_MAIL_FROM: &str = "HR Team <hr@example.com>";

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let smtp = match (
            env::var("SMTP_HOST").ok(),
            env::var("SMTP_USER").ok(),
            env::var("SMTP_PASS").ok(),
        ) {
            (Some(host), Some(user), Some(pass)) => Some(SmtpConfig {
                host,
                port: get_env_parse_or("SMTP_PORT", 465)?,
                secure: get_env_or("SMTP_SECURE", "true") == "true",
                user,
                pass,
            }),
            _ => None,
        };

        Ok(Self {
            server_address: get_env_or("SERVER_ADDRESS", "0.0.0.0:3000"),
            questions_path: get_env_or("QUESTIONS_PATH", "data/questions.json"),
            uploads_dir: get_env_or("UPLOADS_DIR", "uploads"),
            static_dir: get_env_or("STATIC_DIR", "public"),
            session_ttl_secs: get_env_parse_or("SESSION_TTL_SECS", 3600)?,
            public_rps: get_env_parse_or("PUBLIC_RPS", 100)?,
            max_upload_bytes: get_env_parse_or("MAX_UPLOAD_BYTES", 5 * 1024 * 1024)?,
            smtp,
            mail_from: get_env_or("MAIL_FROM", DEFAULT_MAIL_FROM),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_address: "127.0.0.1:3000".to_string(),
            questions_path: "data/questions.json".to_string(),
            uploads_dir: "uploads".to_string(),
            static_dir: "public".to_string(),
            session_ttl_secs: 3600,
            public_rps: 100,
            max_upload_bytes: 5 * 1024 * 1024,
            smtp: None,
            mail_from: DEFAULT_MAIL_FROM.to_string(),
        }
    }
}

fn get_env_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn get_env_parse_or<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e))),
        Err(_) => Ok(default),
    }
}

pub fn init_config() -> Result<()> {
    let config = Config::from_env()?;
    CONFIG
        .set(config)
        .map_err(|_| Error::Config("Configuration has already been initialized".to_string()))?;
    Ok(())
}

pub fn get_config() -> &'static Config {
    CONFIG
        .get()
        .expect("Configuration has not been initialized")
}
