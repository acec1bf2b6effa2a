use anyhow::anyhow;
use std::net::SocketAddr;

pub struct ApplicationEnv {
    pub log_directory: String,
    pub log_filename: String,

    pub bind_address: SocketAddr,

    pub db_connection_string: String,
    pub db_name: String,

    /// Host prepended to generated deep links.
    pub link_host: String,

    /// Applied when a receiver's accept_email preference is unset.
    pub default_send_email: bool,

    pub max_http_content_len: usize,

    /// Unread counter drift tolerated before reconcile reports an
    /// inconsistency.
    pub cache_drift_threshold: u64,
}

impl ApplicationEnv {
    pub fn parse() -> anyhow::Result<Self> {
        let log_directory = Self::env_var("NOTICE_DISPATCH_LOG_DIRECTORY")?;
        let log_filename = Self::env_var("NOTICE_DISPATCH_LOG_FILENAME")?;
        let bind_address = Self::env_var("NOTICE_DISPATCH_BIND_ADDRESS")?.parse()?;
        let db_connection_string = Self::env_var("NOTICE_DISPATCH_DB_CONNECTION_STRING")?;
        let db_name = Self::env_var("NOTICE_DISPATCH_DB_NAME")?;
        let link_host = Self::env_var("NOTICE_DISPATCH_LINK_HOST")?;
        let default_send_email = Self::env_var("NOTICE_DISPATCH_DEFAULT_SEND_EMAIL")?.parse()?;
        let max_http_content_len =
            Self::env_var("NOTICE_DISPATCH_MAX_HTTP_CONTENT_LEN")?.parse()?;
        let cache_drift_threshold =
            Self::env_var("NOTICE_DISPATCH_CACHE_DRIFT_THRESHOLD")?.parse()?;

        Ok(Self {
            log_directory,
            log_filename,
            bind_address,
            db_connection_string,
            db_name,
            link_host,
            default_send_email,
            max_http_content_len,
            cache_drift_threshold,
        })
    }

    fn env_var(name: &'static str) -> anyhow::Result<String> {
        std::env::var(name).map_err(|_| anyhow!("environment variable {name} not set"))
    }
}
