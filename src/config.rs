use std::net::{IpAddr, Ipv4Addr, SocketAddr};

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub log_level: String,
    pub seed_on_startup: bool,
}

impl Config {
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(3000);

        let host = std::env::var("HOST")
            .ok()
            .and_then(|value| value.parse::<IpAddr>().ok())
            .unwrap_or(IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)));

        let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let seed_on_startup = env_bool("SEED_ON_STARTUP").unwrap_or(false);

        Self {
            host,
            port,
            log_level,
            seed_on_startup,
        }
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

pub fn env_bool(key: &str) -> Option<bool> {
    let value = std::env::var(key).ok()?;
    let normalized = value.trim().to_ascii_lowercase();
    if normalized.is_empty() {
        return None;
    }
    match normalized.as_str() {
        "1" | "true" | "yes" | "y" | "on" => Some(true),
        "0" | "false" | "no" | "n" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::env_bool;

    #[test]
    fn env_bool_parses_common_forms() {
        std::env::set_var("ENV_BOOL_TEST_ON", "Yes");
        std::env::set_var("ENV_BOOL_TEST_OFF", "0");
        std::env::set_var("ENV_BOOL_TEST_JUNK", "maybe");

        assert_eq!(env_bool("ENV_BOOL_TEST_ON"), Some(true));
        assert_eq!(env_bool("ENV_BOOL_TEST_OFF"), Some(false));
        assert_eq!(env_bool("ENV_BOOL_TEST_JUNK"), None);
        assert_eq!(env_bool("ENV_BOOL_TEST_UNSET"), None);
    }
}
