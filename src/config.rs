use std::net::SocketAddr;

/// Upper bound on token lifetime: one year.
pub const MAX_TTL_MINUTES: i64 = 60 * 24 * 365;

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            issuer: "gira".into(),
            audience: "gira-users".into(),
            ttl_minutes: 60,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub max_connections: u32,
    pub migrations_dir: String,
    pub jwt: JwtConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let defaults = JwtConfig::default();
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or(defaults.issuer),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or(defaults.audience),
            ttl_minutes: parse_or("JWT_TTL_MINUTES", defaults.ttl_minutes),
        };
        anyhow::ensure!(!jwt.secret.is_empty(), "JWT_SECRET must not be empty");
        jwt.check_ttl()?;

        Ok(Self {
            host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: parse_or("APP_PORT", 8080),
            database_url,
            max_connections: parse_or("DB_MAX_CONNECTIONS", 10),
            migrations_dir: std::env::var("MIGRATIONS_DIR")
                .unwrap_or_else(|_| "./migrations".into()),
            jwt,
        })
    }

    pub fn bind_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }
}

impl JwtConfig {
    pub fn check_ttl(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.ttl_minutes > 0 && self.ttl_minutes <= MAX_TTL_MINUTES,
            "JWT_TTL_MINUTES must be between 1 and {MAX_TTL_MINUTES}, got {}",
            self.ttl_minutes
        );
        Ok(())
    }
}

fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jwt_defaults() {
        let jwt = JwtConfig::default();
        assert_eq!(jwt.issuer, "gira");
        assert_eq!(jwt.audience, "gira-users");
        assert_eq!(jwt.ttl_minutes, 60);
        assert!(jwt.secret.is_empty());
    }

    #[test]
    fn ttl_must_be_positive_and_bounded() {
        let ttl = |ttl_minutes| JwtConfig { ttl_minutes, ..JwtConfig::default() };
        assert!(ttl(60).check_ttl().is_ok());
        assert!(ttl(MAX_TTL_MINUTES).check_ttl().is_ok());
        assert!(ttl(0).check_ttl().is_err());
        assert!(ttl(-5).check_ttl().is_err());
        assert!(ttl(MAX_TTL_MINUTES + 1).check_ttl().is_err());
        assert!(ttl(1_000_000_000_000).check_ttl().is_err());
    }

    #[test]
    fn bind_addr_joins_host_and_port() {
        let config = AppConfig {
            host: "127.0.0.1".into(),
            port: 3000,
            database_url: String::new(),
            max_connections: 1,
            migrations_dir: "./migrations".into(),
            jwt: JwtConfig::default(),
        };
        assert_eq!(config.bind_addr().unwrap().to_string(), "127.0.0.1:3000");
    }

    #[test]
    fn parse_or_falls_back_on_missing_var() {
        let v: i64 = parse_or("GIRA_TEST_SURELY_UNSET_VARIABLE", 42);
        assert_eq!(v, 42);
    }
}
