use anyhow::bail;
use serde::Deserialize;

/// Default token lifetime: 7 days.
const DEFAULT_TTL_MINUTES: i64 = 60 * 24 * 7;
/// Upper bound on token lifetime: 10 years.
const MAX_TTL_MINUTES: i64 = 60 * 24 * 365 * 10;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Empty means any origin is allowed.
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// `None` runs the API on in-memory repositories.
    pub database_url: Option<String>,
    pub jwt: JwtConfig,
    pub server: ServerConfig,
    pub seed: Option<SeedConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedConfig {
    pub admin_email: String,
    pub admin_password: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")
            .ok()
            .filter(|v| !v.trim().is_empty());
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "school-inventory".into()),
            audience: std::env::var("JWT_AUDIENCE")
                .unwrap_or_else(|_| "school-inventory-users".into()),
            ttl_minutes: parse_ttl(std::env::var("JWT_TTL_MINUTES").ok().as_deref())?,
        };
        let server = ServerConfig {
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|v| v.parse::<u16>().ok())
                .unwrap_or(3001),
            allowed_origins: parse_origins(&std::env::var("ALLOWED_ORIGINS").unwrap_or_default()),
        };
        let seed = std::env::var("SEED_DATA")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false)
            .then(|| SeedConfig {
                admin_email: std::env::var("SEED_ADMIN_EMAIL")
                    .unwrap_or_else(|_| "admin@school.com".into()),
                admin_password: std::env::var("SEED_ADMIN_PASSWORD")
                    .unwrap_or_else(|_| "admin123".into()),
            });
        Ok(Self {
            database_url,
            jwt,
            server,
            seed,
        })
    }
}

/// Token lifetime in minutes. Unset, unparseable or non-positive values fall
/// back to the default; values past the upper bound are a startup error.
pub(crate) fn parse_ttl(raw: Option<&str>) -> anyhow::Result<i64> {
    let Some(minutes) = raw.and_then(|v| v.trim().parse::<i64>().ok()).filter(|v| *v > 0) else {
        return Ok(DEFAULT_TTL_MINUTES);
    };
    if minutes > MAX_TTL_MINUTES {
        bail!(
            "JWT_TTL_MINUTES={} exceeds the maximum of {} minutes",
            minutes,
            MAX_TTL_MINUTES
        );
    }
    Ok(minutes)
}

pub(crate) fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().trim_end_matches('/').to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_origins_splits_and_trims() {
        let origins = parse_origins(" http://localhost:5173/ ,https://inventory.school.edu,, ");
        assert_eq!(
            origins,
            vec![
                "http://localhost:5173".to_string(),
                "https://inventory.school.edu".to_string()
            ]
        );
    }

    #[test]
    fn ttl_defaults_and_bounds() {
        assert_eq!(parse_ttl(None).unwrap(), DEFAULT_TTL_MINUTES);
        assert_eq!(parse_ttl(Some("soon")).unwrap(), DEFAULT_TTL_MINUTES);
        assert_eq!(parse_ttl(Some("-5")).unwrap(), DEFAULT_TTL_MINUTES);
        assert_eq!(parse_ttl(Some(" 90 ")).unwrap(), 90);
        assert_eq!(parse_ttl(Some(&MAX_TTL_MINUTES.to_string())).unwrap(), MAX_TTL_MINUTES);
        assert!(parse_ttl(Some("9223372036854775807")).is_err());
        assert!(parse_ttl(Some(&(MAX_TTL_MINUTES + 1).to_string())).is_err());
    }

    #[test]
    fn parse_origins_empty_means_any() {
        assert!(parse_origins("").is_empty());
        assert!(parse_origins(" , ").is_empty());
    }
}
