//! Database connection settings.

use std::collections::HashMap;
use std::fmt;
use url::Url;

use crate::StoreError;

/// Database backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Driver {
    /// PostgreSQL.
    Postgres,
    /// MySQL or MariaDB.
    #[default]
    MySql,
    /// SQLite; `database` is a file path or `:memory:`.
    Sqlite,
}

impl Driver {
    /// Returns the default TCP port.
    #[must_use]
    pub const fn default_port(&self) -> u16 {
        match self {
            Self::Postgres => 5432,
            Self::MySql => 3306,
            Self::Sqlite => 0,
        }
    }

    const fn scheme(&self) -> &'static str {
        match self {
            Self::Postgres => "postgres",
            Self::MySql => "mysql",
            Self::Sqlite => "sqlite",
        }
    }

    /// Returns the bind placeholder for the 1-based parameter `n`.
    #[must_use]
    pub fn placeholder(&self, n: usize) -> String {
        match self {
            Self::Postgres => format!("${n}"),
            Self::MySql | Self::Sqlite => "?".to_string(),
        }
    }
}

impl fmt::Display for Driver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.scheme())
    }
}

impl std::str::FromStr for Driver {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "postgres" | "postgresql" | "pg" => Ok(Self::Postgres),
            "mysql" | "mariadb" => Ok(Self::MySql),
            "sqlite" | "sqlite3" => Ok(Self::Sqlite),
            _ => Err(StoreError::InvalidConfig(format!("unknown driver: {s}"))),
        }
    }
}

/// Destination database settings.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    /// Backend.
    pub driver: Driver,
    /// User name.
    pub user: String,
    /// Password.
    pub password: String,
    /// Database name (file path for SQLite).
    pub database: String,
    /// Host name.
    pub host: String,
    /// TCP port.
    pub port: u16,
}

impl ConnectionConfig {
    /// Keys accepted by [`ConnectionConfig::from_map`].
    pub const KEYS: [&'static str; 6] = ["user", "password", "database", "host", "port", "driver"];

    /// Creates settings for `database` on localhost with the driver's default port.
    #[must_use]
    pub fn new(driver: Driver, database: impl Into<String>) -> Self {
        Self {
            driver,
            user: String::new(),
            password: String::new(),
            database: database.into(),
            host: "localhost".to_string(),
            port: driver.default_port(),
        }
    }

    /// Builds settings from a key/value mapping.
    ///
    /// Recognized keys are `user`, `password`, `database`, `host`, `port`
    /// and the optional `driver` (default `mysql`).
    ///
    /// # Errors
    ///
    /// Returns an error on unknown keys, a missing `database`, or an invalid port or driver.
    pub fn from_map(map: &HashMap<String, String>) -> Result<Self, StoreError> {
        if let Some(key) = map.keys().find(|k| !Self::KEYS.contains(&k.as_str())) {
            return Err(StoreError::InvalidConfig(format!("unknown key: {key}")));
        }

        let driver = map
            .get("driver")
            .map_or(Ok(Driver::default()), |d| d.parse())?;
        let database = map
            .get("database")
            .filter(|d| !d.is_empty())
            .ok_or_else(|| StoreError::InvalidConfig("missing key: database".to_string()))?;

        let mut config = Self::new(driver, database.clone());
        if let Some(user) = map.get("user") {
            config.user.clone_from(user);
        }
        if let Some(password) = map.get("password") {
            config.password.clone_from(password);
        }
        if let Some(host) = map.get("host") {
            config.host.clone_from(host);
        }
        if let Some(port) = map.get("port") {
            config.port = port
                .parse()
                .map_err(|_| StoreError::InvalidConfig(format!("invalid port: {port}")))?;
        }
        Ok(config)
    }

    /// Returns the connection URL, credentials included.
    ///
    /// # Errors
    ///
    /// Returns an error if the host cannot form a valid URL.
    pub fn url(&self) -> Result<String, StoreError> {
        if self.driver == Driver::Sqlite {
            return Ok(format!("sqlite:{}", self.database));
        }

        let invalid = |what: &str| StoreError::InvalidConfig(format!("invalid {what}"));
        let mut url = Url::parse(&format!("{}://{}", self.driver.scheme(), self.host))
            .map_err(|_| invalid("host"))?;
        url.set_port(Some(self.port)).map_err(|()| invalid("port"))?;
        if !self.user.is_empty() {
            url.set_username(&self.user).map_err(|()| invalid("user"))?;
        }
        if !self.password.is_empty() {
            url.set_password(Some(&self.password))
                .map_err(|()| invalid("password"))?;
        }
        url.set_path(&self.database);
        Ok(url.into())
    }

    /// Returns a password-free description for logs and errors.
    #[must_use]
    pub fn target(&self) -> String {
        match self.driver {
            Driver::Sqlite => format!("sqlite:{}", self.database),
            driver => format!(
                "{driver}://{}@{}:{}/{}",
                self.user, self.host, self.port, self.database
            ),
        }
    }
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("driver", &self.driver)
            .field("user", &self.user)
            .field("password", &"***")
            .field("database", &self.database)
            .field("host", &self.host)
            .field("port", &self.port)
            .finish()
    }
}
