// Generated by config-typegen. Do not edit by hand.

use config_typegen::api::{self, ConfigValue, FromValue, Mapping, MappingExt, Result, StructuredConfig, ToValue};

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfigDatabaseCredentials {
    pub username: String,
    pub password: String,
}

impl StructuredConfig for AppConfigDatabaseCredentials {
    fn from_container(map: &Mapping) -> Result<Self> {
        Ok(Self {
            username: map.field("username")?,
            password: map.field("password")?,
        })
    }

    fn to_container(&self) -> Mapping {
        let mut map = Mapping::new();
        map.insert("username".into(), self.username.to_value());
        map.insert("password".into(), self.password.to_value());
        map
    }
}

impl FromValue for AppConfigDatabaseCredentials {
    fn from_value(value: &ConfigValue) -> Result<Self> {
        Self::from_container(api::as_record(value)?)
    }
}

impl ToValue for AppConfigDatabaseCredentials {
    fn to_value(&self) -> ConfigValue {
        ConfigValue::Mapping(self.to_container())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfigDatabase {
    pub host: String,
    pub port: i64,
    pub credentials: AppConfigDatabaseCredentials,
}

impl StructuredConfig for AppConfigDatabase {
    fn from_container(map: &Mapping) -> Result<Self> {
        Ok(Self {
            host: map.field("host")?,
            port: map.field("port")?,
            credentials: map.field("credentials")?,
        })
    }

    fn to_container(&self) -> Mapping {
        let mut map = Mapping::new();
        map.insert("host".into(), self.host.to_value());
        map.insert("port".into(), self.port.to_value());
        map.insert("credentials".into(), self.credentials.to_value());
        map
    }
}

impl FromValue for AppConfigDatabase {
    fn from_value(value: &ConfigValue) -> Result<Self> {
        Self::from_container(api::as_record(value)?)
    }
}

impl ToValue for AppConfigDatabase {
    fn to_value(&self) -> ConfigValue {
        ConfigValue::Mapping(self.to_container())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfigFeaturesCaching {
    pub enabled: bool,
    pub cache_size: i64,
}

impl StructuredConfig for AppConfigFeaturesCaching {
    fn from_container(map: &Mapping) -> Result<Self> {
        Ok(Self {
            enabled: map.field("enabled")?,
            cache_size: map.field("cache_size")?,
        })
    }

    fn to_container(&self) -> Mapping {
        let mut map = Mapping::new();
        map.insert("enabled".into(), self.enabled.to_value());
        map.insert("cache_size".into(), self.cache_size.to_value());
        map
    }
}

impl FromValue for AppConfigFeaturesCaching {
    fn from_value(value: &ConfigValue) -> Result<Self> {
        Self::from_container(api::as_record(value)?)
    }
}

impl ToValue for AppConfigFeaturesCaching {
    fn to_value(&self) -> ConfigValue {
        ConfigValue::Mapping(self.to_container())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfigFeatures {
    pub authentication: bool,
    pub caching: AppConfigFeaturesCaching,
}

impl StructuredConfig for AppConfigFeatures {
    fn from_container(map: &Mapping) -> Result<Self> {
        Ok(Self {
            authentication: map.field("authentication")?,
            caching: map.field("caching")?,
        })
    }

    fn to_container(&self) -> Mapping {
        let mut map = Mapping::new();
        map.insert("authentication".into(), self.authentication.to_value());
        map.insert("caching".into(), self.caching.to_value());
        map
    }
}

impl FromValue for AppConfigFeatures {
    fn from_value(value: &ConfigValue) -> Result<Self> {
        Self::from_container(api::as_record(value)?)
    }
}

impl ToValue for AppConfigFeatures {
    fn to_value(&self) -> ConfigValue {
        ConfigValue::Mapping(self.to_container())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub name: String,
    pub version: f64,
    pub database: AppConfigDatabase,
    pub features: AppConfigFeatures,
    pub tags: Vec<ConfigValue>,
}

impl StructuredConfig for AppConfig {
    fn from_container(map: &Mapping) -> Result<Self> {
        Ok(Self {
            name: map.field("name")?,
            version: map.field("version")?,
            database: map.field("database")?,
            features: map.field("features")?,
            tags: map.field("tags")?,
        })
    }

    fn to_container(&self) -> Mapping {
        let mut map = Mapping::new();
        map.insert("name".into(), self.name.to_value());
        map.insert("version".into(), self.version.to_value());
        map.insert("database".into(), self.database.to_value());
        map.insert("features".into(), self.features.to_value());
        map.insert("tags".into(), self.tags.to_value());
        map
    }
}

impl FromValue for AppConfig {
    fn from_value(value: &ConfigValue) -> Result<Self> {
        Self::from_container(api::as_record(value)?)
    }
}

impl ToValue for AppConfig {
    fn to_value(&self) -> ConfigValue {
        ConfigValue::Mapping(self.to_container())
    }
}
