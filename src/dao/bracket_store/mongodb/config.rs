use std::time::Duration;

use mongodb::options::ClientOptions;

use super::error::{MongoDaoError, MongoResult};

const DEFAULT_DB: &str = "bracket";
const APP_NAME: &str = "bracket-back";
/// Kept below the service-level store timeout so a dead server surfaces as a driver error.
const SERVER_SELECTION_TIMEOUT: Duration = Duration::from_secs(3);

/// Driver options and database name for the MongoDB backend.
#[derive(Clone)]
pub struct MongoConfig {
    pub options: ClientOptions,
    pub database_name: String,
}

impl MongoConfig {
    /// Parse `uri` and apply the service's driver settings unless the URI sets them.
    pub async fn from_uri(uri: &str, db_name: Option<&str>) -> MongoResult<Self> {
        let mut options =
            ClientOptions::parse(uri)
                .await
                .map_err(|source| MongoDaoError::InvalidUri {
                    uri: uri.to_owned(),
                    source,
                })?;
        options.app_name.get_or_insert_with(|| APP_NAME.to_owned());
        options
            .server_selection_timeout
            .get_or_insert(SERVER_SELECTION_TIMEOUT);

        Ok(Self {
            options,
            database_name: db_name.unwrap_or(DEFAULT_DB).to_owned(),
        })
    }

    /// Read `MONGO_URI` (required) and `MONGO_DB` (defaults to `bracket`).
    pub async fn from_env() -> MongoResult<Self> {
        let uri = std::env::var("MONGO_URI")
            .map_err(|_| MongoDaoError::MissingEnvVar { var: "MONGO_URI" })?;
        let db = std::env::var("MONGO_DB").ok();
        Self::from_uri(&uri, db.as_deref()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fills_in_service_defaults() {
        let config = MongoConfig::from_uri("mongodb://localhost:27017", None)
            .await
            .unwrap();
        assert_eq!(config.database_name, "bracket");
        assert_eq!(config.options.app_name.as_deref(), Some("bracket-back"));
        assert_eq!(
            config.options.server_selection_timeout,
            Some(SERVER_SELECTION_TIMEOUT)
        );
    }

    #[tokio::test]
    async fn uri_settings_win() {
        let config = MongoConfig::from_uri(
            "mongodb://localhost:27017/?appName=ops&serverSelectionTimeoutMS=500",
            Some("brackets_test"),
        )
        .await
        .unwrap();
        assert_eq!(config.database_name, "brackets_test");
        assert_eq!(config.options.app_name.as_deref(), Some("ops"));
        assert_eq!(
            config.options.server_selection_timeout,
            Some(Duration::from_millis(500))
        );
    }
}
