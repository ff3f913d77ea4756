//! MongoDB client wrapper.
//!
//! Every operation derives its own `method`-tagged logger from the handle's
//! base logger and runs under a fresh operation timeout, so one handle can be
//! cloned and shared freely.

use crate::config::document::MongoConfig;
use crate::domain::ports::HealthCheck;
use crate::utils::error::{SdkError, Result};
use crate::utils::logger::{Logger, Millis};
use crate::utils::validation::{validate_non_empty_string, validate_required_field};
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{self, doc, Bson, Document};
use mongodb::options::{
    ClientOptions, CountOptions, CreateIndexOptions, DeleteOptions, DistinctOptions,
    EstimatedDocumentCountOptions, FindOneOptions, FindOptions, InsertManyOptions,
    InsertOneOptions, ReadPreference, SelectionCriteria, UpdateModifications, UpdateOptions,
};
use mongodb::results::{DeleteResult, InsertManyResult, InsertOneResult, UpdateResult};
use mongodb::{Client, Collection, IndexModel};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::future::IntoFuture;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct MongoClient {
    client: Client,
    database: Option<String>,
    op_timeout: Duration,
    logger: Logger,
}

impl MongoClient {
    /// Connects and pings the primary, both bounded by the connection timeout.
    pub async fn connect(logger: &Logger, config: &MongoConfig) -> Result<Self> {
        let log = logger.with("method", "connect");

        let uri = config.uri()?;
        let redacted = config.redacted_uri()?;
        // password stays out of the logs
        log.debug(
            "",
            &[
                ("user", &config.user),
                ("host", &config.host),
                ("port", &config.port),
                ("ssl", &config.ssl),
            ],
        );

        let mut options = ClientOptions::parse(&uri).await.map_err(|e| {
            log.error(
                "parse mongodb uri error",
                &[("error", &e), ("uri", &redacted)],
            );
            e
        })?;
        options.connect_timeout = Some(config.conn_timeout());
        options.server_selection_timeout = Some(config.conn_timeout());

        let client = Client::with_options(options).inspect_err(|e| {
            log.error(
                "connect to mongodb error",
                &[("error", e), ("uri", &redacted)],
            )
        })?;

        let handle = Self::from_client(client, logger.clone(), config);

        let started = Instant::now();
        handle
            .ping_within(config.conn_timeout())
            .await
            .inspect_err(|e| {
                log.error("ping mongodb error", &[("error", e), ("uri", &redacted)])
            })?;
        log.debug(
            "mongodb connected",
            &[("elapsed_ms", &Millis(started.elapsed()))],
        );

        Ok(handle)
    }

    /// Wraps an existing driver client without any network round-trip.
    pub fn from_client(client: Client, logger: Logger, config: &MongoConfig) -> Self {
        Self {
            client,
            database: config.db_name.clone().filter(|name| !name.is_empty()),
            op_timeout: config.op_timeout(),
            logger,
        }
    }

    pub fn set_database(&mut self, name: impl Into<String>) -> &mut Self {
        self.database = Some(name.into()).filter(|name| !name.is_empty());
        self
    }

    pub fn with_database(mut self, name: impl Into<String>) -> Self {
        self.set_database(name);
        self
    }

    /// The default database, or `MissingConfigError` when none was configured.
    pub fn database_name(&self) -> Result<&str> {
        validate_required_field("MONGODB_DBNAME", &self.database).map(String::as_str)
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn op_timeout(&self) -> Duration {
        self.op_timeout
    }

    pub fn collection<T: Send + Sync>(&self, name: &str) -> Result<Collection<T>> {
        self.collection_for(&self.logger, name)
    }

    fn collection_for<T: Send + Sync>(&self, logger: &Logger, name: &str) -> Result<Collection<T>> {
        validate_non_empty_string("collection", name)
            .inspect_err(|_| logger.error("you have not set mongodb collection name", &[]))?;
        let database = self
            .database_name()
            .inspect_err(|_| logger.error("you have not set mongodb database", &[]))?;

        Ok(self.client.database(database).collection::<T>(name))
    }

    pub async fn insert_one<T>(
        &self,
        collection: &str,
        document: &T,
        options: impl Into<Option<InsertOneOptions>>,
    ) -> Result<InsertOneResult>
    where
        T: Serialize + Send + Sync,
    {
        let logger = self.logger.with("method", "insert_one");
        let coll = self.collection_for::<T>(&logger, collection)?;

        within(
            self.op_timeout,
            "insert_one",
            coll.insert_one(document).with_options(options),
        )
        .await
        .inspect_err(|e| logger.error("insert one data error", &[("error", e)]))
    }

    pub async fn insert_many<T>(
        &self,
        collection: &str,
        documents: &[T],
        options: impl Into<Option<InsertManyOptions>>,
    ) -> Result<InsertManyResult>
    where
        T: Serialize + Send + Sync,
    {
        let logger = self.logger.with("method", "insert_many");
        let coll = self.collection_for::<T>(&logger, collection)?;

        within(
            self.op_timeout,
            "insert_many",
            coll.insert_many(documents).with_options(options),
        )
        .await
        .inspect_err(|e| logger.error("insert many data error", &[("error", e)]))
    }

    /// `Ok(None)` when nothing matches `filter`.
    pub async fn find_one<T>(
        &self,
        collection: &str,
        filter: Document,
        options: impl Into<Option<FindOneOptions>>,
    ) -> Result<Option<T>>
    where
        T: DeserializeOwned + Send + Sync,
    {
        let logger = self.logger.with("method", "find_one");
        let coll = self.collection_for::<T>(&logger, collection)?;

        within(
            self.op_timeout,
            "find_one",
            coll.find_one(filter).with_options(options),
        )
        .await
        .inspect_err(|e| logger.error("get one data error", &[("error", e)]))
    }

    /// Collects every matching document, deserialized as `T`.
    pub async fn find_many<T>(
        &self,
        collection: &str,
        filter: Document,
        options: impl Into<Option<FindOptions>>,
    ) -> Result<Vec<T>>
    where
        T: DeserializeOwned + Unpin + Send + Sync,
    {
        let logger = self.logger.with("method", "find_many");
        let coll = self.collection_for::<T>(&logger, collection)?;
        let options = options.into();

        within(self.op_timeout, "find_many", async move {
            let cursor = coll.find(filter).with_options(options).await?;
            cursor.try_collect::<Vec<T>>().await
        })
        .await
        .inspect_err(|e| logger.error("get many data error", &[("error", e)]))
    }

    /// Untyped variant of [`MongoClient::find_many`]; decode the results with
    /// [`decode_document`].
    pub async fn find_many_documents(
        &self,
        collection: &str,
        filter: Document,
        options: impl Into<Option<FindOptions>>,
    ) -> Result<Vec<Document>> {
        self.find_many::<Document>(collection, filter, options).await
    }

    pub async fn update_one(
        &self,
        collection: &str,
        filter: Document,
        update: impl Into<UpdateModifications>,
        options: impl Into<Option<UpdateOptions>>,
    ) -> Result<UpdateResult> {
        let logger = self.logger.with("method", "update_one");
        let coll = self.collection_for::<Document>(&logger, collection)?;

        within(
            self.op_timeout,
            "update_one",
            coll.update_one(filter, update).with_options(options),
        )
        .await
        .inspect_err(|e| logger.error("update one data error", &[("error", e)]))
    }

    pub async fn update_many(
        &self,
        collection: &str,
        filter: Document,
        update: impl Into<UpdateModifications>,
        options: impl Into<Option<UpdateOptions>>,
    ) -> Result<UpdateResult> {
        let logger = self.logger.with("method", "update_many");
        let coll = self.collection_for::<Document>(&logger, collection)?;

        within(
            self.op_timeout,
            "update_many",
            coll.update_many(filter, update).with_options(options),
        )
        .await
        .inspect_err(|e| logger.error("update many data error", &[("error", e)]))
    }

    pub async fn delete_one(
        &self,
        collection: &str,
        filter: Document,
        options: impl Into<Option<DeleteOptions>>,
    ) -> Result<DeleteResult> {
        let logger = self.logger.with("method", "delete_one");
        let coll = self.collection_for::<Document>(&logger, collection)?;

        within(
            self.op_timeout,
            "delete_one",
            coll.delete_one(filter).with_options(options),
        )
        .await
        .inspect_err(|e| logger.error("delete one data error", &[("error", e)]))
    }

    pub async fn delete_many(
        &self,
        collection: &str,
        filter: Document,
        options: impl Into<Option<DeleteOptions>>,
    ) -> Result<DeleteResult> {
        let logger = self.logger.with("method", "delete_many");
        let coll = self.collection_for::<Document>(&logger, collection)?;

        within(
            self.op_timeout,
            "delete_many",
            coll.delete_many(filter).with_options(options),
        )
        .await
        .inspect_err(|e| logger.error("delete many data error", &[("error", e)]))
    }

    /// Unique values of `field_name` among documents matching `filter`.
    pub async fn distinct(
        &self,
        collection: &str,
        field_name: &str,
        filter: Document,
        options: impl Into<Option<DistinctOptions>>,
    ) -> Result<Vec<Bson>> {
        let logger = self.logger.with("method", "distinct");
        let coll = self.collection_for::<Document>(&logger, collection)?;

        within(
            self.op_timeout,
            "distinct",
            coll.distinct(field_name, filter).with_options(options),
        )
        .await
        .inspect_err(|e| logger.error("get distinct data error", &[("error", e)]))
    }

    pub async fn count_documents(
        &self,
        collection: &str,
        filter: Document,
        options: impl Into<Option<CountOptions>>,
    ) -> Result<u64> {
        let logger = self.logger.with("method", "count_documents");
        let coll = self.collection_for::<Document>(&logger, collection)?;
        let options = options.into();
        logger.debug("", &[("options", &format!("{:?}", options))]);

        within(
            self.op_timeout,
            "count_documents",
            coll.count_documents(filter).with_options(options),
        )
        .await
        .inspect_err(|e| logger.error("count documents by filter error", &[("error", e)]))
    }

    /// Collection size from metadata; fast but approximate.
    pub async fn estimated_document_count(
        &self,
        collection: &str,
        options: impl Into<Option<EstimatedDocumentCountOptions>>,
    ) -> Result<u64> {
        let logger = self.logger.with("method", "estimated_document_count");
        let coll = self.collection_for::<Document>(&logger, collection)?;

        within(
            self.op_timeout,
            "estimated_document_count",
            coll.estimated_document_count().with_options(options),
        )
        .await
        .inspect_err(|e| logger.error("count documents total error", &[("error", e)]))
    }

    /// Returns the name of the created index.
    pub async fn create_index(
        &self,
        collection: &str,
        model: IndexModel,
        options: impl Into<Option<CreateIndexOptions>>,
    ) -> Result<String> {
        let logger = self.logger.with("method", "create_index");
        let coll = self.collection_for::<Document>(&logger, collection)?;
        let options = options.into();
        let described_model = format!("{:?}", model);
        let described_options = format!("{:?}", options);

        within(
            self.op_timeout,
            "create_index",
            coll.create_index(model).with_options(options),
        )
        .await
        .map(|created| created.index_name)
        .inspect_err(|e| {
            logger.error(
                "create one index error",
                &[
                    ("error", e),
                    ("collection", &collection),
                    ("model", &described_model),
                    ("options", &described_options),
                ],
            )
        })
    }

    /// Returns the created index names, in model order.
    pub async fn create_indexes(
        &self,
        collection: &str,
        models: Vec<IndexModel>,
        options: impl Into<Option<CreateIndexOptions>>,
    ) -> Result<Vec<String>> {
        let logger = self.logger.with("method", "create_indexes");
        let coll = self.collection_for::<Document>(&logger, collection)?;
        let options = options.into();
        let described_models = format!("{:?}", models);
        let described_options = format!("{:?}", options);

        within(
            self.op_timeout,
            "create_indexes",
            coll.create_indexes(models).with_options(options),
        )
        .await
        .map(|created| created.index_names)
        .inspect_err(|e| {
            logger.error(
                "create many indexes error",
                &[
                    ("error", e),
                    ("collection", &collection),
                    ("models", &described_models),
                    ("options", &described_options),
                ],
            )
        })
    }

    async fn ping_within(&self, timeout: Duration) -> Result<()> {
        let admin = self.client.database("admin");
        let command = admin
            .run_command(doc! { "ping": 1 })
            .selection_criteria(SelectionCriteria::ReadPreference(ReadPreference::Primary));

        within(timeout, "ping", command).await.map(|_| ())
    }
}

#[async_trait]
impl HealthCheck for MongoClient {
    async fn ping(&self) -> Result<()> {
        self.ping_within(self.op_timeout).await
    }
}

/// Runs a driver call under its own deadline, independent of the caller.
async fn within<F, T>(timeout: Duration, operation: &str, call: F) -> Result<T>
where
    F: IntoFuture<Output = mongodb::error::Result<T>>,
{
    match tokio::time::timeout(timeout, call).await {
        Ok(result) => Ok(result?),
        Err(_) => Err(SdkError::TimeoutError {
            operation: operation.to_string(),
            timeout,
        }),
    }
}

/// Decodes a generic document into `T` by round-tripping through BSON bytes.
pub fn decode_document<T: DeserializeOwned>(document: &Document) -> Result<T> {
    let bytes = bson::to_vec(document)?;
    Ok(bson::from_slice(&bytes)?)
}

pub fn encode_document<T: Serialize>(value: &T) -> Result<Document> {
    Ok(bson::to_document(value)?)
}
