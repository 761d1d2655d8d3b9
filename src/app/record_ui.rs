use std::sync::Arc;

use anyhow::{Result, bail};
use tracing::info;

use crate::{
    domain::RecordSchema,
    list::{DataTable, ListCoordinator, RecordCollection},
    shell::SessionContext,
    upload::{UnconfiguredUploader, UploadConfig, UploadService, UploadWorker},
};

use super::{options::UiOptions, runtime::App};

/// Terminal list/detail editor for one record kind.
pub struct RecordUI {
    schema: Arc<RecordSchema>,
    collection: Option<RecordCollection>,
    table: Option<DataTable>,
    options: UiOptions,
    uploader: Option<Arc<dyn UploadService>>,
    context: SessionContext,
}

impl RecordUI {
    pub fn new(schema: impl Into<Arc<RecordSchema>>) -> Self {
        Self {
            schema: schema.into(),
            collection: None,
            table: None,
            options: UiOptions::default(),
            uploader: None,
            context: SessionContext::default(),
        }
    }

    pub fn with_collection(mut self, collection: RecordCollection) -> Self {
        self.collection = Some(collection);
        self
    }

    pub fn with_table(mut self, table: DataTable) -> Self {
        self.table = Some(table);
        self
    }

    pub fn with_options(mut self, options: UiOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_uploader(mut self, uploader: impl UploadService + 'static) -> Self {
        self.uploader = Some(Arc::new(uploader));
        self
    }

    pub fn with_session(mut self, context: SessionContext) -> Self {
        self.context = context;
        self
    }

    /// Runs until the user quits and hands back the edited collection.
    pub fn run(self) -> Result<RecordCollection> {
        let mut app = self.into_app()?;
        app.run()?;
        let collection = app.into_coordinator().into_collection();
        info!(records = collection.len(), "editor closed");
        Ok(collection)
    }

    pub(crate) fn into_app(self) -> Result<App> {
        let RecordUI {
            schema,
            collection,
            table,
            options,
            uploader,
            context,
        } = self;

        let collection = collection.unwrap_or_else(|| RecordCollection::new(schema.id_key()));
        if collection.id_key() != schema.id_key() {
            bail!(
                "collection is keyed by '{}' but {} records are keyed by '{}'",
                collection.id_key(),
                schema.kind(),
                schema.id_key()
            );
        }

        let mut coordinator =
            ListCoordinator::new(schema, collection).with_form_options(options.form.clone());
        if let Some(table) = table {
            coordinator = coordinator.with_table(table);
        }
        let uploader = uploader.unwrap_or_else(default_uploader);
        Ok(App::new(coordinator, UploadWorker::new(uploader), context, options))
    }
}

fn default_uploader() -> Arc<dyn UploadService> {
    match UploadConfig::from_env() {
        #[cfg(feature = "http-upload")]
        Ok(config) => Arc::new(crate::upload::HttpUploader::new(config)),
        #[cfg(not(feature = "http-upload"))]
        Ok(_) => Arc::new(UnconfiguredUploader::new(
            "this build lacks the 'http-upload' feature",
        )),
        Err(err) => Arc::new(UnconfiguredUploader::new(err.to_string())),
    }
}
