use std::{
    fs,
    path::{Path, PathBuf},
};

use snafu::prelude::*;
use tracing::trace;

use schemaprops_core::StoredTable;

use crate::{
    Catalog, Identifier,
    error::{InvalidIdentifierSnafu, IoSnafu, JsonSnafu, Result},
    identifier::is_valid_name,
};

const DATABASE_SUFFIX: &str = ".db";
const SCHEMA_FILE: &str = "schema.json";

/// Persists each table as JSON under a warehouse directory:
/// `<warehouse>/<database>.db/<table>/schema.json`.
#[derive(Debug, Clone)]
pub struct FileSystemCatalog {
    warehouse: PathBuf,
}

impl FileSystemCatalog {
    pub fn new(warehouse: impl Into<PathBuf>) -> Self {
        Self {
            warehouse: warehouse.into(),
        }
    }

    pub fn warehouse(&self) -> &Path {
        &self.warehouse
    }

    fn database_dir(&self, database: &str) -> PathBuf {
        self.warehouse.join(format!("{database}{DATABASE_SUFFIX}"))
    }

    fn table_dir(&self, identifier: &Identifier) -> PathBuf {
        self.database_dir(identifier.database()).join(identifier.table())
    }
}

impl Catalog for FileSystemCatalog {
    fn read_stored(&self, identifier: &Identifier) -> Result<Option<StoredTable>> {
        let path = self.table_dir(identifier).join(SCHEMA_FILE);
        if !path.is_file() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&path).context(IoSnafu { path: path.clone() })?;
        let table = serde_json::from_str(&contents).context(JsonSnafu { path: path.clone() })?;
        trace!(path = %path.display(), "read stored table");
        Ok(Some(table))
    }

    fn write_stored(&mut self, identifier: &Identifier, table: StoredTable) -> Result<()> {
        let dir = self.table_dir(identifier);
        fs::create_dir_all(&dir).context(IoSnafu { path: dir.clone() })?;
        let path = dir.join(SCHEMA_FILE);
        let contents =
            serde_json::to_string_pretty(&table).context(JsonSnafu { path: path.clone() })?;
        fs::write(&path, contents).context(IoSnafu { path: path.clone() })?;
        trace!(path = %path.display(), "wrote stored table");
        Ok(())
    }

    fn remove_stored(&mut self, identifier: &Identifier) -> Result<bool> {
        let dir = self.table_dir(identifier);
        if !dir.is_dir() {
            return Ok(false);
        }
        fs::remove_dir_all(&dir).context(IoSnafu { path: dir })?;
        Ok(true)
    }

    fn list_tables(&self, database: &str) -> Result<Vec<String>> {
        ensure!(
            is_valid_name(database),
            InvalidIdentifierSnafu { input: database }
        );
        let dir = self.database_dir(database);
        if !dir.is_dir() {
            return Ok(Vec::new());
        }
        let mut tables = Vec::new();
        for entry in fs::read_dir(&dir).context(IoSnafu { path: dir.clone() })? {
            let entry = entry.context(IoSnafu { path: dir.clone() })?;
            if entry.path().join(SCHEMA_FILE).is_file() {
                tables.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        tables.sort();
        Ok(tables)
    }
}
