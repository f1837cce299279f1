use std::collections::BTreeMap;

use schemaprops_core::StoredTable;

use crate::{Catalog, Identifier, error::Result};

/// Keeps stored tables in memory. Useful for tests and short-lived sessions.
#[derive(Debug, Default, Clone)]
pub struct InMemoryCatalog {
    tables: BTreeMap<Identifier, StoredTable>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Catalog for InMemoryCatalog {
    fn read_stored(&self, identifier: &Identifier) -> Result<Option<StoredTable>> {
        Ok(self.tables.get(identifier).cloned())
    }

    fn write_stored(&mut self, identifier: &Identifier, table: StoredTable) -> Result<()> {
        self.tables.insert(identifier.clone(), table);
        Ok(())
    }

    fn remove_stored(&mut self, identifier: &Identifier) -> Result<bool> {
        Ok(self.tables.remove(identifier).is_some())
    }

    fn list_tables(&self, database: &str) -> Result<Vec<String>> {
        Ok(self
            .tables
            .keys()
            .filter(|identifier| identifier.database() == database)
            .map(|identifier| identifier.table().to_string())
            .collect())
    }
}
