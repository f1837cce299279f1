use snafu::prelude::*;
use tracing::debug;

use schemaprops_core::{CatalogTable, StoredTable};

use crate::{
    Identifier,
    error::{Result, SchemaSnafu, TableAlreadyExistsSnafu, TableNotFoundSnafu},
};

/// A catalog backed by storage that only understands [`StoredTable`]s.
///
/// Implementors provide raw storage; the table-level operations encode and
/// decode the non-physical parts of the schema.
pub trait Catalog {
    /// Reads the stored form of a table, if it exists.
    fn read_stored(&self, identifier: &Identifier) -> Result<Option<StoredTable>>;
    /// Writes the stored form of a table, replacing any previous version.
    fn write_stored(&mut self, identifier: &Identifier, table: StoredTable) -> Result<()>;
    /// Removes a table. Returns whether it existed.
    fn remove_stored(&mut self, identifier: &Identifier) -> Result<bool>;
    /// Lists the table names in `database`, sorted.
    fn list_tables(&self, database: &str) -> Result<Vec<String>>;

    fn create_table(
        &mut self,
        identifier: &Identifier,
        table: &CatalogTable,
        ignore_if_exists: bool,
    ) -> Result<()> {
        if self.read_stored(identifier)?.is_some() {
            if ignore_if_exists {
                return Ok(());
            }
            return TableAlreadyExistsSnafu {
                identifier: identifier.clone(),
            }
            .fail();
        }

        let stored = table.to_stored().context(SchemaSnafu {
            identifier: identifier.clone(),
        })?;
        debug!(%identifier, options = stored.options.len(), "creating table");
        self.write_stored(identifier, stored)
    }

    fn get_table(&self, identifier: &Identifier) -> Result<CatalogTable> {
        let stored = self
            .read_stored(identifier)?
            .context(TableNotFoundSnafu {
                identifier: identifier.clone(),
            })?;
        CatalogTable::from_stored(&stored).context(SchemaSnafu {
            identifier: identifier.clone(),
        })
    }

    fn drop_table(&mut self, identifier: &Identifier, ignore_if_not_exists: bool) -> Result<()> {
        let existed = self.remove_stored(identifier)?;
        ensure!(
            existed || ignore_if_not_exists,
            TableNotFoundSnafu {
                identifier: identifier.clone(),
            }
        );
        debug!(%identifier, existed, "dropped table");
        Ok(())
    }

    fn table_exists(&self, identifier: &Identifier) -> Result<bool> {
        Ok(self.read_stored(identifier)?.is_some())
    }
}
