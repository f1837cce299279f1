use std::{fmt, str::FromStr};

use snafu::prelude::*;

use crate::error::{Error, InvalidIdentifierSnafu, Result};

/// A table name qualified by its database, written `database.table`.
///
/// Both parts name a directory in a file-backed catalog, so neither may be
/// empty or contain `.`, `/` or `\`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Identifier {
    database: String,
    table: String,
}

impl Identifier {
    pub fn new(database: impl Into<String>, table: impl Into<String>) -> Result<Self> {
        let (database, table) = (database.into(), table.into());
        ensure!(
            is_valid_name(&database) && is_valid_name(&table),
            InvalidIdentifierSnafu {
                input: format!("{database}.{table}"),
            }
        );
        Ok(Self { database, table })
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    pub fn table(&self) -> &str {
        &self.table
    }
}

pub(crate) fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && !name.contains(['.', '/', '\\', '\0'])
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.database, self.table)
    }
}

impl FromStr for Identifier {
    type Err = Error;

    fn from_str(input: &str) -> Result<Self> {
        let (database, table) = input
            .split_once('.')
            .context(InvalidIdentifierSnafu { input })?;
        Identifier::new(database, table)
    }
}
