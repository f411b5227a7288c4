//! Reads and writes of the identifier-type and action-type catalogs.
//!
//! Both catalogs assign small serial keys to names observed on the site.
//! The reconciliation phase diffs observed names against these tables and
//! registers the remainder before any child row referencing them is written.

use std::collections::{BTreeMap, BTreeSet};

use sqlx::{Postgres, QueryBuilder};
use tracing::debug;

use super::core::Database;
use crate::etl::transform::TypeCatalog;
use crate::TARGET_DB;

impl Database {
    /// Identifier type names currently in the catalog.
    pub async fn existing_identifier_types(&self) -> Result<BTreeSet<String>, sqlx::Error> {
        let rows = sqlx::query_as::<_, (String,)>(
            "SELECT identifier_type_name FROM drug_identifier_types",
        )
        .fetch_all(self.pool())
        .await?;
        Ok(rows.into_iter().map(|(name,)| name).collect())
    }

    /// Action type names currently in the catalog. `None` is the sentinel
    /// row for targets listed without an action.
    pub async fn existing_action_types(&self) -> Result<BTreeSet<Option<String>>, sqlx::Error> {
        let rows =
            sqlx::query_as::<_, (Option<String>,)>("SELECT action_type FROM drug_action_types")
                .fetch_all(self.pool())
                .await?;
        Ok(rows.into_iter().map(|(name,)| name).collect())
    }

    /// Both catalogs as name-to-key maps, read back after reconciliation.
    pub async fn type_catalog(&self) -> Result<TypeCatalog, sqlx::Error> {
        let identifier_rows = sqlx::query_as::<_, (i32, String)>(
            "SELECT identifier_type_id, identifier_type_name FROM drug_identifier_types",
        )
        .fetch_all(self.pool())
        .await?;

        let action_rows = sqlx::query_as::<_, (i32, Option<String>)>(
            "SELECT action_type_id, action_type FROM drug_action_types",
        )
        .fetch_all(self.pool())
        .await?;

        Ok(TypeCatalog {
            identifier_types: identifier_rows
                .into_iter()
                .map(|(id, name)| (name, id))
                .collect::<BTreeMap<_, _>>(),
            action_types: action_rows
                .into_iter()
                .map(|(id, name)| (name, id))
                .collect::<BTreeMap<_, _>>(),
        })
    }

    /// Register newly observed identifier type names. No statement is sent
    /// for an empty set.
    pub async fn insert_identifier_types(
        &self,
        names: &BTreeSet<String>,
    ) -> Result<(), sqlx::Error> {
        if names.is_empty() {
            return Ok(());
        }
        let mut conn = self.pool().acquire().await?;
        let mut builder = QueryBuilder::<Postgres>::new(
            "INSERT INTO drug_identifier_types (identifier_type_name) ",
        );
        builder.push_values(names, |mut row, name| {
            row.push_bind(name);
        });
        builder.build().execute(&mut *conn).await?;
        debug!(target: TARGET_DB, "Registered {} identifier types", names.len());
        Ok(())
    }

    /// Register newly observed action type names, the `None` sentinel
    /// included. No statement is sent for an empty set.
    pub async fn insert_action_types(
        &self,
        names: &BTreeSet<Option<String>>,
    ) -> Result<(), sqlx::Error> {
        if names.is_empty() {
            return Ok(());
        }
        let mut conn = self.pool().acquire().await?;
        let mut builder =
            QueryBuilder::<Postgres>::new("INSERT INTO drug_action_types (action_type) ");
        builder.push_values(names, |mut row, name| {
            row.push_bind(name.as_deref());
        });
        builder.build().execute(&mut *conn).await?;
        debug!(target: TARGET_DB, "Registered {} action types", names.len());
        Ok(())
    }
}
