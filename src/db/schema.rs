use tracing::info;

use super::core::Database;
use crate::TARGET_DB;

impl Database {
    /// Drop and recreate the five target relations.
    ///
    /// Destructive on every run: this is a from-scratch import tool, not a
    /// migration tool. Statements run parents-first so the FK references
    /// resolve on creation.
    pub async fn create_tables(&self) -> Result<(), sqlx::Error> {
        let mut conn = self.pool().acquire().await?;

        let create_table_stmts = [
            r#"
            DROP TABLE IF EXISTS drugs CASCADE;
            CREATE TABLE drugs (
                drugbank_id char(7) PRIMARY KEY,
                name varchar NOT NULL,
                smiles varchar
            );
            "#,
            r#"
            DROP TABLE IF EXISTS drug_identifier_types CASCADE;
            CREATE TABLE drug_identifier_types (
                identifier_type_id SERIAL UNIQUE,
                identifier_type_name varchar UNIQUE
            );
            "#,
            r#"
            DROP TABLE IF EXISTS drug_identifiers CASCADE;
            CREATE TABLE drug_identifiers (
                drugbank_id char(7) references drugs(drugbank_id),
                alt_identifier_value varchar NOT NULL,
                alt_identifier_type_id int references drug_identifier_types(identifier_type_id) NOT NULL,
                alt_identifier_url varchar
            );
            "#,
            r#"
            DROP TABLE IF EXISTS drug_action_types CASCADE;
            CREATE TABLE drug_action_types (
                action_type_id SERIAL UNIQUE,
                action_type varchar UNIQUE
            );
            "#,
            r#"
            DROP TABLE IF EXISTS drug_targets CASCADE;
            CREATE TABLE drug_targets (
                drugbank_id char(7) references drugs(drugbank_id),
                gene_name varchar NOT NULL,
                action_type_id int references drug_action_types(action_type_id),
                UNIQUE(drugbank_id, gene_name, action_type_id)
            );
            "#,
        ];

        info!(target: TARGET_DB, "Creating {} tables", create_table_stmts.len());
        for statement in create_table_stmts {
            // raw_sql: each entry is a DROP plus a CREATE in one round trip
            sqlx::raw_sql(statement).execute(&mut *conn).await?;
        }

        Ok(())
    }
}
