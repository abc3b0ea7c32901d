//! Repository for the `contacts` table.

use sqlx::{Acquire, PgExecutor, Postgres};

use crmsync_core::types::DbId;

use crate::models::contact::{Contact, ContactWrite, NewContact, SyncedFields, UpdateContact};

/// Column list for `contacts` queries.
const COLUMNS: &str = "\
    id, salesforce_id, first_name, last_name, email, phone, company, \
    last_modified_remote, last_synced_at, created_at, updated_at";

/// Insert that merges into an existing row carrying the same remote id.
///
/// Rows without a remote id never conflict (NULLs are distinct), so this is
/// a plain insert for purely local contacts.
const UPSERT_SQL: &str = "\
    INSERT INTO contacts \
        (salesforce_id, first_name, last_name, email, phone, company, last_synced_at) \
    VALUES ($1, $2, $3, $4, $5, $6, $7) \
    ON CONFLICT (salesforce_id) DO UPDATE SET \
        first_name = EXCLUDED.first_name, \
        last_name = EXCLUDED.last_name, \
        email = EXCLUDED.email, \
        phone = EXCLUDED.phone, \
        last_synced_at = EXCLUDED.last_synced_at";

/// Overwrite the remote-owned fields of a matched row, keyed on the remote id.
///
/// `company` is local-only and never written here.
const UPSERT_SYNCED_SQL: &str = "\
    INSERT INTO contacts \
        (salesforce_id, first_name, last_name, email, phone, last_synced_at) \
    VALUES ($1, $2, $3, $4, $5, $6) \
    ON CONFLICT (salesforce_id) DO UPDATE SET \
        first_name = EXCLUDED.first_name, \
        last_name = EXCLUDED.last_name, \
        email = EXCLUDED.email, \
        phone = EXCLUDED.phone, \
        last_synced_at = EXCLUDED.last_synced_at";

/// Provides query operations for local contacts.
pub struct ContactRepo;

impl ContactRepo {
    /// Insert a contact, merging on `salesforce_id` when it already exists.
    pub async fn upsert<'e, E>(executor: E, input: &NewContact) -> Result<Contact, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!("{UPSERT_SQL} RETURNING {COLUMNS}");
        sqlx::query_as::<_, Contact>(&query)
            .bind(&input.salesforce_id)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.company)
            .bind(input.last_synced_at)
            .fetch_one(executor)
            .await
    }

    /// Find a contact by its internal ID.
    pub async fn find_by_id<'e, E>(executor: E, id: DbId) -> Result<Option<Contact>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!("SELECT {COLUMNS} FROM contacts WHERE id = $1");
        sqlx::query_as::<_, Contact>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Find a contact by exact match on the remote CRM identifier.
    pub async fn find_by_salesforce_id<'e, E>(
        executor: E,
        salesforce_id: &str,
    ) -> Result<Option<Contact>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!("SELECT {COLUMNS} FROM contacts WHERE salesforce_id = $1");
        sqlx::query_as::<_, Contact>(&query)
            .bind(salesforce_id)
            .fetch_optional(executor)
            .await
    }

    /// List contacts ordered by name.
    ///
    /// `pattern` is an already escaped `ILIKE` pattern (see
    /// `crmsync_core::search::contains_pattern`) matched against first name,
    /// last name, email and company.
    pub async fn list<'e, E>(
        executor: E,
        pattern: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Contact>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        match pattern {
            Some(pattern) => {
                let query = format!(
                    "SELECT {COLUMNS} FROM contacts \
                     WHERE first_name ILIKE $1 ESCAPE '\\' \
                        OR last_name ILIKE $1 ESCAPE '\\' \
                        OR email ILIKE $1 ESCAPE '\\' \
                        OR company ILIKE $1 ESCAPE '\\' \
                     ORDER BY last_name, first_name, id \
                     LIMIT $2 OFFSET $3"
                );
                sqlx::query_as::<_, Contact>(&query)
                    .bind(pattern)
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(executor)
                    .await
            }
            None => {
                let query = format!(
                    "SELECT {COLUMNS} FROM contacts \
                     ORDER BY last_name, first_name, id \
                     LIMIT $1 OFFSET $2"
                );
                sqlx::query_as::<_, Contact>(&query)
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(executor)
                    .await
            }
        }
    }

    /// Apply a manual edit. Only non-`None` fields are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update<'e, E>(
        executor: E,
        id: DbId,
        input: &UpdateContact,
    ) -> Result<Option<Contact>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "UPDATE contacts SET \
                first_name = COALESCE($2, first_name), \
                last_name = COALESCE($3, last_name), \
                email = COALESCE($4, email), \
                phone = COALESCE($5, phone), \
                company = COALESCE($6, company) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Contact>(&query)
            .bind(id)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.company)
            .fetch_optional(executor)
            .await
    }

    /// Delete a contact. Returns `true` if a row was removed.
    pub async fn delete<'e, E>(executor: E, id: DbId) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM contacts WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Flush a reconciled batch in a single transaction.
    ///
    /// Either every write lands or none does. Returns the number of rows
    /// touched. Updates are keyed on `salesforce_id`, so a row deleted after
    /// the lookup is recreated rather than skipped.
    pub async fn apply_batch<'a, A>(conn: A, writes: &[ContactWrite]) -> Result<u64, sqlx::Error>
    where
        A: Acquire<'a, Database = Postgres>,
    {
        let mut tx = conn.begin().await?;
        let mut touched = 0;

        for write in writes {
            touched += match write {
                ContactWrite::Insert(input) => Self::upsert_inner(&mut tx, input).await?,
                ContactWrite::Update {
                    salesforce_id,
                    fields,
                } => Self::upsert_synced_inner(&mut tx, salesforce_id, fields).await?,
            };
        }

        tx.commit().await?;
        Ok(touched)
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    async fn upsert_inner(
        tx: &mut sqlx::Transaction<'_, Postgres>,
        input: &NewContact,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(UPSERT_SQL)
            .bind(&input.salesforce_id)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.company)
            .bind(input.last_synced_at)
            .execute(&mut **tx)
            .await?;
        Ok(result.rows_affected())
    }

    async fn upsert_synced_inner(
        tx: &mut sqlx::Transaction<'_, Postgres>,
        salesforce_id: &str,
        fields: &SyncedFields,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(UPSERT_SYNCED_SQL)
            .bind(salesforce_id)
            .bind(&fields.first_name)
            .bind(&fields.last_name)
            .bind(&fields.email)
            .bind(&fields.phone)
            .bind(fields.last_synced_at)
            .execute(&mut **tx)
            .await?;
        Ok(result.rows_affected())
    }
}
