use crate::DbError;
use chrono::{DateTime, Utc};
use core_types::{
    ChartRow, Comment, ExportRow, FinancialRecord, RecordDraft, Session, User,
};
use sqlx::sqlite::SqlitePool;

/// The `DbRepository` provides a high-level, application-specific interface
/// to the database. It encapsulates all SQL queries and data access logic.
///
/// Every record and comment query is scoped to the owning user; there is no
/// way to reach another user's rows through this type.
#[derive(Debug, Clone)]
pub struct DbRepository {
    pool: SqlitePool,
}

fn not_found_on_empty<T>(row: Option<T>) -> Result<T, DbError> {
    row.ok_or(DbError::NotFound)
}

impl DbRepository {
    /// Creates a new `DbRepository` with a shared database connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // --- Users -------------------------------------------------------------

    /// Registers a user. Fails with `DbError::Conflict` if the name is taken.
    pub async fn create_user(&self, username: &str, password_hash: &str) -> Result<(), DbError> {
        sqlx::query("INSERT INTO users (username, password_hash) VALUES (?1, ?2)")
            .bind(username)
            .bind(password_hash)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                let taken = e
                    .as_database_error()
                    .is_some_and(|db| db.is_unique_violation());
                if taken {
                    DbError::Conflict(username.to_string())
                } else {
                    e.into()
                }
            })?;
        Ok(())
    }

    pub async fn find_user(&self, username: &str) -> Result<Option<User>, DbError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT username, password_hash FROM users WHERE username = ?1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    // --- Sessions ----------------------------------------------------------

    pub async fn create_session(
        &self,
        token: &str,
        username: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), DbError> {
        sqlx::query("INSERT INTO sessions (token, username, expires_at) VALUES (?1, ?2, ?3)")
            .bind(token)
            .bind(username)
            .bind(expires_at.timestamp())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn find_session(&self, token: &str) -> Result<Option<Session>, DbError> {
        let session = sqlx::query_as::<_, Session>(
            "SELECT token, username, expires_at FROM sessions WHERE token = ?1",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;
        Ok(session)
    }

    pub async fn delete_session(&self, token: &str) -> Result<(), DbError> {
        sqlx::query("DELETE FROM sessions WHERE token = ?1")
            .bind(token)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Purges every session that has expired by `now`. Returns how many were removed.
    pub async fn delete_expired_sessions(&self, now: DateTime<Utc>) -> Result<u64, DbError> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= ?1")
            .bind(now.timestamp())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    // --- Financial records -------------------------------------------------

    /// Persists a freshly prepared record under `user_id`.
    pub async fn insert_record(
        &self,
        user_id: &str,
        draft: &RecordDraft,
    ) -> Result<FinancialRecord, DbError> {
        let (f, r) = (&draft.figures, &draft.ratios);
        let record = sqlx::query_as::<_, FinancialRecord>(
            r#"
            INSERT INTO financials (
                company_name, industry, year,
                sales, gross_profit, net_income, total_assets, equity,
                current_assets, current_liabilities, liabilities, employees,
                gross_profit_margin, roe, current_ratio, debt_ratio,
                sales_per_employee, productivity, user_id
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10,
                ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19
            )
            RETURNING *
            "#,
        )
        .bind(&draft.company_name)
        .bind(&draft.industry)
        .bind(draft.year)
        .bind(f.sales)
        .bind(f.gross_profit)
        .bind(f.net_income)
        .bind(f.total_assets)
        .bind(f.equity)
        .bind(f.current_assets)
        .bind(f.current_liabilities)
        .bind(f.liabilities)
        .bind(f.employees)
        .bind(r.gross_profit_margin)
        .bind(r.roe)
        .bind(r.current_ratio)
        .bind(r.debt_ratio)
        .bind(r.sales_per_employee)
        .bind(r.productivity)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(id = record.id, user_id, company = %record.company_name, "Financial record created.");
        Ok(record)
    }

    /// Overwrites every descriptive, magnitude and ratio column of a record.
    ///
    /// Concurrent edits of the same record are not coordinated; the last write wins.
    pub async fn update_record(
        &self,
        id: i64,
        user_id: &str,
        draft: &RecordDraft,
    ) -> Result<FinancialRecord, DbError> {
        let (f, r) = (&draft.figures, &draft.ratios);
        let record = sqlx::query_as::<_, FinancialRecord>(
            r#"
            UPDATE financials SET
                company_name = ?1, industry = ?2, year = ?3,
                sales = ?4, gross_profit = ?5, net_income = ?6,
                total_assets = ?7, equity = ?8, current_assets = ?9,
                current_liabilities = ?10, liabilities = ?11, employees = ?12,
                gross_profit_margin = ?13, roe = ?14, current_ratio = ?15,
                debt_ratio = ?16, sales_per_employee = ?17, productivity = ?18
            WHERE id = ?19 AND user_id = ?20
            RETURNING *
            "#,
        )
        .bind(&draft.company_name)
        .bind(&draft.industry)
        .bind(draft.year)
        .bind(f.sales)
        .bind(f.gross_profit)
        .bind(f.net_income)
        .bind(f.total_assets)
        .bind(f.equity)
        .bind(f.current_assets)
        .bind(f.current_liabilities)
        .bind(f.liabilities)
        .bind(f.employees)
        .bind(r.gross_profit_margin)
        .bind(r.roe)
        .bind(r.current_ratio)
        .bind(r.debt_ratio)
        .bind(r.sales_per_employee)
        .bind(r.productivity)
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        let record = not_found_on_empty(record)?;
        tracing::info!(id, user_id, "Financial record updated.");
        Ok(record)
    }

    pub async fn get_record(&self, id: i64, user_id: &str) -> Result<FinancialRecord, DbError> {
        let record = sqlx::query_as::<_, FinancialRecord>(
            "SELECT * FROM financials WHERE id = ?1 AND user_id = ?2",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        not_found_on_empty(record)
    }

    pub async fn list_records(&self, user_id: &str) -> Result<Vec<FinancialRecord>, DbError> {
        let records = sqlx::query_as::<_, FinancialRecord>(
            "SELECT * FROM financials WHERE user_id = ?1 ORDER BY id ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(records)
    }

    /// Distinct industries the user has entered, alphabetically.
    pub async fn list_industries(&self, user_id: &str) -> Result<Vec<String>, DbError> {
        let industries = sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT industry FROM financials WHERE user_id = ?1 ORDER BY industry ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(industries)
    }

    /// The rows plotted on the chart, ordered by company then year.
    pub async fn chart_rows(&self, user_id: &str) -> Result<Vec<ChartRow>, DbError> {
        let rows = sqlx::query_as::<_, ChartRow>(
            r#"
            SELECT company_name, year, sales, roe, productivity
            FROM financials
            WHERE user_id = ?1
            ORDER BY company_name ASC, year ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Every record of the user with their comments on it folded into one column.
    pub async fn export_rows(&self, user_id: &str) -> Result<Vec<ExportRow>, DbError> {
        let rows = sqlx::query_as::<_, ExportRow>(
            r#"
            SELECT f.*,
                   GROUP_CONCAT(c.content, ' / ') AS comments
            FROM financials AS f
            LEFT JOIN comments AS c
                   ON f.id = c.financial_id
                  AND c.user_id = ?1
            WHERE f.user_id = ?1
            GROUP BY f.id
            ORDER BY f.id ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    // --- Comments ----------------------------------------------------------

    /// Attaches a comment to one of the user's own records.
    pub async fn add_comment(
        &self,
        financial_id: i64,
        user_id: &str,
        content: &str,
    ) -> Result<Comment, DbError> {
        let owned = sqlx::query_scalar::<_, i64>(
            "SELECT id FROM financials WHERE id = ?1 AND user_id = ?2",
        )
        .bind(financial_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        not_found_on_empty(owned)?;

        let comment = sqlx::query_as::<_, Comment>(
            "INSERT INTO comments (financial_id, user_id, content) VALUES (?1, ?2, ?3) RETURNING *",
        )
        .bind(financial_id)
        .bind(user_id)
        .bind(content)
        .fetch_one(&self.pool)
        .await?;
        Ok(comment)
    }

    /// Replaces the content of a comment the user wrote.
    pub async fn update_comment(
        &self,
        id: i64,
        user_id: &str,
        content: &str,
    ) -> Result<Comment, DbError> {
        let comment = sqlx::query_as::<_, Comment>(
            "UPDATE comments SET content = ?1 WHERE id = ?2 AND user_id = ?3 RETURNING *",
        )
        .bind(content)
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        not_found_on_empty(comment)
    }

    /// Deletes a comment the user wrote and returns the id of its record.
    pub async fn delete_comment(&self, id: i64, user_id: &str) -> Result<i64, DbError> {
        let financial_id = sqlx::query_scalar::<_, i64>(
            "DELETE FROM comments WHERE id = ?1 AND user_id = ?2 RETURNING financial_id",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        not_found_on_empty(financial_id)
    }

    pub async fn list_comments_for_record(
        &self,
        financial_id: i64,
        user_id: &str,
    ) -> Result<Vec<Comment>, DbError> {
        let comments = sqlx::query_as::<_, Comment>(
            "SELECT * FROM comments WHERE financial_id = ?1 AND user_id = ?2 ORDER BY id ASC",
        )
        .bind(financial_id)
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(comments)
    }

    /// All of the user's comments, across records.
    pub async fn list_comments(&self, user_id: &str) -> Result<Vec<Comment>, DbError> {
        let comments = sqlx::query_as::<_, Comment>(
            "SELECT * FROM comments WHERE user_id = ?1 ORDER BY id ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(comments)
    }
}
