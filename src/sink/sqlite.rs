// SQLite ledger. worksheets holds one header per (spreadsheet, worksheet);
// worksheet_rows is append-only, enforced by triggers. Cells are stored as JSON.

use std::path::Path;
use std::str::FromStr;

use sqlx::Row;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::instrument;

use super::{Cell, TabularSink};

pub struct SqliteSink {
    pool: SqlitePool,
    spreadsheet_id: String,
}

impl SqliteSink {
    /// Open (creating if missing) the database at `path`, addressing `spreadsheet_id` in it.
    pub async fn connect(path: &str, spreadsheet_id: &str) -> anyhow::Result<Self> {
        if let Some(parent) = Path::new(path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}", path))?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .busy_timeout(std::time::Duration::from_secs(5))
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal);
        let pool = SqlitePoolOptions::new().connect_with(opts).await?;
        Ok(Self {
            pool,
            spreadsheet_id: spreadsheet_id.to_string(),
        })
    }

    pub fn spreadsheet_id(&self) -> &str {
        &self.spreadsheet_id
    }

    pub async fn init(&self) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS worksheets (
                spreadsheet_id TEXT NOT NULL,
                name TEXT NOT NULL,
                header TEXT NOT NULL,
                created_at INTEGER NOT NULL,
                PRIMARY KEY (spreadsheet_id, name)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS worksheet_rows (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                spreadsheet_id TEXT NOT NULL,
                worksheet TEXT NOT NULL,
                cells TEXT NOT NULL,
                appended_at INTEGER NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_rows_worksheet ON worksheet_rows(spreadsheet_id, worksheet)",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TRIGGER IF NOT EXISTS worksheet_rows_no_update
            BEFORE UPDATE ON worksheet_rows
            BEGIN SELECT RAISE(ABORT, 'worksheet_rows is append-only'); END
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TRIGGER IF NOT EXISTS worksheet_rows_no_delete
            BEFORE DELETE ON worksheet_rows
            BEGIN SELECT RAISE(ABORT, 'worksheet_rows is append-only'); END
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// All rows of `worksheet` in append order.
    #[instrument(skip(self), fields(sink = "sqlite", operation = "read_rows"))]
    pub async fn read_rows(&self, worksheet: &str) -> anyhow::Result<Vec<Vec<Cell>>> {
        let rows = sqlx::query(
            "SELECT cells FROM worksheet_rows WHERE spreadsheet_id = $1 AND worksheet = $2 ORDER BY id ASC",
        )
        .bind(&self.spreadsheet_id)
        .bind(worksheet)
        .fetch_all(&self.pool)
        .await?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            let cells: String = row.try_get("cells")?;
            out.push(serde_json::from_str(&cells)?);
        }
        Ok(out)
    }

    async fn stored_header(&self, worksheet: &str) -> anyhow::Result<Option<Vec<String>>> {
        let header = sqlx::query_scalar::<_, String>(
            "SELECT header FROM worksheets WHERE spreadsheet_id = $1 AND name = $2",
        )
        .bind(&self.spreadsheet_id)
        .bind(worksheet)
        .fetch_optional(&self.pool)
        .await?;
        header
            .map(|h| serde_json::from_str(&h).map_err(anyhow::Error::from))
            .transpose()
    }
}

fn now_ms() -> anyhow::Result<i64> {
    Ok(std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)?
        .as_millis() as i64)
}

impl TabularSink for SqliteSink {
    #[instrument(skip(self, header), fields(sink = "sqlite", operation = "ensure_worksheet"))]
    async fn ensure_worksheet(&self, worksheet: &str, header: &[String]) -> anyhow::Result<bool> {
        let r = sqlx::query(
            "INSERT OR IGNORE INTO worksheets (spreadsheet_id, name, header, created_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(&self.spreadsheet_id)
        .bind(worksheet)
        .bind(serde_json::to_string(header)?)
        .bind(now_ms()?)
        .execute(&self.pool)
        .await?;
        Ok(r.rows_affected() > 0)
    }

    #[instrument(skip(self), fields(sink = "sqlite", operation = "read_header"))]
    async fn read_header(&self, worksheet: &str) -> anyhow::Result<Vec<String>> {
        self.stored_header(worksheet)
            .await?
            .ok_or_else(|| anyhow::anyhow!("worksheet not found: {}", worksheet))
    }

    #[instrument(skip(self, columns), fields(sink = "sqlite", operation = "widen_header", added = columns.len()))]
    async fn widen_header(&self, worksheet: &str, columns: &[String]) -> anyhow::Result<()> {
        if columns.is_empty() {
            return Ok(());
        }
        let mut tx = self.pool.begin().await?;
        let current = sqlx::query_scalar::<_, String>(
            "SELECT header FROM worksheets WHERE spreadsheet_id = $1 AND name = $2",
        )
        .bind(&self.spreadsheet_id)
        .bind(worksheet)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| anyhow::anyhow!("worksheet not found: {}", worksheet))?;

        let mut header: Vec<String> = serde_json::from_str(&current)?;
        header.extend(columns.iter().cloned());
        sqlx::query("UPDATE worksheets SET header = $1 WHERE spreadsheet_id = $2 AND name = $3")
            .bind(serde_json::to_string(&header)?)
            .bind(&self.spreadsheet_id)
            .bind(worksheet)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(())
    }

    #[instrument(skip(self, rows), fields(sink = "sqlite", operation = "append_rows", rows_count = rows.len()))]
    async fn append_rows(&self, worksheet: &str, rows: &[Vec<Cell>]) -> anyhow::Result<u64> {
        if rows.is_empty() {
            return Ok(0);
        }
        anyhow::ensure!(
            self.stored_header(worksheet).await?.is_some(),
            "worksheet not found: {}",
            worksheet
        );
        let appended_at = now_ms()?;
        let mut tx = self.pool.begin().await?;
        for row in rows {
            sqlx::query(
                "INSERT INTO worksheet_rows (spreadsheet_id, worksheet, cells, appended_at) VALUES ($1, $2, $3, $4)",
            )
            .bind(&self.spreadsheet_id)
            .bind(worksheet)
            .bind(serde_json::to_string(row)?)
            .bind(appended_at)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(rows.len() as u64)
    }
}
