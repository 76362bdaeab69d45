use async_trait::async_trait;
use ar_core::{Article, ArticlePatch, ArticleStorage, Error, NewArticle, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::Row;
use std::path::{Path, PathBuf};
use crate::StorageBackend;

const DEFAULT_DB_PATH: &str = "articles.db";

const MIGRATIONS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS articles (
        id TEXT PRIMARY KEY,
        title TEXT NOT NULL,
        content TEXT NOT NULL,
        original_url TEXT,
        updated_content TEXT,
        article_references TEXT NOT NULL DEFAULT '[]',
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_articles_title ON articles (title)",
    // Add future migrations here
];

fn db_error(context: &str) -> impl Fn(sqlx::Error) -> Error + '_ {
    move |e| Error::Persistence(format!("{}: {}", context, e))
}

// Fixed-width UTC timestamps so text ordering matches time ordering.
fn timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|at| at.with_timezone(&Utc))
        .map_err(|e| Error::Persistence(format!("Failed to parse date {}: {}", value, e)))
}

fn row_to_article(row: &SqliteRow) -> Result<Article> {
    let get = db_error("Failed to read article row");
    let references: String = row.try_get("article_references").map_err(&get)?;
    let created_at: String = row.try_get("created_at").map_err(&get)?;
    let updated_at: String = row.try_get("updated_at").map_err(&get)?;

    Ok(Article {
        id: row.try_get("id").map_err(&get)?,
        title: row.try_get("title").map_err(&get)?,
        content: row.try_get("content").map_err(&get)?,
        original_url: row.try_get("original_url").map_err(&get)?,
        updated_content: row.try_get("updated_content").map_err(&get)?,
        references: serde_json::from_str(&references)?,
        created_at: parse_timestamp(&created_at)?,
        updated_at: parse_timestamp(&updated_at)?,
    })
}

pub struct SQLiteStorage {
    pool: SqlitePool,
    db_path: PathBuf,
}

#[async_trait]
impl StorageBackend for SQLiteStorage {
    fn name() -> &'static str {
        "sqlite"
    }

    async fn connect(url: Option<&str>) -> Result<Self> {
        let path = url
            .map(|u| u.trim_start_matches("sqlite://").trim_start_matches("sqlite:"))
            .unwrap_or(DEFAULT_DB_PATH);
        Self::new_with_path(Path::new(path)).await
    }
}

impl SQLiteStorage {
    pub async fn new_with_path(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let pool = SqlitePool::connect(&format!("sqlite://{}?mode=rwc", db_path.display()))
            .await
            .map_err(db_error("Failed to connect to database"))?;

        for (i, migration) in MIGRATIONS.iter().enumerate() {
            sqlx::query(migration)
                .execute(&pool)
                .await
                .map_err(|e| Error::Persistence(format!("Failed to run migration {}: {}", i, e)))?;
        }

        Ok(Self {
            pool,
            db_path: db_path.to_path_buf(),
        })
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    async fn fetch_all(&self, sql: &str) -> Result<Vec<Article>> {
        let rows = sqlx::query(sql)
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("Failed to query articles"))?;
        rows.iter().map(row_to_article).collect()
    }
}

#[async_trait]
impl ArticleStorage for SQLiteStorage {
    async fn find_pending(&self) -> Result<Vec<Article>> {
        self.fetch_all("SELECT * FROM articles WHERE updated_content IS NULL ORDER BY created_at ASC")
            .await
    }

    async fn find_by_title(&self, title: &str) -> Result<Option<Article>> {
        let row = sqlx::query("SELECT * FROM articles WHERE title = ? LIMIT 1")
            .bind(title)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to find article by title"))?;
        row.as_ref().map(row_to_article).transpose()
    }

    async fn create(&self, article: NewArticle) -> Result<Article> {
        let article = Article::new(article);
        self.save(&article).await
    }

    async fn save(&self, article: &Article) -> Result<Article> {
        let references = serde_json::to_string(&article.references)?;

        sqlx::query(
            r#"
            INSERT OR REPLACE INTO articles
            (id, title, content, original_url, updated_content, article_references, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&article.id)
        .bind(&article.title)
        .bind(&article.content)
        .bind(article.original_url.as_deref())
        .bind(article.updated_content.as_deref())
        .bind(references)
        .bind(timestamp(&article.created_at))
        .bind(timestamp(&article.updated_at))
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to store article"))?;

        Ok(article.clone())
    }

    async fn list(&self) -> Result<Vec<Article>> {
        self.fetch_all("SELECT * FROM articles ORDER BY created_at DESC").await
    }

    async fn get(&self, id: &str) -> Result<Option<Article>> {
        let row = sqlx::query("SELECT * FROM articles WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to get article"))?;
        row.as_ref().map(row_to_article).transpose()
    }

    async fn update(&self, id: &str, patch: ArticlePatch) -> Result<Option<Article>> {
        let Some(mut article) = self.get(id).await? else {
            return Ok(None);
        };
        article.apply(patch);
        self.save(&article).await.map(Some)
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM articles WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to delete article"))?;
        Ok(result.rows_affected() > 0)
    }
}
