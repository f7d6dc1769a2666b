//! PostgreSQL content store

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::{Article, MarketSnapshot, NewArticle, Ticker, UtcDayWindow};
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;
use tracing::info;

use crate::error::{Result, StorageError};
use crate::traits::{ArticleStore, TickerStore};

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS tickers (
        symbol TEXT PRIMARY KEY,
        is_active BOOLEAN NOT NULL DEFAULT TRUE,
        priority INTEGER NOT NULL DEFAULT 0,
        last_article_at TIMESTAMPTZ
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS articles (
        id UUID PRIMARY KEY,
        slug TEXT NOT NULL UNIQUE,
        title TEXT NOT NULL,
        excerpt TEXT NOT NULL,
        body_markdown TEXT NOT NULL,
        tickers TEXT[] NOT NULL DEFAULT '{}',
        tags TEXT[] NOT NULL DEFAULT '{}',
        is_breaking BOOLEAN NOT NULL DEFAULT FALSE,
        model TEXT,
        prompt_version TEXT,
        market_snapshot JSONB,
        source_news JSONB,
        stock_score INTEGER,
        published_at TIMESTAMPTZ NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    "CREATE INDEX IF NOT EXISTS articles_published_at_idx ON articles (published_at DESC)",
];

const ARTICLE_COLUMNS: &str = "id, slug, title, excerpt, body_markdown, tickers, tags, \
    is_breaking, model, prompt_version, market_snapshot, source_news, stock_score, \
    published_at, created_at";

/// PostgreSQL ticker and article store
#[derive(Clone)]
pub struct PostgresContentStore {
    pool: Arc<PgPool>,
}

impl PostgresContentStore {
    /// Wrap an existing pool
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Open a pool against `database_url`
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(Self::new(pool))
    }

    /// Create tables and indexes if they do not exist
    pub async fn ensure_schema(&self) -> Result<()> {
        for statement in SCHEMA {
            sqlx::query(statement)
                .execute(&*self.pool)
                .await
                .map_err(query_error)?;
        }
        info!("Content schema ready");
        Ok(())
    }

    fn row_to_ticker(row: &PgRow) -> Result<Ticker> {
        Ok(Ticker {
            symbol: row.try_get("symbol").map_err(query_error)?,
            is_active: row.try_get("is_active").map_err(query_error)?,
            priority: row.try_get("priority").map_err(query_error)?,
            last_article_at: row.try_get("last_article_at").map_err(query_error)?,
        })
    }

    fn row_to_article(row: &PgRow) -> Result<Article> {
        let snapshot: Option<serde_json::Value> =
            row.try_get("market_snapshot").map_err(query_error)?;
        let market_snapshot = snapshot
            .map(serde_json::from_value::<MarketSnapshot>)
            .transpose()?;

        Ok(Article {
            id: row.try_get("id").map_err(query_error)?,
            content: NewArticle {
                slug: row.try_get("slug").map_err(query_error)?,
                title: row.try_get("title").map_err(query_error)?,
                excerpt: row.try_get("excerpt").map_err(query_error)?,
                body_markdown: row.try_get("body_markdown").map_err(query_error)?,
                tickers: row.try_get("tickers").map_err(query_error)?,
                tags: row.try_get("tags").map_err(query_error)?,
                is_breaking: row.try_get("is_breaking").map_err(query_error)?,
                model: row.try_get("model").map_err(query_error)?,
                prompt_version: row.try_get("prompt_version").map_err(query_error)?,
                market_snapshot,
                source_news: row.try_get("source_news").map_err(query_error)?,
                stock_score: row.try_get("stock_score").map_err(query_error)?,
                published_at: row.try_get("published_at").map_err(query_error)?,
            },
            created_at: row.try_get("created_at").map_err(query_error)?,
        })
    }
}

fn query_error(err: sqlx::Error) -> StorageError {
    StorageError::Query(err.to_string())
}

#[async_trait]
impl TickerStore for PostgresContentStore {
    async fn list_active_tickers(&self) -> Result<Vec<Ticker>> {
        let rows = sqlx::query(
            "SELECT symbol, is_active, priority, last_article_at FROM tickers WHERE is_active = TRUE",
        )
        .fetch_all(&*self.pool)
        .await
        .map_err(query_error)?;

        rows.iter().map(Self::row_to_ticker).collect()
    }

    async fn get_ticker(&self, symbol: &str) -> Result<Option<Ticker>> {
        let row = sqlx::query(
            "SELECT symbol, is_active, priority, last_article_at FROM tickers WHERE symbol = $1",
        )
        .bind(symbol)
        .fetch_optional(&*self.pool)
        .await
        .map_err(query_error)?;

        row.as_ref().map(Self::row_to_ticker).transpose()
    }

    async fn upsert_ticker(&self, ticker: Ticker) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO tickers (symbol, is_active, priority, last_article_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (symbol) DO UPDATE SET
                is_active = EXCLUDED.is_active,
                priority = EXCLUDED.priority,
                last_article_at = EXCLUDED.last_article_at
            "#,
        )
        .bind(&ticker.symbol)
        .bind(ticker.is_active)
        .bind(ticker.priority)
        .bind(ticker.last_article_at)
        .execute(&*self.pool)
        .await
        .map_err(query_error)?;
        Ok(())
    }

    async fn set_last_article_at(&self, symbol: &str, at: DateTime<Utc>) -> Result<bool> {
        let result = sqlx::query("UPDATE tickers SET last_article_at = $2 WHERE symbol = $1")
            .bind(symbol)
            .bind(at)
            .execute(&*self.pool)
            .await
            .map_err(query_error)?;
        Ok(result.rows_affected() > 0)
    }

    async fn seed_tickers(&self, tickers: Vec<Ticker>) -> Result<usize> {
        let mut inserted = 0;
        for ticker in tickers {
            let result = sqlx::query(
                r#"
                INSERT INTO tickers (symbol, is_active, priority, last_article_at)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT (symbol) DO NOTHING
                "#,
            )
            .bind(&ticker.symbol)
            .bind(ticker.is_active)
            .bind(ticker.priority)
            .bind(ticker.last_article_at)
            .execute(&*self.pool)
            .await
            .map_err(query_error)?;
            inserted += result.rows_affected() as usize;
        }
        Ok(inserted)
    }
}

#[async_trait]
impl ArticleStore for PostgresContentStore {
    async fn insert_article(&self, article: NewArticle) -> Result<Article> {
        let snapshot = article
            .market_snapshot
            .as_ref()
            .map(serde_json::to_value)
            .transpose()?;

        let row = sqlx::query(&format!(
            r#"
            INSERT INTO articles (
                id, slug, title, excerpt, body_markdown, tickers, tags, is_breaking,
                model, prompt_version, market_snapshot, source_news, stock_score, published_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING {ARTICLE_COLUMNS}
            "#
        ))
        .bind(uuid::Uuid::new_v4())
        .bind(&article.slug)
        .bind(&article.title)
        .bind(&article.excerpt)
        .bind(&article.body_markdown)
        .bind(&article.tickers)
        .bind(&article.tags)
        .bind(article.is_breaking)
        .bind(&article.model)
        .bind(&article.prompt_version)
        .bind(snapshot)
        .bind(&article.source_news)
        .bind(article.stock_score)
        .bind(article.published_at)
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db) = &e {
                if db.is_unique_violation() {
                    return StorageError::DuplicateSlug(article.slug.clone());
                }
            }
            query_error(e)
        })?;

        Self::row_to_article(&row)
    }

    async fn get_article_by_slug(&self, slug: &str) -> Result<Option<Article>> {
        let row = sqlx::query(&format!("SELECT {ARTICLE_COLUMNS} FROM articles WHERE slug = $1"))
            .bind(slug)
            .fetch_optional(&*self.pool)
            .await
            .map_err(query_error)?;

        row.as_ref().map(Self::row_to_article).transpose()
    }

    async fn count_routine_published(&self, window: UtcDayWindow) -> Result<u64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM articles
            WHERE is_breaking = FALSE AND published_at >= $1 AND published_at < $2
            "#,
        )
        .bind(window.start)
        .bind(window.end)
        .fetch_one(&*self.pool)
        .await
        .map_err(query_error)?;

        Ok(count.max(0) as u64)
    }
}
