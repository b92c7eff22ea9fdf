//! Test harness with testcontainers for integration testing.
//!
//! A single Postgres container is shared across the whole test run. Each
//! test gets its own freshly-migrated database inside that container, so
//! row counts and pagination assertions never see another test's data.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use sqlx::PgPool;
use test_context::AsyncTestContext;
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, ImageExt};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;
use uuid::Uuid;

use shelter_core::domains::auth::models::User;
use shelter_core::domains::auth::JwtService;
use shelter_core::kernel::Notifier;
use shelter_core::server::build_app;

/// Signing secret and issuer used by every test app and token helper.
pub const TEST_JWT_SECRET: &str = "test_secret_key";
pub const TEST_JWT_ISSUER: &str = "test-issuer";

/// Shared test infrastructure that persists across all tests.
/// The container is started once and reused.
struct SharedTestInfra {
    admin_url: String,
    base_url: String,
    // Keep the container alive for the entire test run
    _postgres: ContainerAsync<Postgres>,
}

/// Global shared infrastructure - initialized once, reused by all tests.
static SHARED_INFRA: OnceCell<SharedTestInfra> = OnceCell::const_new();

impl SharedTestInfra {
    /// Initialize shared infrastructure (container only; migrations run
    /// per test database).
    async fn init() -> Result<Self> {
        // Initialize tracing subscriber to respect RUST_LOG environment variable.
        // Uses try_init() to avoid panicking if already initialized.
        // Run tests with: RUST_LOG=debug cargo test -- --nocapture
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let postgres = Postgres::default()
            .with_tag("16")
            .with_cmd(["-c", "max_connections=200"])
            .start()
            .await
            .context("Failed to start Postgres container")?;

        let pg_host = postgres.get_host().await?;
        let pg_port = postgres.get_host_port_ipv4(5432).await?;
        let admin_url = format!(
            "postgresql://postgres:postgres@{}:{}/postgres",
            pg_host, pg_port
        );
        let base_url = format!("postgresql://postgres:postgres@{}:{}", pg_host, pg_port);

        Ok(Self {
            admin_url,
            base_url,
            _postgres: postgres,
        })
    }

    /// Get or initialize the shared infrastructure.
    pub(super) async fn get() -> &'static Self {
        SHARED_INFRA
            .get_or_init(|| async {
                Self::init()
                    .await
                    .expect("Failed to initialize shared test infrastructure")
            })
            .await
    }
}

/// Test harness that manages test infrastructure.
///
/// The Postgres container is shared; the database is per test.
///
/// # Example using test-context
///
/// ```ignore
/// use test_context::test_context;
///
/// #[test_context(TestHarness)]
/// #[tokio::test]
/// async fn my_test(ctx: &TestHarness) {
///     let app = ctx.app();
///     // ... test code
/// }
/// ```
pub struct TestHarness {
    /// Pool on this test's private database - use this for fixtures.
    pub db_pool: PgPool,
}

impl AsyncTestContext for TestHarness {
    async fn setup() -> Self {
        Self::new().await.expect("Failed to create test harness")
    }

    async fn teardown(self) {
        // Database pool is automatically dropped; the throwaway database
        // is cleaned up with the container.
    }
}

impl TestHarness {
    /// Creates a new test harness with a private, migrated database.
    ///
    /// This will:
    /// 1. Get or initialize the shared PostgreSQL container
    /// 2. Create a throwaway database for this test
    /// 3. Run migrations and connect a fresh pool to it
    pub async fn new() -> Result<Self> {
        let infra = SharedTestInfra::get().await;

        let db_name = format!("test_{}", Uuid::new_v4().simple());

        let admin_pool = PgPool::connect(&infra.admin_url)
            .await
            .context("Failed to connect to Postgres for database creation")?;
        sqlx::query(&format!("CREATE DATABASE {}", db_name))
            .execute(&admin_pool)
            .await
            .context("Failed to create test database")?;
        admin_pool.close().await;

        let db_pool = PgPool::connect(&format!("{}/{}", infra.base_url, db_name))
            .await
            .context("Failed to connect to test database")?;

        sqlx::migrate!("./migrations")
            .run(&db_pool)
            .await
            .context("Failed to run migrations")?;

        Ok(Self { db_pool })
    }

    /// Build the full application router against this test's database.
    ///
    /// Notifications are disabled so no test ever reaches for the network.
    pub fn app(&self) -> Router {
        build_app(
            self.db_pool.clone(),
            TEST_JWT_SECRET,
            TEST_JWT_ISSUER.to_string(),
            vec!["http://localhost:3000".to_string()],
            Arc::new(Notifier::disabled()),
        )
    }

    /// Mint a bearer token for a fixture user, signed the way `app()`
    /// expects.
    pub fn token_for(&self, user: &User) -> String {
        JwtService::new(TEST_JWT_SECRET, TEST_JWT_ISSUER.to_string())
            .create_token(user.id, user.role)
            .expect("Failed to create test token")
    }
}
