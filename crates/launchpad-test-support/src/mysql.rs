//! Helpers for acquiring disposable MySQL databases for integration tests.

use std::net::TcpListener;
use std::path::Path;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result, bail};
use mysql::prelude::Queryable;
use mysql::{Conn, Opts};
use url::Url;

const IMAGE: &str = "mysql:8.4";
const READY_ATTEMPTS: u32 = 90;
const READY_INTERVAL: Duration = Duration::from_secs(1);

/// Handle to a disposable MySQL database used in tests.
pub struct TestDatabase {
    connection_string: String,
    container: Option<String>,
    cleanup: Option<DbCleanup>,
}

impl TestDatabase {
    /// Connection string that can be passed to `sqlx` or other MySQL clients.
    #[must_use]
    pub fn connection_string(&self) -> &str {
        &self.connection_string
    }
}

impl Drop for TestDatabase {
    fn drop(&mut self) {
        if let Some(cleanup) = &self.cleanup {
            let _ = drop_database(cleanup);
        }
        if let Some(container) = &self.container {
            let _ = Command::new("docker")
                .args(["rm", "-f", container])
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .status();
        }
    }
}

struct DbCleanup {
    admin_url: String,
    database: String,
}

/// Acquire a disposable MySQL database.
///
/// This prefers an externally supplied connection string via
/// `LAUNCHPAD_TEST_DATABASE_URL` (a unique database is created inside that
/// server per call). When unset, a throwaway `mysql:8.4` container is
/// started via Docker. Tests can decide whether to skip when this helper
/// returns an error.
///
/// # Errors
///
/// Returns an error if no external URL is provided and Docker is
/// unavailable or the server fails to become ready.
pub fn start_mysql() -> Result<TestDatabase> {
    if let Ok(url) = std::env::var("LAUNCHPAD_TEST_DATABASE_URL") {
        let created = create_unique_database(&url)?;
        return Ok(TestDatabase {
            connection_string: created.connection_string,
            container: None,
            cleanup: Some(DbCleanup {
                admin_url: created.admin_url,
                database: created.database,
            }),
        });
    }

    start_docker_mysql()
}

/// Whether a Docker daemon looks reachable from this process. Checks the
/// `DOCKER_HOST` override first, then the default socket, then the CLI.
#[must_use]
pub fn docker_available() -> bool {
    if let Ok(host) = std::env::var("DOCKER_HOST") {
        if let Some(path) = host.strip_prefix("unix://") {
            return Path::new(path).exists();
        }
        return true;
    }

    Path::new("/var/run/docker.sock").exists()
        || Command::new("docker")
            .args(["info"])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|status| status.success())
            .unwrap_or(false)
}

fn start_docker_mysql() -> Result<TestDatabase> {
    if !docker_available() {
        bail!("docker is required for MySQL tests");
    }

    let port = reserve_port()?;
    let container = unique_name("launchpad-mysql");
    let publish = format!("127.0.0.1:{port}:3306");

    let status = Command::new("docker")
        .args([
            "run",
            "-d",
            "--rm",
            "--name",
            &container,
            "-e",
            "MYSQL_ALLOW_EMPTY_PASSWORD=yes",
            "-p",
            &publish,
            IMAGE,
        ])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .context("failed to run docker")?;
    if !status.success() {
        bail!("docker run exited with failure status");
    }

    let base_url = format!("mysql://root@127.0.0.1:{port}/mysql");
    if let Err(err) = wait_for_ready(&base_url) {
        let _ = Command::new("docker")
            .args(["rm", "-f", &container])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();
        return Err(err);
    }

    let created = create_unique_database(&base_url)?;

    Ok(TestDatabase {
        connection_string: created.connection_string,
        container: Some(container),
        cleanup: None,
    })
}

fn reserve_port() -> Result<u16> {
    let listener = TcpListener::bind("127.0.0.1:0").context("failed to reserve port")?;
    let port = listener
        .local_addr()
        .context("failed to read listener address")?
        .port();
    drop(listener);
    Ok(port)
}

fn wait_for_ready(url: &str) -> Result<()> {
    let opts = Opts::from_url(url).context("invalid mysql connection url")?;
    for _ in 0..READY_ATTEMPTS {
        if let Ok(mut conn) = Conn::new(opts.clone()) {
            if conn.query_drop("SELECT 1").is_ok() {
                return Ok(());
            }
        }
        thread::sleep(READY_INTERVAL);
    }

    bail!("mysql server did not become ready in time")
}

struct CreatedDatabase {
    connection_string: String,
    admin_url: String,
    database: String,
}

fn create_unique_database(base_url: &str) -> Result<CreatedDatabase> {
    let parsed = Url::parse(base_url).context("invalid mysql connection url")?;
    let db_name = unique_name("launchpad_test").replace('-', "_");

    let mut database_url = parsed.clone();
    database_url.set_path(&format!("/{db_name}"));

    let mut admin_url = parsed;
    admin_url.set_path("/mysql");
    let admin_url = admin_url.to_string();

    let opts = Opts::from_url(&admin_url).context("invalid mysql admin url")?;
    let mut conn = Conn::new(opts).context("failed to connect to mysql server")?;
    conn.query_drop(format!("CREATE DATABASE `{db_name}`"))
        .context("failed to issue CREATE DATABASE")?;

    Ok(CreatedDatabase {
        connection_string: database_url.to_string(),
        admin_url,
        database: db_name,
    })
}

fn drop_database(cleanup: &DbCleanup) -> Result<()> {
    let opts = Opts::from_url(&cleanup.admin_url).context("invalid mysql admin url")?;
    let mut conn = Conn::new(opts).context("failed to connect to mysql server")?;
    conn.query_drop(format!("DROP DATABASE IF EXISTS `{}`", cleanup.database))
        .context("failed to drop test database")?;
    Ok(())
}

fn unique_name(prefix: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let pid = std::process::id();
    format!("{prefix}-{pid}-{nanos}")
}
