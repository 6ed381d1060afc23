//! Shared fixtures for service tests

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

use crate::rides::models::{CreateRideRequest, Ride};
use crate::rides::services::RideService;
use crate::users::models::{CreateUserRequest, User};
use crate::users::services::UserService;

use super::migrations::run_migrations;

/// In-memory database with the full schema applied.
/// A single connection keeps every query on the same memory database.
pub async fn setup_test_db() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();

    run_migrations(&pool, false).await.unwrap();
    pool
}

/// File-backed database served by several connections, for tests that need
/// real lock contention between transactions. The files go when it drops.
pub struct FileTestDb {
    pub pool: SqlitePool,
    path: PathBuf,
}

impl Drop for FileTestDb {
    fn drop(&mut self) {
        for suffix in ["", "-journal", "-wal", "-shm"] {
            let _ = std::fs::remove_file(format!("{}{}", self.path.display(), suffix));
        }
    }
}

pub async fn setup_file_test_db() -> FileTestDb {
    static NEXT: AtomicUsize = AtomicUsize::new(0);
    let path = std::env::temp_dir().join(format!(
        "brocab-test-{}-{}.db",
        std::process::id(),
        NEXT.fetch_add(1, Ordering::Relaxed)
    ));
    let _ = std::fs::remove_file(&path);

    let options = SqliteConnectOptions::new()
        .filename(&path)
        .create_if_missing(true)
        .busy_timeout(Duration::from_secs(10));
    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect_with(options)
        .await
        .unwrap();

    run_migrations(&pool, false).await.unwrap();
    FileTestDb { pool, path }
}

/// Fixed reference instant used by time-sensitive tests
pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 10, 8, 0, 0).unwrap()
}

pub async fn seed_user(pool: &SqlitePool, uid: &str, name: &str) -> User {
    let (user, _) = UserService::new(pool.clone())
        .create_if_absent(
            uid,
            CreateUserRequest {
                name: name.to_string(),
                email: format!("{}@campus.edu", uid),
                phone: "9876543210".to_string(),
                gender: Some("female".to_string()),
            },
        )
        .await
        .unwrap();
    user
}

pub async fn seed_ride(pool: &SqlitePool, leader: &User, date: &str, seats: i64) -> Ride {
    RideService::new(pool.clone())
        .create_ride(
            leader,
            CreateRideRequest {
                origin: "College Campus".to_string(),
                destination: "City Airport".to_string(),
                date: date.to_string(),
                time: "15:30".to_string(),
                seats,
                price: 250.0,
            },
        )
        .await
        .unwrap()
}
