//! Primary-then-fallback data fetching
//!
//! Catalog reads try the database once and, when it fails or has nothing to
//! show, serve a static payload of the same shape instead.

use std::fmt::Display;
use std::future::Future;
use tracing::{info, warn};

/// Where a fetched payload came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    Database,
    Fallback,
}

/// A payload together with its source
#[derive(Debug, Clone)]
pub struct Fetched<T> {
    pub data: T,
    pub source: DataSource,
}

impl<T> Fetched<T> {
    pub fn is_fallback(&self) -> bool {
        self.source == DataSource::Fallback
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Fetched<U> {
        Fetched {
            data: f(self.data),
            source: self.source,
        }
    }
}

/// Results that can be "empty" and therefore worth replacing with fallback data
pub trait MaybeEmpty {
    fn is_empty_result(&self) -> bool;
}

impl<T> MaybeEmpty for Vec<T> {
    fn is_empty_result(&self) -> bool {
        self.is_empty()
    }
}

impl<T> MaybeEmpty for Option<T> {
    fn is_empty_result(&self) -> bool {
        self.is_none()
    }
}

/// Await `primary` once; on error or an empty result, return `fallback()`.
///
/// `label` names the query in the logs.
pub async fn with_fallback<T, E, Fut, F>(label: &str, primary: Fut, fallback: F) -> Fetched<T>
where
    T: MaybeEmpty,
    E: Display,
    Fut: Future<Output = Result<T, E>>,
    F: FnOnce() -> T,
{
    match primary.await {
        Ok(data) if !data.is_empty_result() => Fetched {
            data,
            source: DataSource::Database,
        },
        Ok(_) => {
            info!("{}: database returned no rows, serving fallback data", label);
            Fetched {
                data: fallback(),
                source: DataSource::Fallback,
            }
        }
        Err(e) => {
            warn!("{}: database query failed, serving fallback data: {}", label, e);
            Fetched {
                data: fallback(),
                source: DataSource::Fallback,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn returns_primary_data_when_present() {
        let fetched = with_fallback(
            "numbers",
            async { Ok::<_, String>(vec![1, 2, 3]) },
            || vec![9],
        )
        .await;

        assert_eq!(fetched.data, vec![1, 2, 3]);
        assert_eq!(fetched.source, DataSource::Database);
    }

    #[tokio::test]
    async fn falls_back_on_error() {
        let fetched = with_fallback(
            "numbers",
            async { Err::<Vec<i32>, _>("connection refused") },
            || vec![9],
        )
        .await;

        assert_eq!(fetched.data, vec![9]);
        assert!(fetched.is_fallback());
    }

    #[tokio::test]
    async fn falls_back_on_empty_vec() {
        let fetched =
            with_fallback("numbers", async { Ok::<_, String>(Vec::<i32>::new()) }, || {
                vec![7, 8]
            })
            .await;

        assert_eq!(fetched.data, vec![7, 8]);
        assert!(fetched.is_fallback());
    }

    #[tokio::test]
    async fn falls_back_on_missing_row() {
        let fetched =
            with_fallback("one", async { Ok::<Option<&str>, String>(None) }, || {
                Some("static")
            })
            .await;

        assert_eq!(fetched.data, Some("static"));
        assert!(fetched.is_fallback());
    }

    #[tokio::test]
    async fn fallback_closure_is_not_called_on_success() {
        let fetched = with_fallback(
            "one",
            async { Ok::<_, String>(Some(1)) },
            || -> Option<i32> { panic!("fallback should not run") },
        )
        .await;

        assert_eq!(fetched.map(|v| v.unwrap_or_default()).data, 1);
    }
}
