// src/fetch/mod.rs

pub mod urls;

use futures::future::try_join_all;
use reqwest::Client;
use std::future::Future;
use tokio::time::Instant;
use tracing::{debug, error, info, instrument};
use url::Url;

use crate::error::{EvError, EvResult};
use crate::extract::{extract_rows, Row};

/// Where region data files come from.
pub trait DataSource {
    /// Raw text of `data-<region>.js`. Any failure is a fetch failure.
    fn fetch_region(&self, region: &str) -> impl Future<Output = EvResult<String>> + Send;
}

/// Fetches data files over HTTP from a base URL.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
    base: Url,
}

impl HttpSource {
    pub fn new(client: Client, base: Url) -> Self {
        Self { client, base }
    }

    pub fn base(&self) -> &Url {
        &self.base
    }
}

impl DataSource for HttpSource {
    #[instrument(level = "debug", skip(self))]
    async fn fetch_region(&self, region: &str) -> EvResult<String> {
        let url = urls::data_url(&self.base, region)?;
        let fail = |status: Option<u16>, reason: String| {
            error!(%url, ?status, %reason, "fetch failed");
            EvError::Fetch {
                region: region.to_string(),
                url: url.to_string(),
                status,
                reason,
            }
        };

        debug!(%url, "fetching data file");
        let resp = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| fail(e.status().map(|s| s.as_u16()), e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(fail(Some(status.as_u16()), format!("HTTP error: {}", status)));
        }

        resp.text()
            .await
            .map_err(|e| fail(Some(status.as_u16()), format!("reading body: {}", e)))
    }
}

/// One region's extracted rows.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionRows {
    pub region: String,
    pub rows: Vec<Row>,
}

/// Fetch and parse every region concurrently. All regions must succeed:
/// the first failure aborts the whole batch and nothing partial is returned.
#[instrument(level = "info", skip(source))]
pub async fn load_regions<S: DataSource>(source: &S, regions: &[String]) -> EvResult<Vec<RegionRows>> {
    if regions.is_empty() {
        return Err(EvError::EmptySelection);
    }

    let start = Instant::now();
    let tasks = regions.iter().map(|region| async move {
        let text = source.fetch_region(region).await?;
        let rows = extract_rows(&text, region);
        if rows.is_empty() {
            info!(region = %region, "no resolvable data");
        }
        Ok::<_, EvError>(RegionRows {
            region: region.clone(),
            rows,
        })
    });

    let loaded = try_join_all(tasks).await?;
    info!(
        regions = loaded.len(),
        rows = loaded.iter().map(|r| r.rows.len()).sum::<usize>(),
        elapsed = ?start.elapsed(),
        "loaded regions"
    );
    Ok(loaded)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::HashMap;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// In-memory source: a missing region answers like a 404.
    #[derive(Default)]
    pub(crate) struct MemorySource {
        files: HashMap<String, String>,
    }

    impl MemorySource {
        pub(crate) fn with(mut self, region: &str, text: &str) -> Self {
            self.files.insert(region.to_string(), text.to_string());
            self
        }
    }

    impl DataSource for MemorySource {
        async fn fetch_region(&self, region: &str) -> EvResult<String> {
            self.files
                .get(region)
                .cloned()
                .ok_or_else(|| EvError::Fetch {
                    region: region.to_string(),
                    url: format!("memory://data-{}.js", region),
                    status: Some(404),
                    reason: "HTTP error: 404 Not Found".to_string(),
                })
        }
    }

    pub(crate) fn insert(region: &str, period: &str, ty: &str, body: &str) -> String {
        format!(
            "db.insert(db.countries.{}, \"{}\", db.dsTypes.{}, \"\", {{ {} }});\n",
            region, period, ty, body
        )
    }

    fn codes(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    /// Serve canned HTTP responses keyed by request path.
    async fn serve(routes: Vec<(&'static str, u16, &'static str)>) -> Url {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            loop {
                let (mut sock, _) = match listener.accept().await {
                    Ok(conn) => conn,
                    Err(_) => return,
                };
                let mut buf = vec![0u8; 4096];
                let n = sock.read(&mut buf).await.unwrap_or(0);
                let request = String::from_utf8_lossy(&buf[..n]).to_string();
                let path = request.split_whitespace().nth(1).unwrap_or("").to_string();
                let (status, body) = routes
                    .iter()
                    .find(|(p, _, _)| *p == path)
                    .map(|(_, s, b)| (*s, *b))
                    .unwrap_or((404, "not found"));
                let reply = format!(
                    "HTTP/1.1 {} X\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                let _ = sock.write_all(reply.as_bytes()).await;
                let _ = sock.shutdown().await;
            }
        });
        Url::parse(&format!("http://{}/data", addr)).unwrap()
    }

    #[tokio::test]
    async fn http_source_reads_body() {
        let base = serve(vec![(
            "/data/data-US.js",
            200,
            r#"db.insert(db.countries.US, "2017-Q1", db.dsTypes.ElectricCarsTotal, "", { "other": 21415 });"#,
        )])
        .await;
        let source = HttpSource::new(Client::new(), base);
        let text = source.fetch_region("US").await.unwrap();
        assert_eq!(
            extract_rows(&text, "US"),
            vec![Row {
                period: "2017-Q1".to_string(),
                value: 21415.0
            }]
        );
    }

    #[tokio::test]
    async fn http_source_maps_404_to_fetch_failure() {
        let base = serve(vec![]).await;
        let source = HttpSource::new(Client::new(), base);
        let err = source.fetch_region("XX").await.unwrap_err();
        assert_eq!(err.status(), Some(404));
        match err {
            EvError::Fetch { region, url, .. } => {
                assert_eq!(region, "XX");
                assert!(url.ends_with("/data/data-XX.js"), "{}", url);
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[tokio::test]
    async fn load_keeps_selection_order() {
        let source = MemorySource::default()
            .with("US", &insert("US", "2020", "ElectricCarsTotal", r#""a": 1"#))
            .with("DE", &insert("DE", "2021", "ElectricCarsByBrand", r#""b": 2"#))
            .with("CN", "// nothing here\n");
        let loaded = load_regions(&source, &codes(&["DE", "CN", "US"]))
            .await
            .unwrap();
        let order: Vec<_> = loaded.iter().map(|r| r.region.as_str()).collect();
        assert_eq!(order, vec!["DE", "CN", "US"]);
        assert!(loaded[1].rows.is_empty());
        assert_eq!(loaded[2].rows[0].value, 1.0);
    }

    #[tokio::test]
    async fn one_failed_fetch_fails_the_batch() {
        let source = MemorySource::default()
            .with("US", &insert("US", "2020", "ElectricCarsTotal", r#""a": 1"#));
        let err = load_regions(&source, &codes(&["US", "XX"])).await.unwrap_err();
        assert!(matches!(err, EvError::Fetch { ref region, .. } if region == "XX"));
    }

    #[tokio::test]
    async fn empty_selection_is_rejected() {
        let err = load_regions(&MemorySource::default(), &[]).await.unwrap_err();
        assert!(matches!(err, EvError::EmptySelection));
    }
}
