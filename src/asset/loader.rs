use std::future::Future;
use std::path::PathBuf;

use crate::error::{InpError, Result};

/// Where puppet files come from. The whole file is read before it is returned.
pub trait AssetSource {
    fn fetch(&self, name: &str) -> impl Future<Output = Result<Vec<u8>>> + Send;
}

/// Fetches `<base_url>/<name>` over HTTP.
#[derive(Debug, Clone)]
pub struct HttpSource {
    base_url: String,
    client: reqwest::Client,
}

impl HttpSource {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(base_url, reqwest::Client::new())
    }

    pub fn with_client(base_url: &str, client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    pub fn url_for(&self, name: &str) -> String {
        format!("{}/{}", self.base_url, name)
    }
}

impl AssetSource for HttpSource {
    async fn fetch(&self, name: &str) -> Result<Vec<u8>> {
        let url = self.url_for(name);
        log::debug!("Downloading puppet from: {url}");

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(InpError::Network(format!(
                "HTTP {} from {}",
                response.status(),
                url
            )));
        }

        Ok(response.bytes().await?.to_vec())
    }
}

/// Reads `<dir>/<name>` from disk.
#[derive(Debug, Clone)]
pub struct FileSource {
    dir: PathBuf,
}

impl FileSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl AssetSource for FileSource {
    async fn fetch(&self, name: &str) -> Result<Vec<u8>> {
        let path = self.dir.join(name);
        log::debug!("Reading puppet from: {}", path.display());
        Ok(tokio::fs::read(&path).await?)
    }
}

/// Source picked at runtime from the configured location.
#[derive(Debug, Clone)]
pub enum AnySource {
    Http(HttpSource),
    File(FileSource),
}

impl AnySource {
    pub fn from_location(location: &str) -> Self {
        if location.starts_with("http://") || location.starts_with("https://") {
            AnySource::Http(HttpSource::new(location))
        } else {
            AnySource::File(FileSource::new(location))
        }
    }
}

impl AssetSource for AnySource {
    async fn fetch(&self, name: &str) -> Result<Vec<u8>> {
        match self {
            AnySource::Http(source) => source.fetch(name).await,
            AnySource::File(source) => source.fetch(name).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Answers `GET /puppets/aka.tga.inp` with a body and anything else with 404,
    /// one request per connection.
    async fn serve_puppets() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            loop {
                let Ok((mut stream, _)) = listener.accept().await else {
                    return;
                };
                tokio::spawn(async move {
                    let mut request = Vec::new();
                    let mut buf = [0u8; 1024];
                    while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                        match stream.read(&mut buf).await {
                            Ok(0) | Err(_) => return,
                            Ok(n) => request.extend_from_slice(&buf[..n]),
                        }
                    }
                    let found = request.starts_with(b"GET /puppets/aka.tga.inp ");
                    let (status, body): (&str, &[u8]) = if found {
                        ("200 OK", &b"TRNSRTS\0puppet"[..])
                    } else {
                        ("404 Not Found", &b"missing"[..])
                    };
                    let head = format!(
                        "HTTP/1.1 {status}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                        body.len()
                    );
                    let _ = stream.write_all(head.as_bytes()).await;
                    let _ = stream.write_all(body).await;
                    let _ = stream.shutdown().await;
                });
            }
        });
        format!("http://{addr}/puppets/")
    }

    fn local_source(base_url: &str) -> HttpSource {
        let client = reqwest::Client::builder().no_proxy().build().unwrap();
        HttpSource::with_client(base_url, client)
    }

    #[tokio::test]
    async fn http_source_returns_body_and_rejects_404() {
        let source = local_source(&serve_puppets().await);

        let bytes = source.fetch("aka.tga.inp").await.unwrap();
        assert_eq!(bytes, b"TRNSRTS\0puppet");

        let missing = source.fetch("midori.tga.inp").await;
        match missing {
            Err(InpError::Network(message)) => assert!(message.contains("404"), "{message}"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn http_source_reports_refused_connection() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let source = local_source(&format!("http://{addr}"));
        let result = source.fetch("aka.tga.inp").await;
        assert!(matches!(result, Err(InpError::Network(_))));
    }

    #[test]
    fn location_picks_source_kind() {
        assert!(matches!(
            AnySource::from_location("https://example.org/puppets/"),
            AnySource::Http(_)
        ));
        assert!(matches!(AnySource::from_location("./puppets"), AnySource::File(_)));
    }

    #[test]
    fn http_url_joins_without_double_slash() {
        let source = HttpSource::new("https://example.org/puppets/");
        assert_eq!(
            source.url_for("aka.tga.inp"),
            "https://example.org/puppets/aka.tga.inp"
        );
    }

    #[tokio::test]
    async fn file_source_reads_whole_file() {
        let dir = std::env::temp_dir().join(format!("inpvis-file-source-{}", std::process::id()));
        tokio::fs::create_dir_all(&dir).await.unwrap();
        tokio::fs::write(dir.join("aka.tga.inp"), b"puppet bytes")
            .await
            .unwrap();

        let source = AnySource::from_location(dir.to_str().unwrap());
        let bytes = source.fetch("aka.tga.inp").await.unwrap();
        assert_eq!(bytes, b"puppet bytes");

        let missing = source.fetch("nope.tga.inp").await;
        assert!(matches!(missing, Err(InpError::Io(_))));

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }
}
