//! Metrics sink client
//!
//! The status server ingests newline-delimited JSON records over a plain TCP
//! connection, one record per metric update:
//!
//! ```text
//! {"metric":"placed","value":3.0,"timestamp":"2026-10-19T12:00:00.123456Z"}
//! ```

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tracing::debug;

use crate::error::SinkError;

#[derive(Debug, Serialize)]
struct StatusRecord<'a> {
    metric: &'a str,
    value: f64,
    timestamp: DateTime<Utc>,
}

/// Connection to the status server
#[derive(Debug)]
pub struct StatusClient {
    addr: String,
    stream: TcpStream,
}

impl StatusClient {
    /// Connect to the status server at `addr` (`host:port`)
    pub async fn connect(addr: &str) -> Result<Self, SinkError> {
        let stream = TcpStream::connect(addr)
            .await
            .map_err(|source| SinkError::Connect {
                addr: addr.to_string(),
                source,
            })?;
        stream.set_nodelay(true)?;

        debug!("Connected to status server at {}", addr);

        Ok(Self {
            addr: addr.to_string(),
            stream,
        })
    }

    pub fn addr(&self) -> &str {
        &self.addr
    }

    /// Record `value` for `metric` as of `timestamp`
    pub async fn set(
        &mut self,
        metric: &str,
        value: f64,
        timestamp: DateTime<Utc>,
    ) -> Result<(), SinkError> {
        let mut line = serde_json::to_vec(&StatusRecord {
            metric,
            value,
            timestamp,
        })?;
        line.push(b'\n');

        self.stream.write_all(&line).await?;
        self.stream.flush().await?;

        Ok(())
    }

    /// Flush and close the connection
    pub async fn close(mut self) -> Result<(), SinkError> {
        self.stream.flush().await?;
        self.stream.shutdown().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tokio::io::{AsyncBufReadExt, BufReader};
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn test_set_writes_json_lines() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();

        let server = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            let mut lines = BufReader::new(socket).lines();
            let mut received = Vec::new();
            while let Some(line) = lines.next_line().await.unwrap() {
                received.push(line);
            }
            received
        });

        let ts = Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap();
        let mut client = StatusClient::connect(&addr).await.unwrap();
        assert_eq!(client.addr(), addr);
        client.set("placed", 3.0, ts).await.unwrap();
        client.set("running", 2.0, ts).await.unwrap();
        client.close().await.unwrap();

        let received = server.await.unwrap();
        assert_eq!(received.len(), 2);

        let first: serde_json::Value = serde_json::from_str(&received[0]).unwrap();
        assert_eq!(first["metric"], "placed");
        assert_eq!(first["value"], 3.0);
        assert_eq!(first["timestamp"], "2026-10-19T12:00:00Z");

        let second: serde_json::Value = serde_json::from_str(&received[1]).unwrap();
        assert_eq!(second["metric"], "running");
    }

    #[tokio::test]
    async fn test_connect_refused() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        drop(listener);

        let err = StatusClient::connect(&addr).await.unwrap_err();
        assert!(matches!(err, SinkError::Connect { .. }));
        assert!(err.to_string().contains(&addr));
    }
}
