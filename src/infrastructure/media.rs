//! # yt-dlp Media Resolver
//!
//! Implements `MediaResolver` by running the `yt-dlp` executable and reading its JSON output.
//! Free-text queries go through `ytsearch1:`; URLs are inspected directly.
//! Child processes are killed when the caller's timeout drops the future.

use async_trait::async_trait;
use serde_json::Value;
use std::process::Stdio;

use crate::domain::error::BotError;
use crate::domain::traits::MediaResolver;
use crate::domain::types::MediaInfo;

pub struct YtDlpResolver {
    binary: String,
}

impl YtDlpResolver {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Runs yt-dlp with `args` and parses stdout as a single JSON document.
    async fn run_json(&self, args: &[&str]) -> Result<Value, BotError> {
        let mut cmd = tokio::process::Command::new(&self.binary);
        cmd.args(["--dump-single-json", "--no-playlist", "--no-warnings", "--quiet"])
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        tracing::debug!("Running {} {:?}", self.binary, args);
        let output = cmd
            .output()
            .await
            .map_err(|e| BotError::external(format!("failed to run {}: {e}", self.binary)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::warn!("{} exited with {}: {}", self.binary, output.status, stderr.trim());
            return Err(BotError::external(format!(
                "media lookup failed ({})",
                output.status
            )));
        }

        serde_json::from_slice(&output.stdout)
            .map_err(|e| BotError::external(format!("unreadable media info: {e}")))
    }
}

pub fn is_url(query: &str) -> bool {
    query.starts_with("http://") || query.starts_with("https://")
}

fn str_field<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value.get(key).and_then(Value::as_str).filter(|s| !s.is_empty())
}

/// Reads the first hit of a `ytsearch1:` result, or the video itself for a URL lookup.
pub fn parse_media_info(value: &Value, from_url: Option<&str>) -> Option<MediaInfo> {
    let entry = match value.get("entries").and_then(Value::as_array) {
        Some(entries) => entries.first()?,
        None => value,
    };
    let id = str_field(entry, "id")?.to_string();
    let title = str_field(entry, "title").unwrap_or(&id).to_string();
    let url = from_url.map(|u| {
        str_field(entry, "webpage_url")
            .unwrap_or(u)
            .to_string()
    });
    Some(MediaInfo { id, url, title })
}

/// Reads the direct stream URL and title chosen by `-f bestaudio`.
pub fn parse_audio(value: &Value) -> Option<(String, String)> {
    let url = str_field(value, "url").or_else(|| {
        value
            .get("requested_formats")
            .and_then(Value::as_array)
            .and_then(|formats| formats.iter().find_map(|f| str_field(f, "url")))
    })?;
    let title = str_field(value, "title")?;
    Some((url.to_string(), title.to_string()))
}

#[async_trait]
impl MediaResolver for YtDlpResolver {
    async fn resolve(&self, query: &str) -> Result<Option<MediaInfo>, BotError> {
        let (target, from_url) = if is_url(query) {
            (query.to_string(), Some(query))
        } else {
            (format!("ytsearch1:{query}"), None)
        };
        let mut args = vec![target.as_str()];
        if from_url.is_none() {
            args.push("--flat-playlist");
        }
        let value = self.run_json(&args).await?;
        Ok(parse_media_info(&value, from_url))
    }

    async fn extract_audio(&self, id_or_url: &str) -> Result<(String, String), BotError> {
        let value = self.run_json(&["-f", "bestaudio/best", id_or_url]).await?;
        parse_audio(&value).ok_or_else(|| BotError::external("no audio stream found"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_is_url() {
        assert!(is_url("https://youtu.be/dQw4w9WgXcQ"));
        assert!(!is_url("never gonna give you up"));
    }

    #[test]
    fn test_parse_search_result() {
        let value = json!({
            "_type": "playlist",
            "entries": [
                {"id": "dQw4w9WgXcQ", "title": "Never Gonna Give You Up"},
                {"id": "other", "title": "Other"}
            ]
        });
        let info = parse_media_info(&value, None).unwrap();
        assert_eq!(info.id, "dQw4w9WgXcQ");
        assert_eq!(info.title, "Never Gonna Give You Up");
        assert!(info.url.is_none());

        let empty = json!({"_type": "playlist", "entries": []});
        assert!(parse_media_info(&empty, None).is_none());
    }

    #[test]
    fn test_parse_url_result() {
        let value = json!({
            "id": "abc",
            "title": "A Song",
            "webpage_url": "https://www.youtube.com/watch?v=abc"
        });
        let info = parse_media_info(&value, Some("https://youtu.be/abc")).unwrap();
        assert_eq!(info.url.as_deref(), Some("https://www.youtube.com/watch?v=abc"));
    }

    #[test]
    fn test_parse_audio() {
        let direct = json!({"title": "A Song", "url": "https://cdn.example/a.webm"});
        assert_eq!(
            parse_audio(&direct),
            Some(("https://cdn.example/a.webm".to_string(), "A Song".to_string()))
        );

        let merged = json!({
            "title": "A Song",
            "requested_formats": [{"url": "https://cdn.example/v.mp4"}]
        });
        assert_eq!(parse_audio(&merged).unwrap().0, "https://cdn.example/v.mp4");

        assert!(parse_audio(&json!({"title": "No stream"})).is_none());
    }

    #[tokio::test]
    async fn test_missing_binary_is_external_failure() {
        let resolver = YtDlpResolver::new("/nonexistent/yt-dlp");
        let err = resolver.resolve("anything").await.unwrap_err();
        assert!(matches!(err, BotError::External(_)));
    }
}
