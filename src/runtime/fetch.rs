use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use reqwest::Client;
use tokio::io::AsyncWriteExt;

use crate::platform::MediaLocator;

use super::RuntimeError;

/// Streams a resolved locator to disk.
#[derive(Clone)]
pub struct MediaFetcher {
    client: Client,
    download_dir: PathBuf,
}

impl MediaFetcher {
    pub fn new(download_dir: impl Into<PathBuf>) -> Result<Self, RuntimeError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(30))
            .pool_idle_timeout(Duration::from_secs(60))
            .tcp_keepalive(Duration::from_secs(30))
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36")
            .build()?;

        Ok(Self {
            client,
            download_dir: download_dir.into(),
        })
    }

    pub fn target_path(&self, task_id: &str, locator: &MediaLocator) -> PathBuf {
        self.download_dir.join(task_id).join(&locator.filename)
    }

    pub async fn fetch(&self, task_id: &str, locator: &MediaLocator) -> Result<PathBuf, RuntimeError> {
        let target = self.target_path(task_id, locator);
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let part = part_path_for(&target);
        if let Err(e) = self.stream_to(&locator.url, &part).await {
            let _ = tokio::fs::remove_file(&part).await;
            return Err(e);
        }

        tokio::fs::rename(&part, &target).await?;
        Ok(target)
    }

    async fn stream_to(&self, url: &str, path: &Path) -> Result<(), RuntimeError> {
        let mut response = self.client.get(url).send().await?.error_for_status()?;
        let mut file = tokio::fs::File::create(path).await?;

        while let Some(chunk) = response.chunk().await? {
            file.write_all(&chunk).await?;
        }
        file.flush().await?;
        Ok(())
    }
}

fn part_path_for(output: &Path) -> PathBuf {
    let mut part = output.as_os_str().to_owned();
    part.push(".part");
    PathBuf::from(part)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::MediaKind;

    #[test]
    fn test_target_path() {
        let fetcher = MediaFetcher::new("downloads").unwrap();
        let locator = MediaLocator {
            url: "https://cdn/a.m4a".into(),
            filename: "Clip.m4a".into(),
            kind: MediaKind::Audio,
        };

        assert_eq!(
            fetcher.target_path("task-1", &locator),
            PathBuf::from("downloads").join("task-1").join("Clip.m4a")
        );
        assert_eq!(
            part_path_for(Path::new("downloads/Clip.m4a")),
            PathBuf::from("downloads/Clip.m4a.part")
        );
    }
}
