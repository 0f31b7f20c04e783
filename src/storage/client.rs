use async_trait::async_trait;
use log::debug;
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use snafu::{ensure, ResultExt};

use super::{
    AuthProvider, FileEntry, InvalidUrlSnafu, RequestSnafu, StatusSnafu, StorageClient,
    StorageError, User,
};

/// Storage client for the app's file and key-value backend.
#[derive(Debug)]
pub struct HttpStorageClient {
    client: Client,
    base_url: Url,
    token: Option<String>,
}

impl HttpStorageClient {
    pub fn new(mut base_url: Url, token: Option<String>) -> Result<HttpStorageClient, StorageError> {
        // Url::join drops the last segment unless the base ends in a slash
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = Client::builder().build().context(RequestSnafu {
            url: base_url.as_str(),
        })?;

        Ok(HttpStorageClient {
            client,
            base_url,
            token,
        })
    }

    fn endpoint(&self, endpoint: &str) -> Result<Url, StorageError> {
        self.base_url
            .join(endpoint)
            .context(InvalidUrlSnafu { endpoint })
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, url: &Url, request: RequestBuilder) -> Result<Response, StorageError> {
        debug!("Sending request to {}", url);
        self.authorize(request)
            .send()
            .await
            .context(RequestSnafu { url: url.as_str() })
    }

    async fn send_checked(
        &self,
        url: &Url,
        request: RequestBuilder,
    ) -> Result<Response, StorageError> {
        let response = self.send(url, request).await?;
        let status = response.status();
        ensure!(
            status.is_success(),
            StatusSnafu {
                url: url.as_str(),
                status
            }
        );
        Ok(response)
    }
}

#[async_trait]
impl StorageClient for HttpStorageClient {
    async fn read_directory(&self, path: &str) -> Result<Vec<FileEntry>, StorageError> {
        let url = self.endpoint("fs/readdir")?;
        let request = self.client.get(url.clone()).query(&[("path", path)]);
        let response = self.send_checked(&url, request).await?;

        response
            .json::<Vec<FileEntry>>()
            .await
            .context(RequestSnafu { url: url.as_str() })
    }

    async fn delete_file(&self, path: &str) -> Result<(), StorageError> {
        let url = self.endpoint("fs/item")?;
        let request = self.client.delete(url.clone()).query(&[("path", path)]);
        self.send_checked(&url, request).await?;
        Ok(())
    }

    async fn delete_key(&self, key: &str) -> Result<(), StorageError> {
        let url = self.endpoint("kv/item")?;
        let request = self.client.delete(url.clone()).query(&[("key", key)]);
        let response = self.send(&url, request).await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            debug!("No key stored for {}", key);
            return Ok(());
        }
        ensure!(
            status.is_success(),
            StatusSnafu {
                url: url.as_str(),
                status
            }
        );
        Ok(())
    }

    async fn flush_all_keys(&self) -> Result<(), StorageError> {
        let url = self.endpoint("kv/flush")?;
        let request = self.client.post(url.clone());
        self.send_checked(&url, request).await?;
        Ok(())
    }
}

#[async_trait]
impl AuthProvider for HttpStorageClient {
    async fn current_user(&self) -> Result<Option<User>, StorageError> {
        if self.token.is_none() {
            return Ok(None);
        }

        let url = self.endpoint("whoami")?;
        let request = self.client.get(url.clone());
        let response = self.send(&url, request).await?;
        let status = response.status();

        if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
            return Ok(None);
        }
        ensure!(
            status.is_success(),
            StatusSnafu {
                url: url.as_str(),
                status
            }
        );

        let user = response
            .json::<User>()
            .await
            .context(RequestSnafu { url: url.as_str() })?;
        Ok(Some(user))
    }
}
