//! # HTTP User Resource
//!
//! [`UserResource`] over a JSON REST collection: `GET base?_page=&_limit=`,
//! `POST base`, `PUT base/{id}`, `DELETE base/{id}`. No timeout or retry is
//! layered on top of the client defaults.

use crate::model::{RecordDraft, RecordId, RecordPatch};
use crate::remote::wire::{self, UserBody, UserDto, TOTAL_COUNT_HEADER};
use crate::remote::{ListPage, RemoteError, UserResource};
use async_trait::async_trait;
use reqwest::{Client, Response};
use tracing::{debug, instrument};
use url::Url;

/// Talks to the remote collection at `base_url`.
#[derive(Debug, Clone)]
pub struct HttpUserResource {
    client: Client,
    base_url: Url,
}

impl HttpUserResource {
    pub fn new(base_url: Url) -> Result<Self, RemoteError> {
        let client = Client::builder().build()?;
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn item_url(&self, id: &RecordId) -> Result<Url, RemoteError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| RemoteError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .push(id.as_str());
        Ok(url)
    }
}

fn ensure_success(response: Response) -> Result<Response, RemoteError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(RemoteError::Status {
            status: status.as_u16(),
            url: response.url().to_string(),
        })
    }
}

async fn read_echo(response: Response) -> Result<RecordPatch, RemoteError> {
    let body = response.bytes().await?;
    Ok(wire::parse_echo(&body)?)
}

#[async_trait]
impl UserResource for HttpUserResource {
    #[instrument(skip(self))]
    async fn list(&self, page: u32, limit: usize) -> Result<ListPage, RemoteError> {
        let response = self
            .client
            .get(self.base_url.clone())
            .query(&[("_page", page.to_string()), ("_limit", limit.to_string())])
            .send()
            .await?;
        let response = ensure_success(response)?;

        let total_count = wire::parse_total_count(
            response
                .headers()
                .get(TOTAL_COUNT_HEADER)
                .and_then(|v| v.to_str().ok()),
        );
        let users: Vec<UserDto> = response.json().await?;
        debug!(received = users.len(), ?total_count, "Listed");

        Ok(ListPage {
            records: users.into_iter().map(UserDto::into_record).collect(),
            total_count,
        })
    }

    #[instrument(skip(self))]
    async fn create(&self, draft: RecordDraft) -> Result<RecordPatch, RemoteError> {
        let response = self
            .client
            .post(self.base_url.clone())
            .json(&UserBody::from(&draft))
            .send()
            .await?;
        read_echo(ensure_success(response)?).await
    }

    #[instrument(skip(self))]
    async fn update(&self, id: RecordId, draft: RecordDraft) -> Result<RecordPatch, RemoteError> {
        let response = self
            .client
            .put(self.item_url(&id)?)
            .json(&UserBody::from(&draft))
            .send()
            .await?;
        read_echo(ensure_success(response)?).await
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: RecordId) -> Result<(), RemoteError> {
        let response = self.client.delete(self.item_url(&id)?).send().await?;
        ensure_success(response)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_url_appends_id_segment() {
        let resource =
            HttpUserResource::new(Url::parse("https://example.test/users").unwrap()).unwrap();
        let url = resource.item_url(&RecordId::from(7)).unwrap();
        assert_eq!(url.as_str(), "https://example.test/users/7");
    }

    #[test]
    fn item_url_tolerates_trailing_slash() {
        let resource =
            HttpUserResource::new(Url::parse("https://example.test/users/").unwrap()).unwrap();
        let url = resource.item_url(&RecordId::from(7)).unwrap();
        assert_eq!(url.as_str(), "https://example.test/users/7");
    }
}
