//! Memos サーバーからメモと添付ファイルを取得する MemoSource 実装
//!
//! - 一覧: `GET {base}/api/v1/memos?pageSize=N&pageToken=T`
//! - 添付: `GET {base}/file/{resource.name}/{filename}`（404 は「存在しない」）

use chrono::{DateTime, Local};
use common::error::Error;
use reqwest::blocking::Client;
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use std::time::Duration;

use crate::domain::{Memo, MemoPage, Resource};
use crate::ports::outbound::MemoSource;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListMemosResponse {
    #[serde(default)]
    memos: Vec<MemoDto>,
    #[serde(default)]
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MemoDto {
    name: String,
    #[serde(default)]
    uid: Option<String>,
    create_time: DateTime<Local>,
    #[serde(default)]
    update_time: Option<DateTime<Local>>,
    #[serde(default)]
    content: String,
    #[serde(default)]
    visibility: String,
    #[serde(default, alias = "attachments")]
    resources: Vec<ResourceDto>,
}

#[derive(Debug, Deserialize)]
struct ResourceDto {
    name: String,
    #[serde(default)]
    filename: String,
}

impl TryFrom<MemoDto> for Memo {
    type Error = Error;

    /// ID は uid、無ければ name の末尾セグメント。空や改行入りの ID は識別行にできないので拒否する。
    fn try_from(dto: MemoDto) -> Result<Self, Error> {
        let id = match dto.uid.filter(|u| !u.is_empty()) {
            Some(uid) => uid,
            None => dto
                .name
                .rsplit('/')
                .next()
                .unwrap_or(dto.name.as_str())
                .to_string(),
        };
        if id.is_empty() || id.contains(['\n', '\r']) {
            return Err(Error::json(format!(
                "memo '{}' has no usable id",
                dto.name.escape_debug()
            )));
        }
        Ok(Memo {
            id,
            create_time: dto.create_time,
            update_time: dto.update_time.unwrap_or(dto.create_time),
            content: dto.content,
            visibility: dto.visibility,
            resources: dto
                .resources
                .into_iter()
                .map(|r| Resource::new(r.name, r.filename))
                .collect(),
        })
    }
}

/// 一覧 API のレスポンスをドメイン型に変換する
pub fn parse_list_response(body: &str) -> Result<MemoPage, Error> {
    let resp: ListMemosResponse = serde_json::from_str(body)
        .map_err(|e| Error::json(format!("Failed to parse memo list: {}", e)))?;
    Ok(MemoPage {
        memos: resp
            .memos
            .into_iter()
            .map(Memo::try_from)
            .collect::<Result<_, _>>()?,
        next_page_token: resp.next_page_token.filter(|t| !t.is_empty()),
    })
}

pub struct HttpMemoSource {
    client: Client,
    base_url: Url,
    access_token: Option<String>,
}

impl HttpMemoSource {
    pub fn new(base_url: &str, access_token: Option<String>, timeout: Duration) -> Result<Self, Error> {
        let base_url = Url::parse(base_url)
            .map_err(|e| Error::config(format!("invalid base_url '{}': {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(Error::config(format!("invalid base_url '{}'", base_url)));
        }
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::http(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base_url,
            access_token,
        })
    }

    fn url_with_segments<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> Result<Url, Error> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::config(format!("invalid base_url '{}'", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn get(&self, url: Url) -> reqwest::blocking::RequestBuilder {
        let req = self.client.get(url);
        match &self.access_token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }
}

impl MemoSource for HttpMemoSource {
    fn list_memos(&self, page_size: u32, page_token: Option<&str>) -> Result<MemoPage, Error> {
        let url = self.url_with_segments(["api", "v1", "memos"])?;
        let mut req = self.get(url).query(&[("pageSize", page_size.to_string())]);
        if let Some(token) = page_token {
            req = req.query(&[("pageToken", token)]);
        }
        let response = req
            .send()
            .map_err(|e| Error::http(format!("HTTP request failed: {}", e)))?;
        let status = response.status();
        let body = response
            .text()
            .map_err(|e| Error::http(format!("Failed to read response: {}", e)))?;
        if !status.is_success() {
            return Err(Error::http(format!("Memos API error: HTTP {}: {}", status, body)));
        }
        parse_list_response(&body)
    }

    fn download_resource(&self, resource: &Resource) -> Result<Option<Vec<u8>>, Error> {
        let segments = std::iter::once("file")
            .chain(resource.name.split('/').filter(|s| !s.is_empty()))
            .chain(std::iter::once(resource.filename.as_str()));
        let url = self.url_with_segments(segments)?;
        let response = self
            .get(url)
            .send()
            .map_err(|e| Error::fetch(format!("{}: {}", resource.name, e)))?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(Error::fetch(format!("{}: HTTP {}", resource.name, status)));
        }
        let bytes = response
            .bytes()
            .map_err(|e| Error::fetch(format!("{}: {}", resource.name, e)))?;
        Ok(Some(bytes.to_vec()))
    }
}
