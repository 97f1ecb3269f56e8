//! メモ取得元の Outbound ポート
//!
//! 実装は adapter::HttpMemoSource（Memos サーバー）やテスト用のメモリ実装など。

use crate::domain::{MemoPage, Resource};
use common::error::Error;

pub trait MemoSource: Send + Sync {
    /// 一覧を 1 ページ取得する。page_token は前ページの next_page_token。
    fn list_memos(&self, page_size: u32, page_token: Option<&str>) -> Result<MemoPage, Error>;

    /// 添付ファイルの中身を取得する
    ///
    /// - `Ok(Some(bytes))`: 取得できた
    /// - `Ok(None)`: 取得元に存在しない（その添付は飛ばす）
    /// - `Err(Error::Fetch)`: 取得元に到達できない
    fn download_resource(&self, resource: &Resource) -> Result<Option<Vec<u8>>, Error>;
}
