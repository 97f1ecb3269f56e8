//! memosync コマンドの enum（Command Pattern）
//!
//! 引数解析の結果を enum に落とし、main の match でディスパッチする。

use super::sync::SyncOptions;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// ヘルプ表示
    Help,
    /// 取得元のメモをジャーナルへ取り込む
    Sync(SyncOptions),
    /// 同期先のバケットファイル一覧と件数を表示する
    Status,
}
