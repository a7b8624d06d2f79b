//! テスト用ユーティリティ関数
//!
//! 複数のテストモジュールで使用される共通のヘルパー関数を提供します。
#![cfg(test)]

use crate::model::{
    Catalog,
    Context,
    Message,
};
use crate::types::Status;

/// テスト用の Catalog を作成する
///
/// # Arguments
/// * `language` - 言語コード（例: "tr", "pt_BR"）
/// * `contexts` - コンテキスト名とメッセージのリスト（順序は保持される）
pub(crate) fn catalog_with(language: &str, contexts: &[(&str, Vec<Message>)]) -> Catalog {
    let mut catalog = Catalog::new(language);
    for (name, messages) in contexts {
        let mut context = Context::new(*name);
        for message in messages {
            context.push(message.clone());
        }
        catalog.add_context(context);
    }
    catalog
}

/// 翻訳済み (Finished) のメッセージを作成する
pub(crate) fn translated(source: &str, text: &str) -> Message {
    Message::new(source).with_translation(text).with_status(Status::Finished)
}
