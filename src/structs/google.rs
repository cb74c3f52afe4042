use crate::{
    errors::{AppError, UpstreamError},
    structs::sheets::GridRow,
};
use async_trait::async_trait;

/// 讀取值班表的來源
#[async_trait]
pub trait GridSource: Send + Sync {
    // 整個分頁的儲存格（值 + 背景色）
    async fn fetch_rows(&self) -> Result<Vec<GridRow>, AppError>;
}

/// 把文字訊息貼到指定的 Chat space
#[async_trait]
pub trait ChatPublisher: Send + Sync {
    async fn publish(&self, space: &str, text: &str) -> Result<(), UpstreamError>;
}
