use std::path::{Path, PathBuf};
use tracing::info;

use crate::models::query::FileType;

/// 以固定文件名保存下载结果，已存在时覆盖
pub async fn save_blob(dir: &Path, file_type: FileType, bytes: &[u8]) -> anyhow::Result<PathBuf> {
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(file_type.file_name());
    tokio::fs::write(&path, bytes).await?;
    info!("文件已保存: {}", path.display());
    Ok(path)
}
