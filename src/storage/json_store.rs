use std::io::ErrorKind;
use std::path::Path;

use tokio::fs;

use crate::error::AppResult;
use crate::models::DoroData;

/// 读取数据文档；文件不存在时返回 None（首次启动属正常情况）
pub async fn load_data(path: &Path) -> AppResult<Option<DoroData>> {
    match fs::read_to_string(path).await {
        Ok(content) => {
            let data: DoroData = serde_json::from_str(&content)?;
            Ok(Some(data))
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// 保存数据文档：旧文件转为 .json.bak，新内容先写临时文件再改名覆盖
pub async fn save_data(path: &Path, data: &DoroData) -> AppResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }
    let content = serde_json::to_string_pretty(data)?;
    if fs::try_exists(path).await? {
        let backup = path.with_extension("json.bak");
        fs::rename(path, &backup).await?;
    }
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, content.as_bytes()).await?;
    fs::rename(&tmp, path).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DoroEnding;
    use tempfile::tempdir;

    fn sample_data() -> DoroData {
        DoroData {
            datas: vec![
                DoroEnding {
                    id: 1,
                    name: "结局A".to_string(),
                    english_name: "EnA".to_string(),
                    pic: "00000001_EnA.jpg".to_string(),
                },
                DoroEnding {
                    id: 3,
                    name: "结局B".to_string(),
                    english_name: "EnB".to_string(),
                    pic: "00000003_EnB.jpg".to_string(),
                },
            ],
            total: 2,
            max_id: 3,
        }
    }

    #[tokio::test]
    async fn test_missing_file_is_none() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("doroendings.json");
        assert!(load_data(&path).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_then_load_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("doroendings.json");
        let data = sample_data();
        save_data(&path, &data).await.unwrap();
        let loaded = load_data(&path).await.unwrap().unwrap();
        assert_eq!(loaded, data);
    }

    #[tokio::test]
    async fn test_save_creates_backup() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("doroendings.json");
        let data = sample_data();
        save_data(&path, &data).await.unwrap();
        save_data(&path, &DoroData::default()).await.unwrap();
        let backup = path.with_extension("json.bak");
        let backed_up: DoroData =
            serde_json::from_str(&std::fs::read_to_string(&backup).unwrap()).unwrap();
        assert_eq!(backed_up, data);
        let current = load_data(&path).await.unwrap().unwrap();
        assert_eq!(current, DoroData::default());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("doroendings.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(load_data(&path).await.is_err());
    }
}
