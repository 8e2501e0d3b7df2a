use serde::{Deserialize, Serialize};

/// doro结局记录
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DoroEnding {
    pub id: i64,
    /// 中文名（展示用）
    pub name: String,
    /// 英文名（用于派生图片文件名）
    pub english_name: String,
    /// 图片文件名（相对图片目录）
    #[serde(default)]
    pub pic: String,
}

/// doroendings.json 文档结构
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct DoroData {
    #[serde(default)]
    pub datas: Vec<DoroEnding>,
    #[serde(default)]
    pub total: i64,
    /// 历史最大ID，单调递增，删除后不回退不复用
    #[serde(default)]
    pub max_id: i64,
}

impl DoroData {
    /// 修正缓存字段，保证 total 与记录数一致、max_id 不小于现存最大ID
    pub fn normalize(&mut self) {
        let count = self.datas.len() as i64;
        if self.total != count {
            log::warn!("total 字段与记录数不一致 ({} != {count})，已修正", self.total);
            self.total = count;
        }
        let current_max = self.datas.iter().map(|e| e.id).max().unwrap_or(0);
        if self.max_id < current_max {
            log::warn!(
                "max_id 字段小于现存最大ID ({} < {current_max})，已修正",
                self.max_id
            );
            self.max_id = current_max;
        }
    }
}

/// 结局统计信息
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EndingStatistics {
    pub total: i64,
    pub max_id: i64,
    pub with_images: usize,
    pub without_images: usize,
}

/// 结局允许修改的字段
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateEndingRequest {
    pub name: Option<String>,
    pub english_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_roundtrip() {
        let data = DoroData {
            datas: vec![DoroEnding {
                id: 1,
                name: "结局A".to_string(),
                english_name: "EnA".to_string(),
                pic: "00000001_EnA.jpg".to_string(),
            }],
            total: 1,
            max_id: 1,
        };
        let json = serde_json::to_string(&data).unwrap();
        let parsed: DoroData = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, data);
    }

    #[test]
    fn test_missing_fields_default() {
        let parsed: DoroData = serde_json::from_str("{}").unwrap();
        assert!(parsed.datas.is_empty());
        assert_eq!(parsed.total, 0);
        assert_eq!(parsed.max_id, 0);
    }

    #[test]
    fn test_normalize_fixes_cached_fields() {
        let mut data = DoroData {
            datas: vec![DoroEnding {
                id: 7,
                name: "结局".to_string(),
                english_name: "En".to_string(),
                pic: String::new(),
            }],
            total: 5,
            max_id: 2,
        };
        data.normalize();
        assert_eq!(data.total, 1);
        assert_eq!(data.max_id, 7);
    }
}
