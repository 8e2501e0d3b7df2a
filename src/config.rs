use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub image: ImageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// 数据目录（doroendings.json 与图片目录都在其下）
    pub data_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: "./data/doroending".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageConfig {
    /// 图片最大字节数
    pub max_size_bytes: u64,
    /// 图片文件名最大长度
    pub max_filename_length: usize,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            max_size_bytes: 10 * 1024 * 1024, // 10MB
            max_filename_length: 255,
        }
    }
}

impl Config {
    pub fn from_toml() -> Result<Self, Box<dyn std::error::Error>> {
        let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        use std::io::ErrorKind;

        // 尝试读取配置文件，如果不存在则完全依赖环境变量与默认值
        let config_result = std::fs::read_to_string(&config_path);

        let mut config: Config = match config_result {
            Ok(config_str) => {
                toml::from_str(&config_str).map_err(|e| format!("解析配置文件失败: {e}"))?
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Config::default(),
            Err(e) => {
                return Err(format!("无法读取配置文件 {config_path}: {e}").into());
            }
        };

        // 环境变量覆盖（即便文件存在时也覆盖）
        if let Ok(v) = env::var("DATA_DIR") {
            config.storage.data_dir = v;
        }
        if let Ok(v) = env::var("IMAGE_MAX_SIZE_BYTES")
            && let Ok(n) = v.parse()
        {
            config.image.max_size_bytes = n;
        }
        if let Ok(v) = env::var("IMAGE_MAX_FILENAME_LENGTH")
            && let Ok(n) = v.parse()
        {
            config.image.max_filename_length = n;
        }

        Ok(config)
    }

    /// doroendings.json 的完整路径
    pub fn data_file(&self) -> PathBuf {
        Path::new(&self.storage.data_dir).join("doroendings.json")
    }

    /// 结局图片目录
    pub fn pic_dir(&self) -> PathBuf {
        Path::new(&self.storage.data_dir).join("DoroEndingPic")
    }
}
