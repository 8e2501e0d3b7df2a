use std::path::PathBuf;
use std::sync::Arc;

use tokio::fs;
use tokio::sync::Mutex;

use crate::config::{Config, ImageConfig};
use crate::error::{AppError, AppResult};
use crate::models::{
    DeleteTarget, DoroData, DoroEnding, EndingStatistics, UpdateEndingRequest,
};
use crate::storage;
use crate::utils::{detect_image_format, ending_image_filename};

/// doro结局管理器：JSON文档 + 图片目录之上的增删查改
///
/// 所有读改写路径都经过同一把锁；每次成功变更后立即落盘。
#[derive(Clone)]
pub struct DoroEndingService {
    data_file: PathBuf,
    pic_dir: PathBuf,
    image_config: ImageConfig,
    data: Arc<Mutex<DoroData>>,
}

impl DoroEndingService {
    pub fn new(config: &Config) -> Self {
        Self {
            data_file: config.data_file(),
            pic_dir: config.pic_dir(),
            image_config: config.image.clone(),
            data: Arc::new(Mutex::new(DoroData::default())),
        }
    }

    /// 从文件加载数据到内存，返回是否加载到了已有数据
    pub async fn load_from_file(&self) -> AppResult<bool> {
        fs::create_dir_all(&self.pic_dir).await?;
        let mut data = self.data.lock().await;
        match storage::load_data(&self.data_file).await? {
            Some(mut loaded) => {
                loaded.normalize();
                log::info!("成功加载 {} 条doro结局数据", loaded.datas.len());
                *data = loaded;
                Ok(true)
            }
            None => {
                log::warn!("数据文件不存在: {}", self.data_file.display());
                Ok(false)
            }
        }
    }

    /// 获取所有结局（按存储顺序）
    pub async fn get_all_endings(&self) -> Vec<DoroEnding> {
        self.data.lock().await.datas.clone()
    }

    /// 根据ID获取结局
    pub async fn get_ending_by_id(&self, id: i64) -> Option<DoroEnding> {
        let data = self.data.lock().await;
        data.datas.iter().find(|e| e.id == id).cloned()
    }

    /// 根据中文名获取结局
    pub async fn get_ending_by_name(&self, name: &str) -> Option<DoroEnding> {
        let data = self.data.lock().await;
        data.datas.iter().find(|e| e.name == name).cloned()
    }

    /// 搜索结局（中文名与英文名模糊匹配）
    pub async fn search_endings(&self, keyword: &str) -> Vec<DoroEnding> {
        let keyword = keyword.to_lowercase();
        let data = self.data.lock().await;
        data.datas
            .iter()
            .filter(|e| {
                e.name.to_lowercase().contains(&keyword)
                    || e.english_name.to_lowercase().contains(&keyword)
            })
            .cloned()
            .collect()
    }

    /// 添加新结局：分配 max_id+1，写入图片文件后落盘
    pub async fn add_ending(
        &self,
        name: &str,
        english_name: &str,
        image_bytes: &[u8],
    ) -> AppResult<DoroEnding> {
        let name = name.trim();
        let english_name = english_name.trim();
        if name.is_empty() {
            return Err(AppError::ValidationError("中文名不能为空".to_string()));
        }
        if english_name.is_empty() {
            return Err(AppError::ValidationError("英文名不能为空".to_string()));
        }
        if image_bytes.is_empty() {
            return Err(AppError::ValidationError("请提供一张图片".to_string()));
        }
        if image_bytes.len() as u64 > self.image_config.max_size_bytes {
            return Err(AppError::ValidationError(format!(
                "图片文件过大，最大允许{}字节",
                self.image_config.max_size_bytes
            )));
        }
        let Some(format) = detect_image_format(image_bytes) else {
            return Err(AppError::ValidationError("无法识别图片格式".to_string()));
        };

        let mut data = self.data.lock().await;
        if data.datas.iter().any(|e| e.name == name) {
            return Err(AppError::ValidationError(format!(
                "中文名 '{name}' 已存在"
            )));
        }

        let new_id = data.max_id + 1;
        let pic_filename =
            ending_image_filename(new_id, english_name, self.image_config.max_filename_length);
        fs::create_dir_all(&self.pic_dir).await?;
        fs::write(self.pic_dir.join(&pic_filename), image_bytes).await?;
        log::debug!("图片已保存: {pic_filename} (格式: {format})");

        let new_ending = DoroEnding {
            id: new_id,
            name: name.to_string(),
            english_name: english_name.to_string(),
            pic: pic_filename,
        };
        data.datas.push(new_ending.clone());
        data.max_id = new_id;
        data.total += 1;
        storage::save_data(&self.data_file, &data).await?;
        log::info!("已添加新结局: {name} (ID: {new_id})");
        Ok(new_ending)
    }

    /// 删除结局（按ID或中文名），同时删除关联图片文件
    ///
    /// max_id 不回退：被删除的ID永不复用。
    pub async fn remove_ending(&self, target: &DeleteTarget) -> AppResult<DoroEnding> {
        let mut data = self.data.lock().await;
        let index = match target {
            DeleteTarget::Id(id) => data
                .datas
                .iter()
                .position(|e| e.id == *id)
                .ok_or_else(|| AppError::NotFound(format!("未找到ID为 {id} 的结局")))?,
            DeleteTarget::Name(name) => data
                .datas
                .iter()
                .position(|e| e.name == *name)
                .ok_or_else(|| AppError::NotFound(format!("未找到名为 '{name}' 的结局")))?,
        };
        let removed = data.datas.remove(index);
        data.total -= 1;

        if !removed.pic.is_empty() {
            let pic_path = self.pic_dir.join(&removed.pic);
            if fs::try_exists(&pic_path).await? {
                fs::remove_file(&pic_path).await?;
                log::info!("已删除图片文件: {}", pic_path.display());
            }
        }
        storage::save_data(&self.data_file, &data).await?;
        log::info!("已删除结局: {} (ID: {})", removed.name, removed.id);
        Ok(removed)
    }

    /// 更新结局的中文名/英文名，与其他结局重名时拒绝
    pub async fn update_ending(
        &self,
        id: i64,
        request: UpdateEndingRequest,
    ) -> AppResult<DoroEnding> {
        let mut data = self.data.lock().await;
        if !data.datas.iter().any(|e| e.id == id) {
            return Err(AppError::NotFound(format!("未找到ID为 {id} 的结局")));
        }
        if let Some(name) = &request.name
            && data.datas.iter().any(|e| e.id != id && e.name == *name)
        {
            return Err(AppError::ValidationError(format!(
                "中文名 '{name}' 已存在"
            )));
        }
        if let Some(english_name) = &request.english_name
            && data
                .datas
                .iter()
                .any(|e| e.id != id && e.english_name == *english_name)
        {
            return Err(AppError::ValidationError(format!(
                "英文名 '{english_name}' 已存在"
            )));
        }

        let ending = data
            .datas
            .iter_mut()
            .find(|e| e.id == id)
            .expect("checked above");
        let mut updated = false;
        if let Some(name) = request.name
            && ending.name != name
        {
            ending.name = name;
            updated = true;
        }
        if let Some(english_name) = request.english_name
            && ending.english_name != english_name
        {
            ending.english_name = english_name;
            updated = true;
        }
        let result = ending.clone();
        if updated {
            storage::save_data(&self.data_file, &data).await?;
            log::info!("已更新结局 '{}' (ID: {id})", result.name);
        }
        Ok(result)
    }

    /// 获取统计信息
    pub async fn get_statistics(&self) -> EndingStatistics {
        let data = self.data.lock().await;
        EndingStatistics {
            total: data.total,
            max_id: data.max_id,
            with_images: data.datas.iter().filter(|e| !e.pic.is_empty()).count(),
            without_images: data.datas.iter().filter(|e| e.pic.is_empty()).count(),
        }
    }

    /// 清理没有对应记录的图片文件，返回被清理的文件名
    pub async fn cleanup_images(&self) -> AppResult<Vec<String>> {
        let data = self.data.lock().await;
        let used: std::collections::HashSet<&str> = data
            .datas
            .iter()
            .filter(|e| !e.pic.is_empty())
            .map(|e| e.pic.as_str())
            .collect();

        let mut cleaned = Vec::new();
        let mut failed = 0usize;
        let mut entries = fs::read_dir(&self.pic_dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            let file_name = entry.file_name().to_string_lossy().into_owned();
            if used.contains(file_name.as_str()) {
                continue;
            }
            match fs::remove_file(entry.path()).await {
                Ok(()) => {
                    log::debug!("清理图片: {file_name}");
                    cleaned.push(file_name);
                }
                Err(e) => {
                    log::error!("清理图片失败 {file_name}: {e}");
                    failed += 1;
                }
            }
        }
        if failed > 0 {
            log::warn!("成功清理 {} 个文件，{failed} 个文件清理失败", cleaned.len());
        } else {
            log::info!("已清理 {} 个无用图片文件", cleaned.len());
        }
        Ok(cleaned)
    }

    /// 结局图片的完整路径
    pub fn image_path(&self, ending: &DoroEnding) -> PathBuf {
        self.pic_dir.join(&ending.pic)
    }
}
