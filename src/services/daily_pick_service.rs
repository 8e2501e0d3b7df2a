use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use rand::Rng;
use tokio::sync::Mutex;

use crate::error::{AppError, AppResult};
use crate::models::DoroEnding;
use crate::services::DoroEndingService;

/// 每日结局选择服务
///
/// 同一 scope（通常是用户ID）同一天内重复请求返回同一个结局；
/// 映射仅存在于内存，跨天后过期条目被清理。
#[derive(Clone)]
pub struct DailyPickService {
    ending_service: DoroEndingService,
    cache: Arc<Mutex<HashMap<(String, NaiveDate), i64>>>,
}

impl DailyPickService {
    pub fn new(ending_service: DoroEndingService) -> Self {
        Self {
            ending_service,
            cache: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// 获取指定 scope 在指定日期的结局，首次请求时随机抽取并记忆
    pub async fn pick_for(&self, scope_key: &str, date: NaiveDate) -> AppResult<DoroEnding> {
        let mut cache = self.cache.lock().await;
        // 清理过期日期的映射
        cache.retain(|(_, d), _| *d >= date);

        let key = (scope_key.to_string(), date);
        if let Some(&id) = cache.get(&key) {
            if let Some(ending) = self.ending_service.get_ending_by_id(id).await {
                log::debug!("scope（{scope_key}）已有记录，使用已有结局 (ID: {id})");
                return Ok(ending);
            }
            // 记忆的结局已被删除，重新抽取
            log::debug!("scope（{scope_key}）的结局记录无效，重新选择结局");
            cache.remove(&key);
        }

        let all = self.ending_service.get_all_endings().await;
        if all.is_empty() {
            return Err(AppError::EmptyStore);
        }
        let index = rand::thread_rng().gen_range(0..all.len());
        let chosen = all[index].clone();
        cache.insert(key, chosen.id);
        log::debug!("记录 scope（{scope_key}）的结局ID为 {}", chosen.id);
        Ok(chosen)
    }
}
