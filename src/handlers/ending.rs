use std::path::PathBuf;

use chrono::NaiveDate;

use crate::error::AppResult;
use crate::models::{Command, DeleteTarget};
use crate::services::{DailyPickService, DoroEndingService};

/// 每页列出的结局数
const LIST_PAGE_SIZE: usize = 50;

/// 交给适配层发送的回复内容
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// 纯文本回复
    Text(String),
    /// 图片回复（路径到图片文件，消息段构建由适配层完成）
    Image(PathBuf),
    /// 分页文本（合并转发渲染由适配层完成）
    Pages(Vec<String>),
}

/// 指令统一入口：错误一律转换为面向用户的文本回复
pub async fn handle_command(
    ending_service: &DoroEndingService,
    pick_service: &DailyPickService,
    command: Command,
    today: NaiveDate,
) -> Reply {
    match command {
        Command::DailyEnding { scope_key } => {
            match handle_daily_ending(ending_service, pick_service, &scope_key, today).await {
                Ok(reply) => reply,
                Err(e) => Reply::Text(e.user_message()),
            }
        }
        Command::ListEndings => handle_list_endings(ending_service).await,
        Command::AddEnding {
            name,
            english_name,
            image,
        } => handle_add_ending(ending_service, &name, &english_name, &image).await,
        Command::RemoveEnding { target } => handle_remove_ending(ending_service, &target).await,
    }
}

/// 今日doro结局：返回当天为该 scope 记忆的结局图片
pub async fn handle_daily_ending(
    ending_service: &DoroEndingService,
    pick_service: &DailyPickService,
    scope_key: &str,
    today: NaiveDate,
) -> AppResult<Reply> {
    let ending = pick_service.pick_for(scope_key, today).await?;
    Ok(Reply::Image(ending_service.image_path(&ending)))
}

/// 列出doro结局：首页为提示语，之后每页最多50条"ID. 中文名"
pub async fn handle_list_endings(ending_service: &DoroEndingService) -> Reply {
    let mut endings = ending_service.get_all_endings().await;
    if endings.is_empty() {
        return Reply::Text("当前没有任何doro结局数据！".to_string());
    }
    endings.sort_by_key(|e| e.id);

    let mut pages = vec!["以下是所有doro结局".to_string()];
    for chunk in endings.chunks(LIST_PAGE_SIZE) {
        let page: String = chunk
            .iter()
            .map(|e| format!("{}. {}\n", e.id, e.name))
            .collect();
        pages.push(page);
    }
    Reply::Pages(pages)
}

pub async fn handle_add_ending(
    ending_service: &DoroEndingService,
    name: &str,
    english_name: &str,
    image: &[u8],
) -> Reply {
    match ending_service.add_ending(name, english_name, image).await {
        Ok(ending) => Reply::Text(format!("doro结局添加成功！(ID: {})", ending.id)),
        Err(e) => Reply::Text(format!("添加doro结局失败: {}", e.user_message())),
    }
}

pub async fn handle_remove_ending(
    ending_service: &DoroEndingService,
    target: &DeleteTarget,
) -> Reply {
    match ending_service.remove_ending(target).await {
        Ok(ending) => Reply::Text(format!("doro结局删除成功！({})", ending.name)),
        Err(e) => Reply::Text(format!("删除doro结局失败: {}", e.user_message())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, StorageConfig};
    use tempfile::{TempDir, tempdir};

    const JPEG_BYTES: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10];

    async fn services(dir: &TempDir) -> (DoroEndingService, DailyPickService) {
        let config = Config {
            storage: StorageConfig {
                data_dir: dir.path().to_string_lossy().into_owned(),
            },
            ..Config::default()
        };
        let ending_service = DoroEndingService::new(&config);
        ending_service.load_from_file().await.unwrap();
        let pick_service = DailyPickService::new(ending_service.clone());
        (ending_service, pick_service)
    }

    fn today() -> NaiveDate {
        "2025-06-01".parse().unwrap()
    }

    #[tokio::test]
    async fn test_daily_ending_on_empty_store_is_user_text() {
        let dir = tempdir().unwrap();
        let (ending_service, pick_service) = services(&dir).await;
        let reply = handle_command(
            &ending_service,
            &pick_service,
            Command::DailyEnding {
                scope_key: "user1".to_string(),
            },
            today(),
        )
        .await;
        assert_eq!(reply, Reply::Text("当前没有任何doro结局数据！".to_string()));
    }

    #[tokio::test]
    async fn test_daily_ending_returns_image_path() {
        let dir = tempdir().unwrap();
        let (ending_service, pick_service) = services(&dir).await;
        ending_service
            .add_ending("结局A", "EnA", JPEG_BYTES)
            .await
            .unwrap();
        let reply = handle_command(
            &ending_service,
            &pick_service,
            Command::DailyEnding {
                scope_key: "user1".to_string(),
            },
            today(),
        )
        .await;
        match reply {
            Reply::Image(path) => {
                assert!(path.ends_with("00000001_EnA.jpg"));
                assert!(path.exists());
            }
            other => panic!("expected image reply, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_add_then_remove_via_commands() {
        let dir = tempdir().unwrap();
        let (ending_service, pick_service) = services(&dir).await;

        let add = Command::parse_add("结局A EnA", Some(JPEG_BYTES.to_vec())).unwrap();
        let reply = handle_command(&ending_service, &pick_service, add, today()).await;
        assert_eq!(reply, Reply::Text("doro结局添加成功！(ID: 1)".to_string()));

        let remove = Command::parse_remove("结局A").unwrap();
        let reply = handle_command(&ending_service, &pick_service, remove, today()).await;
        assert_eq!(
            reply,
            Reply::Text("doro结局删除成功！(结局A)".to_string())
        );
        assert!(ending_service.get_all_endings().await.is_empty());
    }

    #[tokio::test]
    async fn test_remove_missing_reports_failure_text() {
        let dir = tempdir().unwrap();
        let (ending_service, pick_service) = services(&dir).await;
        let remove = Command::parse_remove("42").unwrap();
        let reply = handle_command(&ending_service, &pick_service, remove, today()).await;
        assert_eq!(
            reply,
            Reply::Text("删除doro结局失败: 未找到ID为 42 的结局".to_string())
        );
    }

    #[tokio::test]
    async fn test_list_endings_pagination() {
        let dir = tempdir().unwrap();
        let (ending_service, _) = services(&dir).await;

        assert_eq!(
            handle_list_endings(&ending_service).await,
            Reply::Text("当前没有任何doro结局数据！".to_string())
        );

        for i in 0..(LIST_PAGE_SIZE + 2) {
            ending_service
                .add_ending(&format!("结局{i}"), &format!("En{i}"), JPEG_BYTES)
                .await
                .unwrap();
        }
        let Reply::Pages(pages) = handle_list_endings(&ending_service).await else {
            panic!("expected pages reply");
        };
        // 首页提示语 + 满页 + 余下2条
        assert_eq!(pages.len(), 3);
        assert_eq!(pages[0], "以下是所有doro结局");
        assert_eq!(pages[1].lines().count(), LIST_PAGE_SIZE);
        assert_eq!(pages[2].lines().count(), 2);
        assert!(pages[1].starts_with("1. 结局0\n"));
    }
}
