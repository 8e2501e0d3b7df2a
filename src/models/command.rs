use crate::error::{AppError, AppResult};

/// 机器人指令的类型化表示，由适配层解析后传入处理函数
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// 今日doro结局
    DailyEnding { scope_key: String },
    /// 列出doro结局
    ListEndings,
    /// 添加doro结局（图片由适配层从消息段中提取为字节）
    AddEnding {
        name: String,
        english_name: String,
        image: Vec<u8>,
    },
    /// 删除doro结局
    RemoveEnding { target: DeleteTarget },
}

/// 删除目标：先尝试按数字ID解析，再按中文名精确匹配
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteTarget {
    Id(i64),
    Name(String),
}

impl DeleteTarget {
    pub fn parse(raw: &str) -> AppResult<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(AppError::ValidationError(
                "请提供要删除的doro结局的ID或中文名".to_string(),
            ));
        }
        if raw.chars().all(|c| c.is_ascii_digit())
            && let Ok(id) = raw.parse::<i64>()
        {
            return Ok(DeleteTarget::Id(id));
        }
        Ok(DeleteTarget::Name(raw.to_string()))
    }
}

impl Command {
    /// 解析添加指令的参数文本："中文名 英文名"，必须附带图片
    pub fn parse_add(args: &str, image: Option<Vec<u8>>) -> AppResult<Self> {
        let image = image.ok_or_else(|| {
            AppError::ValidationError(
                "请提供一张图片！格式：/添加doro结局 中文名 英文名 [图片]".to_string(),
            )
        })?;
        let mut parts = args.split_whitespace();
        let (Some(name), Some(english_name)) = (parts.next(), parts.next()) else {
            return Err(AppError::ValidationError(
                "请提供两个名字，用空格隔开！".to_string(),
            ));
        };
        Ok(Command::AddEnding {
            name: name.to_string(),
            english_name: english_name.to_string(),
            image,
        })
    }

    /// 解析删除指令的参数文本
    pub fn parse_remove(args: &str) -> AppResult<Self> {
        Ok(Command::RemoveEnding {
            target: DeleteTarget::parse(args)?,
        })
    }
}
