use chrono::Local; // timestamp in log lines
use env_logger::{Env, Target};
use std::io::Write; // for env_logger custom formatter

use doroending_core::{config::Config, services::DoroEndingService};

/// 启动与维护入口：加载数据并输出统计；`cleanup` 子命令清理无主图片
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let ts = Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z");
            let level = record.level().as_str().to_ascii_lowercase();
            let msg_json = serde_json::to_string(&format!("{}", record.args()))
                .unwrap_or_else(|_| "\"<invalid utf8>\"".to_string());
            writeln!(
                buf,
                "{{\"timestamp\":\"{}\",\"level\":\"{}\",\"message\":{},\"target\":\"{}\"}}",
                ts,
                level,
                msg_json,
                record.target(),
            )
        })
        .target(Target::Stdout)
        .init();

    // 加载配置
    let config = Config::from_toml().expect("Failed to load configuration file");

    // 初始化结局管理器并载入数据
    let ending_service = DoroEndingService::new(&config);
    let loaded = ending_service.load_from_file().await?;
    if !loaded {
        // 资源引导（从远端仓库下载）由外部流程完成
        log::warn!(
            "本地无结局数据，请将资源放置到 {} 后重试",
            config.data_file().display()
        );
    }

    let stats = ending_service.get_statistics().await;
    log::info!(
        "当前结局数据统计: total={} max_id={} with_images={} without_images={}",
        stats.total,
        stats.max_id,
        stats.with_images,
        stats.without_images
    );

    if std::env::args().nth(1).as_deref() == Some("cleanup") {
        let cleaned = ending_service.cleanup_images().await?;
        log::info!("清理完成，共删除 {} 个无用图片文件", cleaned.len());
    }

    Ok(())
}
