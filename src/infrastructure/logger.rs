//! 日志基础设施

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub struct Logger;

impl Logger {
    /// 初始化全局日志，`RUST_LOG` 优先于配置中的级别
    pub fn init(level: &str) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("{},tower_http=debug", level)));

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(false).compact())
            .init();
    }
}
