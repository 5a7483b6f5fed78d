// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::CrawlSettings;
use crate::engines::traits::{EngineError, PageFetcher};
use async_trait::async_trait;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// 就绪选择器轮询间隔
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// 浏览器会话
///
/// 基于 chromiumoxide 的页面抓取实现。整个运行期间只启动一个浏览器、
/// 复用一个页面上下文，所有导航严格串行；会话在运行结束时无条件关闭。
pub struct BrowserSession {
    browser: Browser,
    page: Page,
    handler_task: JoinHandle<()>,
    nav_timeout: Duration,
    listing_settle: Duration,
    scroll_settle: Duration,
    detail_settle: Duration,
    selector_timeout: Duration,
    fallback_wait: Duration,
    ready_selectors: Vec<String>,
}

impl BrowserSession {
    /// 启动浏览器并准备好可复用的页面上下文
    ///
    /// # 参数
    ///
    /// * `crawl` - 采集节奏配置
    /// * `ready_selectors` - 列表就绪探测选择器
    ///
    /// # 返回值
    ///
    /// * `Ok(BrowserSession)` - 可用的浏览器会话
    /// * `Err(EngineError)` - 浏览器启动或页面创建失败
    pub async fn launch(
        crawl: &CrawlSettings,
        ready_selectors: Vec<String>,
    ) -> Result<Self, EngineError> {
        let config = BrowserConfig::builder()
            .no_sandbox()
            .request_timeout(Duration::from_secs(crawl.nav_timeout_secs))
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .build()
            .map_err(EngineError::Browser)?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| EngineError::Browser(e.to_string()))?;

        // Spawn a handler to process browser events
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| EngineError::Browser(e.to_string()))?;
        page.set_user_agent(crawl.user_agent.as_str())
            .await
            .map_err(|e| EngineError::Browser(e.to_string()))?;

        info!("browser session ready");
        Ok(Self {
            browser,
            page,
            handler_task,
            nav_timeout: Duration::from_secs(crawl.nav_timeout_secs),
            listing_settle: Duration::from_millis(crawl.listing_settle_ms),
            scroll_settle: Duration::from_millis(crawl.scroll_settle_ms),
            detail_settle: Duration::from_millis(crawl.detail_settle_ms),
            selector_timeout: Duration::from_millis(crawl.selector_timeout_ms),
            fallback_wait: Duration::from_millis(crawl.fallback_wait_ms),
            ready_selectors,
        })
    }

    /// 在限定时间内完成一次导航
    async fn navigate(&self, url: &str) -> Result<(), EngineError> {
        tokio::time::timeout(self.nav_timeout, async {
            self.page
                .goto(url)
                .await
                .map_err(|e| EngineError::Navigation(e.to_string()))?;
            self.page
                .wait_for_navigation()
                .await
                .map_err(|e| EngineError::Navigation(e.to_string()))?;
            Ok(())
        })
        .await
        .map_err(|_| EngineError::Timeout)?
    }

    /// 滚到页底再滚回页顶，触发列表的动态加载
    ///
    /// 滚动失败不影响后续提取，只记录日志。
    async fn scroll_nudge(&self) {
        for script in [
            "window.scrollTo(0, document.body.scrollHeight)",
            "window.scrollTo(0, 0)",
        ] {
            if let Err(e) = self.page.evaluate(script).await {
                debug!(error = %e, "scroll nudge failed");
                return;
            }
            tokio::time::sleep(self.scroll_settle).await;
        }
    }

    /// 按顺序轮询就绪选择器，第一个命中即返回
    ///
    /// 全部落空时执行一次兜底等待，之后无论如何都继续提取。
    async fn wait_for_ready(&self) {
        for selector in &self.ready_selectors {
            let deadline = tokio::time::Instant::now() + self.selector_timeout;
            loop {
                if self.page.find_element(selector.as_str()).await.is_ok() {
                    debug!(selector = %selector, "listing content ready");
                    return;
                }
                if tokio::time::Instant::now() >= deadline {
                    break;
                }
                tokio::time::sleep(POLL_INTERVAL).await;
            }
        }
        debug!("no ready selector matched, waiting out the fallback delay");
        tokio::time::sleep(self.fallback_wait).await;
    }

    /// 关闭浏览器会话
    ///
    /// 在运行的每条退出路径上都必须调用；关闭失败只记录日志。
    pub async fn close(mut self) {
        if let Err(e) = self.browser.close().await {
            debug!(error = %e, "browser close failed");
        }
        if let Err(e) = self.browser.wait().await {
            debug!(error = %e, "browser wait failed");
        }
        self.handler_task.abort();
        info!("browser session closed");
    }
}

#[async_trait]
impl PageFetcher for BrowserSession {
    async fn fetch_listing(&self, url: &str) -> Result<String, EngineError> {
        self.navigate(url).await?;
        tokio::time::sleep(self.listing_settle).await;
        self.scroll_nudge().await;
        self.wait_for_ready().await;
        self.page
            .content()
            .await
            .map_err(|e| EngineError::Browser(e.to_string()))
    }

    async fn fetch_detail(&self, url: &str) -> Result<String, EngineError> {
        self.navigate(url).await?;
        tokio::time::sleep(self.detail_settle).await;
        self.page
            .content()
            .await
            .map_err(|e| EngineError::Browser(e.to_string()))
    }
}
