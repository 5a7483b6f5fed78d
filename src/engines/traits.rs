// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use async_trait::async_trait;
use thiserror::Error;

/// 引擎错误类型
#[derive(Error, Debug)]
pub enum EngineError {
    /// 导航超时
    #[error("Timeout")]
    Timeout,
    /// 浏览器会话错误
    #[error("Browser error: {0}")]
    Browser(String),
    /// 导航失败
    #[error("Navigation failed: {0}")]
    Navigation(String),
}

/// 页面抓取特质
///
/// 列表页与详情页的加载节奏不同（列表页需要滚动触发动态加载并轮询
/// 就绪选择器，详情页只需固定沉降等待），因此拆成两个操作。实现方
/// 必须对同一站点保持严格串行的请求节奏。
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// 加载一个列表页并返回其标记文本
    async fn fetch_listing(&self, url: &str) -> Result<String, EngineError>;

    /// 加载一个详情页并返回其标记文本
    async fn fetch_detail(&self, url: &str) -> Result<String, EngineError>;
}
