// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::Local;
use serde::{Deserialize, Serialize};

/// 公告候选项
///
/// 列表页提取阶段的中间产物：标题、规整后的绝对地址和站点侧公告标识。
/// 以规整后的 `url` 作为唯一键参与去重，不做持久化。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnouncementCandidate {
    /// 公告标题
    pub title: String,
    /// 规整后的绝对地址
    pub url: String,
    /// 站点查询参数中携带的公告标识
    pub external_id: Option<String>,
}

/// 公告记录
///
/// 详情页提取后的规整结果。详情字段一律可空：站点标记缺失某个栏目时该
/// 字段保持 `None`，序列化时整键省略，使"字段缺失"成为可检验的状态而
/// 不是空字符串。创建后不再修改（采集标识除外），导出即生命周期终点。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnouncementRecord {
    /// 公告标题，错误占位记录中为空串
    pub title: String,
    /// 规整后的绝对地址
    pub url: String,
    /// 站点侧公告标识
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub external_id: Option<String>,
    /// 支援领域
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub support_field: Option<String>,
    /// 对象年龄段
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub age_range: Option<String>,
    /// 支援对象
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub target: Option<String>,
    /// 经营年限要求
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub business_years: Option<String>,
    /// 地域
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub region: Option<String>,
    /// 申报期间
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub application_period: Option<String>,
    /// 主管机构
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub organization: Option<String>,
    /// 联系方式
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub contact: Option<String>,
    /// 正文内容节选（前 500 字符）
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub content: Option<String>,
    /// 采集时间戳（非业务时间）
    pub scraped_at: String,
    /// 提取失败时的错误信息
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<String>,
}

impl AnnouncementRecord {
    /// 创建一条空白记录，待详情提取逐字段填充
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            title: String::new(),
            url: url.into(),
            external_id: None,
            support_field: None,
            age_range: None,
            target: None,
            business_years: None,
            region: None,
            application_period: None,
            organization: None,
            contact: None,
            content: None,
            scraped_at: capture_timestamp(),
            error: None,
        }
    }

    /// 创建错误占位记录
    ///
    /// 详情提取失败时代替记录进入累积器，保证编排循环无条件前进。
    pub fn error_stub(url: impl Into<String>, message: impl Into<String>) -> Self {
        let mut record = Self::new(url);
        record.error = Some(message.into());
        record
    }

    /// 该记录是否为错误占位
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// 当前本地时间的采集时间戳
pub fn capture_timestamp() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}
