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

use crate::domain::models::filter_profile::CompanyFilterProfile;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// 应用程序配置设置
///
/// 包含站点契约、采集节奏、公司过滤条件和导出等所有配置项
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// 站点契约配置
    pub site: SiteSettings,
    /// 采集节奏配置
    pub crawl: CrawlSettings,
    /// 公司过滤条件配置
    pub filter: FilterSettings,
    /// 导出配置
    pub export: ExportSettings,
}

/// 站点契约配置设置
///
/// 目标站点的标记结构约定。站点改版时这里是唯一需要调整的外部契约。
#[derive(Debug, Clone, Deserialize)]
pub struct SiteSettings {
    /// 站点源地址
    pub base_url: String,
    /// 内容文档根路径
    pub content_base: String,
    /// 进行中公告列表文档名
    pub list_document: String,
    /// 公告标识所在的查询参数名
    pub id_param: String,
    /// 公告分类代码
    pub class_code: String,
    /// 首页新公告栏目的标题文本
    pub section_label: String,
    /// 列表就绪探测选择器（按优先级排列）
    pub ready_selectors: Vec<String>,
}

impl SiteSettings {
    /// 进行中公告列表页的完整地址
    pub fn listing_url(&self) -> String {
        format!("{}{}", self.content_base, self.list_document)
    }
}

/// 采集节奏配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlSettings {
    /// 起始页码
    pub start_page: u32,
    /// 结束页码（含）
    pub end_page: u32,
    /// 单次导航超时时间（秒）
    pub nav_timeout_secs: u64,
    /// 列表页加载后的固定等待（毫秒）
    pub listing_settle_ms: u64,
    /// 滚动触发动态加载后的等待（毫秒）
    pub scroll_settle_ms: u64,
    /// 详情页加载后的固定等待（毫秒）
    pub detail_settle_ms: u64,
    /// 单个就绪选择器的轮询上限（毫秒）
    pub selector_timeout_ms: u64,
    /// 所有选择器均未命中时的兜底等待（毫秒）
    pub fallback_wait_ms: u64,
    /// 首页兜底扫描收录的链接上限
    pub sweep_cap: usize,
    /// 浏览器 User-Agent
    pub user_agent: String,
}

/// 公司过滤条件配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct FilterSettings {
    /// 支援领域关键词列表
    pub support_field_keywords: Vec<String>,
    /// 经营年限下限（年）
    pub business_years_min: u32,
    /// 经营年限上限（年），为 0 时关闭年限过滤
    pub business_years_max: u32,
}

/// 导出配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct ExportSettings {
    /// 输出目录
    pub output_dir: String,
    /// 过滤结果文件基名
    pub filtered_basename: String,
    /// 全量结果文件基名
    pub all_basename: String,
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 从环境变量加载配置，支持默认值
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        let builder = Config::builder()
            // Site contract defaults
            .set_default("site.base_url", "https://www.k-startup.go.kr")?
            .set_default("site.content_base", "https://www.k-startup.go.kr/web/contents/")?
            .set_default("site.list_document", "bizpbanc-ongoing.do")?
            .set_default("site.id_param", "pbancSn")?
            .set_default("site.class_code", "PBC010")?
            .set_default("site.section_label", "신규 사업 공고")?
            .set_default(
                "site.ready_selectors",
                vec![
                    ".basic_item",
                    ".list_item",
                    "a[href*=\"pbancSn\"]",
                    "[class*=\"item\"]",
                    ".link_box-list a",
                    ".text_list a",
                ],
            )?
            // Crawl pacing defaults
            .set_default("crawl.start_page", 1)?
            .set_default("crawl.end_page", 5)?
            .set_default("crawl.nav_timeout_secs", 30)?
            .set_default("crawl.listing_settle_ms", 5000)?
            .set_default("crawl.scroll_settle_ms", 2000)?
            .set_default("crawl.detail_settle_ms", 2000)?
            .set_default("crawl.selector_timeout_ms", 3000)?
            .set_default("crawl.fallback_wait_ms", 3000)?
            .set_default("crawl.sweep_cap", 50)?
            .set_default(
                "crawl.user_agent",
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36",
            )?
            // Company profile defaults
            .set_default(
                "filter.support_field_keywords",
                vec![
                    "헬스", "건강", "임상", "AI", "의료", "의약", "바이오", "치료", "진단",
                    "의학",
                ],
            )?
            .set_default("filter.business_years_min", 3)?
            .set_default("filter.business_years_max", 10)?
            // Export defaults
            .set_default("export.output_dir", ".")?
            .set_default("export.filtered_basename", "kstartup_filtered")?
            .set_default("export.all_basename", "kstartup_all")?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix("KSTARTUP").separator("__"));

        builder.build()?.try_deserialize()
    }

    /// 由过滤配置构造公司条件档案
    pub fn filter_profile(&self) -> CompanyFilterProfile {
        let range = (self.filter.business_years_min <= self.filter.business_years_max
            && self.filter.business_years_max > 0)
            .then_some((
                self.filter.business_years_min,
                self.filter.business_years_max,
            ));
        CompanyFilterProfile {
            support_field_keywords: self.filter.support_field_keywords.clone(),
            business_years_range: range,
        }
    }
}
