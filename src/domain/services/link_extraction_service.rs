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

use crate::config::settings::SiteSettings;
use crate::domain::models::announcement::AnnouncementCandidate;
use crate::utils::url_utils::{normalize_announcement_url, query_param_value};
use anyhow::Result;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use tracing::debug;
use url::Url;

/// 列表项容器的类名约定
static ITEM_CONTAINERS: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#".basic_item, .list_item, [class*="item"]"#).unwrap());

static ANCHORS: Lazy<Selector> = Lazy::new(|| Selector::parse("a").unwrap());

static HEADINGS: Lazy<Selector> = Lazy::new(|| Selector::parse("h3").unwrap());

/// 标题兜底查找的类名约定
static TITLE_HINTS: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(r#".title, h3, h4, h5, [class*="title"], [class*="subject"]"#).unwrap()
});

/// 导航、分享按钮一类的文案，命中即丢弃候选项
const DENY_LABELS: &[&str] = &[
    "더보기", "목록", "이전", "다음", "페이스북", "트위터", "more", "list", "previous", "next",
    "facebook", "twitter",
];

/// 有效标题的最小字符数
const MIN_TITLE_CHARS: usize = 5;

/// 标题兜底查找向上回溯的层数上限
const MAX_ANCESTOR_LEVELS: usize = 3;

/// 首页新公告栏目向后扫描的兄弟节点上限
const MAX_SECTION_SIBLINGS: usize = 10;

/// 站点标记契约
///
/// 各提取策略共享的站点约定：地址规整规则、标识参数、标题兜底与
/// 丢弃文案。站点改版只影响这里和 [`SiteSettings`]。
struct SiteMarkup {
    origin: Url,
    content_base: String,
    id_param: String,
    id_needle: String,
    view_prefix: String,
    section_label: String,
    param_anchor: Selector,
    onclick_url_re: Regex,
    onclick_param_re: Regex,
}

impl SiteMarkup {
    fn new(site: &SiteSettings) -> Result<Self> {
        let origin = Url::parse(&site.base_url)?;
        let escaped = regex::escape(&site.id_param);
        let param_anchor = Selector::parse(&format!(r#"a[href*="{}="]"#, site.id_param))
            .map_err(|e| anyhow::anyhow!("Invalid selector: {:?}", e))?;
        Ok(Self {
            origin,
            content_base: site.content_base.clone(),
            id_needle: format!("{}=", site.id_param),
            view_prefix: format!("{}?schM=view&{}=", site.list_document, site.id_param),
            id_param: site.id_param.clone(),
            section_label: site.section_label.clone(),
            param_anchor,
            onclick_url_re: Regex::new(&format!(r#"['"]([^'"]*{}=[^'"]*)['"]"#, escaped))?,
            onclick_param_re: Regex::new(&format!(r#"{}=([^&'"]+)"#, escaped))?,
        })
    }

    /// 从单个锚元素构造候选项
    ///
    /// 不满足契约的锚（无标识参数、标题过短、命中丢弃文案）返回 `None`
    /// 并记录 debug 日志，绝不中断同页其余锚的提取。
    fn candidate_from_anchor(
        &self,
        anchor: ElementRef<'_>,
        scope: Option<ElementRef<'_>>,
    ) -> Option<AnnouncementCandidate> {
        let raw_href = anchor.value().attr("href").unwrap_or("").trim();
        let href = if raw_href.is_empty() || raw_href.starts_with("javascript:") {
            self.href_from_onclick(anchor.value().attr("onclick").unwrap_or(""))?
        } else {
            raw_href.to_string()
        };

        if !href.contains(&self.id_needle) {
            return None;
        }

        let mut title = collapsed_text(&anchor);
        if title.chars().count() < MIN_TITLE_CHARS {
            if let Some(hint) = self.nearby_title(anchor, scope) {
                title = hint;
            }
        }
        if title.chars().count() < MIN_TITLE_CHARS {
            debug!(href = %href, "anchor skipped: title too short");
            return None;
        }
        if let Some(label) = deny_label(&title) {
            debug!(href = %href, label = %label, "anchor skipped: navigation label");
            return None;
        }

        let url = normalize_announcement_url(&self.origin, &self.content_base, &href);
        let external_id = query_param_value(&href, &self.id_param);
        Some(AnnouncementCandidate {
            title,
            url,
            external_id,
        })
    }

    /// 从 onclick 处理器文本中恢复链接地址
    ///
    /// 优先取包含标识参数的引号字符串；退而求其次，取裸的参数片段并
    /// 拼回已知的查看路径。
    fn href_from_onclick(&self, onclick: &str) -> Option<String> {
        if onclick.is_empty() {
            return None;
        }
        if let Some(caps) = self.onclick_url_re.captures(onclick) {
            return Some(caps[1].to_string());
        }
        if let Some(caps) = self.onclick_param_re.captures(onclick) {
            return Some(format!("{}{}", self.view_prefix, &caps[1]));
        }
        None
    }

    /// 锚文本过短时，在附近查找标题类元素
    ///
    /// 有条目容器时在容器内查找，否则向上回溯有限层级逐层查找。
    fn nearby_title(
        &self,
        anchor: ElementRef<'_>,
        scope: Option<ElementRef<'_>>,
    ) -> Option<String> {
        if let Some(scope) = scope {
            return scope.select(&TITLE_HINTS).next().map(|el| collapsed_text(&el));
        }
        for ancestor in anchor
            .ancestors()
            .take(MAX_ANCESTOR_LEVELS)
            .filter_map(ElementRef::wrap)
        {
            if let Some(el) = ancestor.select(&TITLE_HINTS).next() {
                return Some(collapsed_text(&el));
            }
        }
        None
    }
}

fn deny_label(title: &str) -> Option<&'static str> {
    let folded = title.to_lowercase();
    DENY_LABELS.iter().copied().find(|l| folded.contains(l))
}

fn collapsed_text(el: &ElementRef<'_>) -> String {
    el.text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// 去重累积器
///
/// 以规整后的地址为键，先到先得，保证单次提取绝不产出重复候选项。
#[derive(Default)]
struct CandidateAccumulator {
    seen: HashSet<String>,
    items: Vec<AnnouncementCandidate>,
}

impl CandidateAccumulator {
    fn push(&mut self, candidate: AnnouncementCandidate) -> bool {
        if self.seen.insert(candidate.url.clone()) {
            self.items.push(candidate);
            true
        } else {
            false
        }
    }
}

/// 提取策略特质
///
/// 每个策略独立扫描文档的一类标记结构，按优先级顺序写入同一个累积器。
trait ExtractionStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    fn collect(&self, markup: &SiteMarkup, doc: &Html, acc: &mut CandidateAccumulator);
}

/// 条目容器策略：扫描列表项容器，取每个容器内的第一个锚
struct ItemContainerStrategy;

impl ExtractionStrategy for ItemContainerStrategy {
    fn name(&self) -> &'static str {
        "item_container"
    }

    fn collect(&self, markup: &SiteMarkup, doc: &Html, acc: &mut CandidateAccumulator) {
        for item in doc.select(&ITEM_CONTAINERS) {
            let Some(anchor) = item.select(&ANCHORS).next() else {
                continue;
            };
            if let Some(candidate) = markup.candidate_from_anchor(anchor, Some(item)) {
                acc.push(candidate);
            }
        }
    }
}

/// 栏目标题策略：定位已知标题，在其后续兄弟子树中找携带标识参数的锚
struct HeadingSectionStrategy;

impl ExtractionStrategy for HeadingSectionStrategy {
    fn name(&self) -> &'static str {
        "heading_section"
    }

    fn collect(&self, markup: &SiteMarkup, doc: &Html, acc: &mut CandidateAccumulator) {
        for heading in doc.select(&HEADINGS) {
            let text: String = heading.text().collect();
            if !text.contains(&markup.section_label) {
                continue;
            }
            let mut section_found = false;
            for sibling in heading
                .next_siblings()
                .filter_map(ElementRef::wrap)
                .take(MAX_SECTION_SIBLINGS)
            {
                let mut anchors_present = false;
                for anchor in sibling.select(&markup.param_anchor) {
                    anchors_present = true;
                    if let Some(candidate) = markup.candidate_from_anchor(anchor, None) {
                        acc.push(candidate);
                    }
                }
                // 栏目列表集中在第一个含锚的兄弟节点里
                if anchors_present {
                    section_found = true;
                    break;
                }
            }
            if section_found {
                break;
            }
        }
    }
}

/// 全页扫描策略：兜底扫描所有锚，包括 onclick 脚本锚
struct AnchorSweepStrategy;

impl ExtractionStrategy for AnchorSweepStrategy {
    fn name(&self) -> &'static str {
        "anchor_sweep"
    }

    fn collect(&self, markup: &SiteMarkup, doc: &Html, acc: &mut CandidateAccumulator) {
        for anchor in doc.select(&ANCHORS) {
            if let Some(candidate) = markup.candidate_from_anchor(anchor, None) {
                acc.push(candidate);
            }
        }
    }
}

/// 链接提取服务
///
/// 将多个提取策略按优先级组合，输出按规整地址去重后的公告候选项列表。
pub struct LinkExtractor {
    markup: SiteMarkup,
    strategies: Vec<Box<dyn ExtractionStrategy>>,
}

impl LinkExtractor {
    /// 按站点契约构造提取器
    ///
    /// # 参数
    ///
    /// * `site` - 站点契约配置
    ///
    /// # 返回值
    ///
    /// * `Ok(LinkExtractor)` - 构造好的提取器
    /// * `Err(anyhow::Error)` - 站点地址或标识参数不合法
    pub fn new(site: &SiteSettings) -> Result<Self> {
        Ok(Self {
            markup: SiteMarkup::new(site)?,
            strategies: vec![
                Box::new(ItemContainerStrategy),
                Box::new(HeadingSectionStrategy),
                Box::new(AnchorSweepStrategy),
            ],
        })
    }

    /// 从解析后的页面文档提取公告候选项
    ///
    /// 各策略依次写入同一个去重累积器，先命中的策略优先。
    pub fn extract(&self, doc: &Html) -> Vec<AnnouncementCandidate> {
        let mut acc = CandidateAccumulator::default();
        for strategy in &self.strategies {
            let before = acc.items.len();
            strategy.collect(&self.markup, doc, &mut acc);
            debug!(
                strategy = strategy.name(),
                added = acc.items.len() - before,
                "extraction strategy finished"
            );
        }
        acc.items
    }
}
