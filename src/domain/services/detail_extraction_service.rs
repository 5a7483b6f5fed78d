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

use crate::domain::models::announcement::AnnouncementRecord;
use crate::engines::traits::PageFetcher;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::warn;

static HEADING: Lazy<Selector> = Lazy::new(|| Selector::parse("h3").unwrap());

static LIST_ITEMS: Lazy<Selector> = Lazy::new(|| Selector::parse("li").unwrap());

static PARAGRAPHS: Lazy<Selector> = Lazy::new(|| Selector::parse("p").unwrap());

/// 正文区块的类名约定
static CONTENT_HINTS: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#".ann_cont, .content, [class*="content"]"#).unwrap());

/// 正文节选长度上限（字符）
const MAX_CONTENT_CHARS: usize = 500;

/// 详情提取服务
///
/// 将公告详情页解析为规整的公告记录。详情页以标签-值成对的列表项陈列
/// 字段，标签按子串匹配归入已知字段，单个列表项只归入首个命中的字段。
pub struct DetailExtractor;

impl DetailExtractor {
    pub fn new() -> Self {
        Self
    }

    /// 抓取并提取一条公告详情
    ///
    /// 任何导航或提取失败都退化为错误占位记录，绝不向上传播，
    /// 保证编排循环可以无条件处理下一个候选项。
    pub async fn extract<F>(&self, fetcher: &F, url: &str) -> AnnouncementRecord
    where
        F: PageFetcher + ?Sized,
    {
        match fetcher.fetch_detail(url).await {
            Ok(html) => self.parse(&html, url),
            Err(e) => {
                warn!(url = %url, error = %e, "detail fetch failed, recording error stub");
                AnnouncementRecord::error_stub(url, e.to_string())
            }
        }
    }

    /// 将详情页标记解析为公告记录
    pub fn parse(&self, html: &str, url: &str) -> AnnouncementRecord {
        let doc = Html::parse_document(html);
        let mut record = AnnouncementRecord::new(url);

        if let Some(heading) = doc.select(&HEADING).next() {
            record.title = collapsed_text(&heading);
        }

        for item in doc.select(&LIST_ITEMS) {
            let paragraphs: Vec<ElementRef<'_>> = item.select(&PARAGRAPHS).collect();
            let (Some(first), Some(last)) = (paragraphs.first(), paragraphs.last()) else {
                continue;
            };
            let label = collapsed_text(first);
            if label.is_empty() {
                continue;
            }
            assign_labeled_field(&mut record, &label, collapsed_text(last));
        }

        if let Some(block) = doc.select(&CONTENT_HINTS).next() {
            let text: String = block.text().collect();
            record.content = Some(
                text.chars()
                    .take(MAX_CONTENT_CHARS)
                    .collect::<String>()
                    .trim()
                    .to_string(),
            );
        }

        record
    }
}

impl Default for DetailExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// 按标签子串将值归入记录字段，先命中者胜
///
/// "대상연령" 必须先于 "대상" 检查，否则会被后者的子串截获。
fn assign_labeled_field(record: &mut AnnouncementRecord, label: &str, value: String) {
    if label.contains("지원분야") {
        record.support_field = Some(value);
    } else if label.contains("대상연령") {
        record.age_range = Some(value);
    } else if label.contains("대상") {
        record.target = Some(value);
    } else if label.contains("창업업력") || label.contains("업력") {
        record.business_years = Some(value);
    } else if label.contains("지역") {
        record.region = Some(value);
    } else if label.contains("접수기간") {
        record.application_period = Some(value);
    } else if label.contains("주관기관") || label.contains("기관명") {
        record.organization = Some(value);
    } else if label.contains("연락처") {
        record.contact = Some(value);
    }
}

fn collapsed_text(el: &ElementRef<'_>) -> String {
    el.text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
