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

use crate::config::settings::{CrawlSettings, SiteSettings};
use crate::domain::models::announcement::{AnnouncementCandidate, AnnouncementRecord};
use crate::domain::services::detail_extraction_service::DetailExtractor;
use crate::domain::services::link_extraction_service::LinkExtractor;
use crate::engines::traits::PageFetcher;
use scraper::Html;
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// 公告采集用例
///
/// 编排"列表导航 → 链接提取 → 详情提取 → 累积"的完整流程。对外部
/// 站点的请求严格串行：一个候选项的详情取完之前不会触碰下一个，
/// 一页的候选项处理完之前不会翻页。
pub struct AnnouncementCollector<'a, F: PageFetcher> {
    fetcher: &'a F,
    links: &'a LinkExtractor,
    details: &'a DetailExtractor,
    site: &'a SiteSettings,
    crawl: &'a CrawlSettings,
}

impl<'a, F: PageFetcher> AnnouncementCollector<'a, F> {
    pub fn new(
        fetcher: &'a F,
        links: &'a LinkExtractor,
        details: &'a DetailExtractor,
        site: &'a SiteSettings,
        crawl: &'a CrawlSettings,
    ) -> Self {
        Self {
            fetcher,
            links,
            details,
            site,
            crawl,
        }
    }

    /// 逐页采集进行中公告并抓取详情
    ///
    /// 单页失败只跳过该页；单个候选项失败落成错误占位记录；跨页
    /// 以规整地址去重。无论中途发生什么，已积累的记录都会返回。
    pub async fn collect_pages(&self) -> Vec<AnnouncementRecord> {
        let mut records = Vec::new();
        let mut seen_urls: HashSet<String> = HashSet::new();

        for page_num in self.crawl.start_page..=self.crawl.end_page {
            info!(page = page_num, "crawling listing page");
            let url = format!(
                "{}?page={}&pbancClssCd={}",
                self.site.listing_url(),
                page_num,
                self.site.class_code
            );

            let html = match self.fetcher.fetch_listing(&url).await {
                Ok(html) => html,
                Err(e) => {
                    warn!(page = page_num, error = %e, "listing fetch failed, skipping page");
                    continue;
                }
            };

            let candidates = self.extract_candidates(&html);
            info!(
                page = page_num,
                count = candidates.len(),
                "announcements discovered"
            );

            let total = candidates.len();
            for (index, candidate) in candidates.into_iter().enumerate() {
                if !seen_urls.insert(candidate.url.clone()) {
                    debug!(url = %candidate.url, "already collected in this run");
                    continue;
                }
                info!(
                    "[{}/{}] {}",
                    index + 1,
                    total,
                    truncate_chars(&candidate.title, 50)
                );
                let mut record = self.details.extract(self.fetcher, &candidate.url).await;
                record.external_id = candidate.external_id;
                records.push(record);
            }
        }

        records
    }

    /// 采集首页新公告栏目（浅记录，不抓详情）
    ///
    /// 首页栏目之外，再对进行中公告列表做一次有上限的兜底扫描，
    /// 两部分按规整地址合并去重。
    pub async fn collect_new_section(&self) -> Vec<AnnouncementRecord> {
        let mut records = Vec::new();
        let mut seen_urls: HashSet<String> = HashSet::new();

        info!("crawling front page announcement section");
        match self.fetcher.fetch_listing(&self.site.base_url).await {
            Ok(html) => {
                for candidate in self.extract_candidates(&html) {
                    if seen_urls.insert(candidate.url.clone()) {
                        info!("  - {}", candidate.title);
                        records.push(shallow_record(candidate));
                    }
                }
            }
            Err(e) => {
                warn!(error = %e, "front page fetch failed");
            }
        }

        info!("sweeping the ongoing listing for additional announcements");
        match self.fetcher.fetch_listing(&self.site.listing_url()).await {
            Ok(html) => {
                for candidate in self
                    .extract_candidates(&html)
                    .into_iter()
                    .take(self.crawl.sweep_cap)
                {
                    if seen_urls.insert(candidate.url.clone()) {
                        info!("  - {}", candidate.title);
                        records.push(shallow_record(candidate));
                    }
                }
            }
            Err(e) => {
                warn!(error = %e, "ongoing listing fetch failed");
            }
        }

        info!(total = records.len(), "front page collection finished");
        records
    }

    /// 在独立作用域里解析文档，避免跨 await 持有解析树
    fn extract_candidates(&self, html: &str) -> Vec<AnnouncementCandidate> {
        let doc = Html::parse_document(html);
        self.links.extract(&doc)
    }
}

/// 由候选项直接落成的浅记录
fn shallow_record(candidate: AnnouncementCandidate) -> AnnouncementRecord {
    let mut record = AnnouncementRecord::new(candidate.url);
    record.title = candidate.title;
    record.external_id = candidate.external_id;
    record
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        format!("{}...", text.chars().take(max_chars).collect::<String>())
    }
}
