// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use kstartup_crawler::application::use_cases::collect_announcements::AnnouncementCollector;
use kstartup_crawler::config::settings::{CrawlSettings, SiteSettings};
use kstartup_crawler::domain::services::detail_extraction_service::DetailExtractor;
use kstartup_crawler::domain::services::filter_service::CompanyFilter;
use kstartup_crawler::domain::services::link_extraction_service::LinkExtractor;
use kstartup_crawler::domain::models::filter_profile::CompanyFilterProfile;
use kstartup_crawler::engines::traits::{EngineError, PageFetcher};
use std::collections::HashMap;

const ORIGIN: &str = "https://www.k-startup.go.kr";
const LISTING: &str = "https://www.k-startup.go.kr/web/contents/bizpbanc-ongoing.do";

/// 返回预置标记文本的桩引擎
struct StubFetcher {
    listings: HashMap<String, String>,
    details: HashMap<String, String>,
    timeout_detail: Option<String>,
}

#[async_trait]
impl PageFetcher for StubFetcher {
    async fn fetch_listing(&self, url: &str) -> Result<String, EngineError> {
        self.listings
            .get(url)
            .cloned()
            .ok_or_else(|| EngineError::Navigation(format!("unknown listing: {}", url)))
    }

    async fn fetch_detail(&self, url: &str) -> Result<String, EngineError> {
        if self.timeout_detail.as_deref() == Some(url) {
            return Err(EngineError::Timeout);
        }
        self.details
            .get(url)
            .cloned()
            .ok_or_else(|| EngineError::Navigation(format!("unknown detail: {}", url)))
    }
}

fn site_settings() -> SiteSettings {
    SiteSettings {
        base_url: ORIGIN.to_string(),
        content_base: format!("{}/web/contents/", ORIGIN),
        list_document: "bizpbanc-ongoing.do".to_string(),
        id_param: "pbancSn".to_string(),
        class_code: "PBC010".to_string(),
        section_label: "신규 사업 공고".to_string(),
        ready_selectors: vec![".basic_item".to_string()],
    }
}

fn crawl_settings(start_page: u32, end_page: u32) -> CrawlSettings {
    CrawlSettings {
        start_page,
        end_page,
        nav_timeout_secs: 1,
        listing_settle_ms: 0,
        scroll_settle_ms: 0,
        detail_settle_ms: 0,
        selector_timeout_ms: 0,
        fallback_wait_ms: 0,
        sweep_cap: 50,
        user_agent: "test-agent".to_string(),
    }
}

fn listing_item(id: u32, title: &str) -> String {
    format!(
        r#"<div class="basic_item"><a href="/web/contents/bizpbanc-ongoing.do?schM=view&pbancSn={}">{}</a></div>"#,
        id, title
    )
}

fn detail_url(id: u32) -> String {
    format!("{}?schM=view&pbancSn={}", LISTING, id)
}

fn detail_page(title: &str, business_years: &str) -> String {
    format!(
        r#"<html><body>
            <h3>{}</h3>
            <ul>
                <li><p>지원분야</p><p>바이오·의료</p></li>
                <li><p>창업업력</p><p>{}</p></li>
                <li><p>지역</p><p>전국</p></li>
            </ul>
            <div class="ann_cont">공고 본문 내용입니다.</div>
        </body></html>"#,
        title, business_years
    )
}

/// 两页采集：第 1 页三个候选中有一个与第 2 页重复，另有一个详情超时。
/// 期望正好 4 条记录，其中 1 条为标题为空、错误信息非空的占位记录。
#[tokio::test]
async fn test_two_page_run_with_duplicate_and_timeout() {
    let page1 = format!(
        "<html><body>{}{}{}</body></html>",
        listing_item(111, "청년 헬스케어 창업지원 공고"),
        listing_item(222, "글로벌 진출 지원사업 공고"),
        listing_item(333, "바이오 스타트업 실증 공고")
    );
    let page2 = format!(
        "<html><body>{}{}</body></html>",
        listing_item(333, "바이오 스타트업 실증 공고"),
        listing_item(444, "중견기업 전용 지원사업 공고")
    );

    let mut listings = HashMap::new();
    listings.insert(format!("{}?page=1&pbancClssCd=PBC010", LISTING), page1);
    listings.insert(format!("{}?page=2&pbancClssCd=PBC010", LISTING), page2);

    let mut details = HashMap::new();
    details.insert(
        detail_url(111),
        detail_page("청년 헬스케어 창업지원 공고", "3년 이상 10년 이하"),
    );
    details.insert(
        detail_url(333),
        detail_page("바이오 스타트업 실증 공고", "전체"),
    );
    details.insert(
        detail_url(444),
        detail_page("중견기업 전용 지원사업 공고", "15년"),
    );

    let fetcher = StubFetcher {
        listings,
        details,
        timeout_detail: Some(detail_url(222)),
    };

    let site = site_settings();
    let crawl = crawl_settings(1, 2);
    let links = LinkExtractor::new(&site).unwrap();
    let extractor = DetailExtractor::new();
    let collector = AnnouncementCollector::new(&fetcher, &links, &extractor, &site, &crawl);

    let records = collector.collect_pages().await;

    assert_eq!(records.len(), 4);

    let stub = records
        .iter()
        .find(|r| r.is_error())
        .expect("one error stub expected");
    assert_eq!(stub.title, "");
    assert_eq!(stub.url, detail_url(222));
    assert_eq!(stub.external_id, Some("222".to_string()));
    assert!(!stub.error.as_deref().unwrap_or("").is_empty());

    // 跨页重复的 333 只收录一次
    let dup_count = records.iter().filter(|r| r.url == detail_url(333)).count();
    assert_eq!(dup_count, 1);

    let first = &records[0];
    assert_eq!(first.external_id, Some("111".to_string()));
    assert_eq!(first.title, "청년 헬스케어 창업지원 공고");
    assert_eq!(first.business_years.as_deref(), Some("3년 이상 10년 이하"));
}

/// 采集结果接上公司条件过滤：区间内与不限年限的通过，区间外的被排除，
/// 错误占位记录没有年限字段也通过。
#[tokio::test]
async fn test_collected_records_through_company_filter() {
    let page = format!(
        "<html><body>{}{}</body></html>",
        listing_item(11, "헬스케어 데이터 실증 지원 공고"),
        listing_item(12, "중견기업 전용 지원사업 공고")
    );

    let mut listings = HashMap::new();
    listings.insert(format!("{}?page=1&pbancClssCd=PBC010", LISTING), page);

    let mut details = HashMap::new();
    details.insert(
        detail_url(11),
        detail_page("헬스케어 데이터 실증 지원 공고", "5년 이하"),
    );
    details.insert(
        detail_url(12),
        detail_page("중견기업 전용 지원사업 공고", "15년"),
    );

    let fetcher = StubFetcher {
        listings,
        details,
        timeout_detail: None,
    };

    let site = site_settings();
    let crawl = crawl_settings(1, 1);
    let links = LinkExtractor::new(&site).unwrap();
    let extractor = DetailExtractor::new();
    let collector = AnnouncementCollector::new(&fetcher, &links, &extractor, &site, &crawl);

    let records = collector.collect_pages().await;
    assert_eq!(records.len(), 2);

    let filter = CompanyFilter::new(CompanyFilterProfile {
        support_field_keywords: vec!["헬스".to_string()],
        business_years_range: Some((3, 10)),
    });
    let kept: Vec<_> = records.iter().filter(|r| filter.matches(r)).collect();
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].external_id, Some("11".to_string()));
}

/// 某一页加载失败时跳过该页，其余页照常采集。
#[tokio::test]
async fn test_failed_page_is_skipped() {
    let page2 = format!(
        "<html><body>{}</body></html>",
        listing_item(21, "재도전 성공패키지 모집 공고")
    );

    let mut listings = HashMap::new();
    // 第 1 页缺席，fetch_listing 返回导航错误
    listings.insert(format!("{}?page=2&pbancClssCd=PBC010", LISTING), page2);

    let mut details = HashMap::new();
    details.insert(
        detail_url(21),
        detail_page("재도전 성공패키지 모집 공고", "전체"),
    );

    let fetcher = StubFetcher {
        listings,
        details,
        timeout_detail: None,
    };

    let site = site_settings();
    let crawl = crawl_settings(1, 2);
    let links = LinkExtractor::new(&site).unwrap();
    let extractor = DetailExtractor::new();
    let collector = AnnouncementCollector::new(&fetcher, &links, &extractor, &site, &crawl);

    let records = collector.collect_pages().await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].external_id, Some("21".to_string()));
}

/// 首页新公告栏目的浅采集：栏目链接与兜底扫描合并去重，不抓详情。
#[tokio::test]
async fn test_front_page_shallow_collection() {
    let front = r#"
        <html><body>
            <h3>신규 사업 공고</h3>
            <ul>
                <li><a href="/web/contents/bizpbanc-ongoing.do?schM=view&pbancSn=31">신규 창업도약 패키지 공고</a></li>
                <li><a href="/web/contents/bizpbanc-ongoing.do?schM=view&pbancSn=32">신규 글로벌 액셀러레이팅 공고</a></li>
            </ul>
        </body></html>
    "#;
    let ongoing = format!(
        "<html><body>{}{}</body></html>",
        listing_item(32, "신규 글로벌 액셀러레이팅 공고"),
        listing_item(33, "비대면 서비스 바우처 공고")
    );

    let mut listings = HashMap::new();
    listings.insert(ORIGIN.to_string(), front.to_string());
    listings.insert(LISTING.to_string(), ongoing);

    let fetcher = StubFetcher {
        listings,
        details: HashMap::new(),
        timeout_detail: None,
    };

    let site = site_settings();
    let crawl = crawl_settings(1, 1);
    let links = LinkExtractor::new(&site).unwrap();
    let extractor = DetailExtractor::new();
    let collector = AnnouncementCollector::new(&fetcher, &links, &extractor, &site, &crawl);

    let records = collector.collect_new_section().await;

    assert_eq!(records.len(), 3);
    assert!(records.iter().all(|r| !r.is_error()));
    assert!(records.iter().all(|r| r.support_field.is_none()));
    let ids: Vec<_> = records
        .iter()
        .map(|r| r.external_id.as_deref().unwrap_or(""))
        .collect();
    assert_eq!(ids, vec!["31", "32", "33"]);
}
