// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use kstartup_crawler::domain::models::announcement::AnnouncementRecord;
use kstartup_crawler::infrastructure::export;

fn full_record() -> AnnouncementRecord {
    let mut record =
        AnnouncementRecord::new("https://www.k-startup.go.kr/web/contents/bizpbanc-ongoing.do?schM=view&pbancSn=1");
    record.title = "헬스케어 창업기업 모집 공고".to_string();
    record.external_id = Some("1".to_string());
    record.support_field = Some("바이오·의료".to_string());
    record.age_range = Some("만 39세 이하".to_string());
    record.target = Some("창업기업".to_string());
    record.business_years = Some("3년 이상 10년 이하".to_string());
    record.region = Some("전국".to_string());
    record.application_period = Some("2025-08-01 ~ 2025-08-31".to_string());
    record.organization = Some("창업진흥원".to_string());
    record.contact = Some("02-123-4567".to_string());
    record.content = Some("사업 개요, 신청 방법".to_string());
    record
}

fn stub_record() -> AnnouncementRecord {
    AnnouncementRecord::error_stub(
        "https://www.k-startup.go.kr/web/contents/bizpbanc-ongoing.do?schM=view&pbancSn=2",
        "Timeout",
    )
}

/// JSON 导出再解析应得到逐字段一致的记录集。
#[tokio::test]
async fn test_json_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("announcements.json");
    let records = vec![full_record(), stub_record()];

    export::write_json(&path, &records).await.unwrap();

    let body = tokio::fs::read_to_string(&path).await.unwrap();
    let parsed: Vec<AnnouncementRecord> = serde_json::from_str(&body).unwrap();
    assert_eq!(parsed, records);
}

/// CSV 导出：BOM 开头、表头为键并集的有序排列、缺失字段渲染为空。
#[tokio::test]
async fn test_csv_shape() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("announcements.csv");
    let records = vec![full_record(), stub_record()];

    export::write_csv(&path, &records).await.unwrap();

    let body = tokio::fs::read_to_string(&path).await.unwrap();
    assert!(body.starts_with('\u{feff}'));

    let mut lines = body.trim_start_matches('\u{feff}').split("\r\n");
    let header: Vec<&str> = lines.next().unwrap().split(',').collect();

    // 并集包含完整记录的全部键加上占位记录的 error 键，且有序
    let mut expected = vec![
        "age_range",
        "application_period",
        "business_years",
        "contact",
        "content",
        "error",
        "external_id",
        "organization",
        "region",
        "scraped_at",
        "support_field",
        "target",
        "title",
        "url",
    ];
    expected.sort_unstable();
    assert_eq!(header, expected);

    let rows: Vec<&str> = lines.filter(|l| !l.is_empty()).collect();
    assert_eq!(rows.len(), 2);

    // 占位记录行：error 列非空，support_field 列为空
    let error_idx = header.iter().position(|h| *h == "error").unwrap();
    let support_idx = header.iter().position(|h| *h == "support_field").unwrap();
    let stub_cells: Vec<&str> = rows[1].split(',').collect();
    assert_eq!(stub_cells[error_idx], "Timeout");
    assert_eq!(stub_cells[support_idx], "");
}

/// 空集导出 JSON 应得到空数组，解析后记录数为零。
#[tokio::test]
async fn test_empty_set_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.json");

    export::write_json(&path, &[]).await.unwrap();

    let body = tokio::fs::read_to_string(&path).await.unwrap();
    let parsed: Vec<AnnouncementRecord> = serde_json::from_str(&body).unwrap();
    assert!(parsed.is_empty());
}
