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

use kstartup_crawler::application::use_cases::collect_announcements::AnnouncementCollector;
use kstartup_crawler::config::settings::Settings;
use kstartup_crawler::domain::models::announcement::AnnouncementRecord;
use kstartup_crawler::domain::services::detail_extraction_service::DetailExtractor;
use kstartup_crawler::domain::services::filter_service::CompanyFilter;
use kstartup_crawler::domain::services::link_extraction_service::LinkExtractor;
use kstartup_crawler::engines::browser_engine::BrowserSession;
use kstartup_crawler::infrastructure::export;
use kstartup_crawler::utils::telemetry;
use std::path::Path;
use tracing::{error, info};

/// 主函数
///
/// 应用程序入口点：初始化日志与配置，驱动一次完整的采集、过滤与导出。
/// 个别公告失败不影响退出码，进程完成即以 0 退出。
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize logging
    telemetry::init_telemetry();
    info!("Starting kstartup-crawler...");

    // 2. Load configuration
    let settings = Settings::new()?;
    info!("Configuration loaded");
    info!(
        pages = %format!("{}..={}", settings.crawl.start_page, settings.crawl.end_page),
        keywords = ?settings.filter.support_field_keywords,
        years = %format!(
            "{}-{}",
            settings.filter.business_years_min, settings.filter.business_years_max
        ),
        "company profile"
    );

    // 3. Build extraction services
    let links = LinkExtractor::new(&settings.site)?;
    let details = DetailExtractor::new();

    // 4. Launch the browser session
    let session = match BrowserSession::launch(
        &settings.crawl,
        settings.site.ready_selectors.clone(),
    )
    .await
    {
        Ok(session) => session,
        Err(e) => {
            error!(error = %e, "browser launch failed, nothing collected");
            return Ok(());
        }
    };

    // 5. Run the pipeline and release the browser on every path
    let collector =
        AnnouncementCollector::new(&session, &links, &details, &settings.site, &settings.crawl);
    let records = collector.collect_pages().await;
    session.close().await;

    info!(total = records.len(), "announcements collected");
    if records.is_empty() {
        info!("nothing collected; skipping export");
        return Ok(());
    }

    // 6. Apply the company profile filter
    let filter = CompanyFilter::new(settings.filter_profile());
    let filtered: Vec<AnnouncementRecord> = records
        .iter()
        .filter(|record| filter.matches(record))
        .cloned()
        .collect();
    info!(matched = filtered.len(), "company profile filter applied");

    // 7. Export results
    let out_dir = Path::new(&settings.export.output_dir);
    if filtered.is_empty() {
        info!("no announcements matched the company profile");
    } else {
        let base = &settings.export.filtered_basename;
        export::write_json(&out_dir.join(format!("{}.json", base)), &filtered).await?;
        export::write_csv(&out_dir.join(format!("{}.csv", base)), &filtered).await?;
        preview(&filtered);
    }

    let base = &settings.export.all_basename;
    export::write_json(&out_dir.join(format!("{}.json", base)), &records).await?;
    export::write_csv(&out_dir.join(format!("{}.csv", base)), &records).await?;

    Ok(())
}

/// 过滤结果预览
fn preview(records: &[AnnouncementRecord]) {
    for (index, record) in records.iter().enumerate() {
        info!("{}. {}", index + 1, record.title);
        info!("   지원분야: {}", field(&record.support_field));
        info!("   업력: {}", field(&record.business_years));
        info!("   대상: {}", field(&record.target));
        info!("   지역: {}", field(&record.region));
        info!("   접수기간: {}", field(&record.application_period));
        info!("   URL: {}", record.url);
    }
}

fn field(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("N/A")
}
