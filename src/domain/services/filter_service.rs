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
use crate::domain::models::filter_profile::CompanyFilterProfile;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info};

/// 紧跟年限单位的整数，如 "3년"、"10년"
static YEARS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+)년").unwrap());

/// 表示不限年限的文案
const ALL_YEARS_TOKEN: &str = "전체";

/// 表示 "未满 N 年" 的限定词
const UNDER_TOKEN: &str = "미만";

/// 公司条件过滤服务
///
/// 对规整后的公告记录做纯函数式的匹配判定，无任何副作用（日志除外）。
pub struct CompanyFilter {
    profile: CompanyFilterProfile,
}

impl CompanyFilter {
    pub fn new(profile: CompanyFilterProfile) -> Self {
        Self { profile }
    }

    /// 判定一条公告是否符合公司条件
    ///
    /// 关键词规则只产生日志提示，从不单独排除记录；最终判定由
    /// 经营年限规则与规模规则共同决定。
    pub fn matches(&self, record: &AnnouncementRecord) -> bool {
        let keywords = self.matched_keywords(record);
        if keywords.is_empty() {
            debug!(url = %record.url, "no profile keywords found; record kept");
        } else {
            info!(url = %record.url, keywords = ?keywords, "profile keywords matched");
        }

        self.passes_business_years(record.business_years.as_deref())
            && self.passes_company_size(record)
    }

    /// 关键词提示规则
    ///
    /// 在标题、支援领域、正文与支援对象拼成的文本中做大小写无关的
    /// 子串查找，返回命中的关键词列表。
    pub fn matched_keywords(&self, record: &AnnouncementRecord) -> Vec<&str> {
        let blob = format!(
            "{} {} {} {}",
            record.title,
            record.support_field.as_deref().unwrap_or(""),
            record.content.as_deref().unwrap_or(""),
            record.target.as_deref().unwrap_or(""),
        )
        .to_lowercase();

        self.profile
            .support_field_keywords
            .iter()
            .filter(|keyword| blob.contains(&keyword.to_lowercase()))
            .map(String::as_str)
            .collect()
    }

    /// 经营年限规则
    ///
    /// 未配置区间、字段缺失、写明不限或提取不到任何年限数字时一律放行。
    /// 提取到的年限只要有一个落在闭区间内即放行；全部落在区间外时，
    /// 仅当文本带有 "未满" 限定词才放行。
    fn passes_business_years(&self, business_years: Option<&str>) -> bool {
        let Some((min, max)) = self.profile.business_years_range else {
            return true;
        };
        let Some(text) = business_years else {
            return true;
        };
        let text = text.to_lowercase();
        if text.is_empty() || text.contains(ALL_YEARS_TOKEN) {
            return true;
        }

        let years: Vec<u32> = YEARS_RE
            .captures_iter(&text)
            .filter_map(|caps| caps[1].parse().ok())
            .collect();
        if years.is_empty() {
            return true;
        }
        if years.iter().any(|y| (min..=max).contains(y)) {
            return true;
        }
        text.contains(UNDER_TOKEN)
    }

    /// 规模规则
    ///
    /// 公告中极少写明企业规模，暂不判定，预留扩展位。
    fn passes_company_size(&self, _record: &AnnouncementRecord) -> bool {
        true
    }
}
