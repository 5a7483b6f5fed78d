// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 公司条件档案
///
/// 描述目标公司申报条件的声明式过滤配置，每次运行构造一次。
#[derive(Debug, Clone)]
pub struct CompanyFilterProfile {
    /// 支援领域关键词（子串匹配，仅作参考提示）
    pub support_field_keywords: Vec<String>,
    /// 经营年限的包含区间，`None` 表示不按年限过滤
    pub business_years_range: Option<(u32, u32)>,
}
