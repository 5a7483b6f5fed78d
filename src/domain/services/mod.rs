// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// 该模块包含系统的核心业务逻辑服务：
/// - 链接提取服务（link_extraction_service）：从列表标记中提取公告候选项
/// - 详情提取服务（detail_extraction_service）：将详情标记解析为公告记录
/// - 过滤服务（filter_service）：按公司条件档案筛选公告记录
pub mod detail_extraction_service;
pub mod filter_service;
pub mod link_extraction_service;
