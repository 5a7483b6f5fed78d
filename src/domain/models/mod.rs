// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// 该模块定义了系统的核心业务实体，包括：
/// - 公告（announcement）：列表页候选项与规整后的公告记录
/// - 条件档案（filter_profile）：描述目标公司的申报条件
pub mod announcement;
pub mod filter_profile;
