// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域层模块
///
/// 该模块包含系统的核心业务逻辑，包括：
/// - 领域模型（models）：公告候选项、公告记录与公司条件档案
/// - 服务（services）：链接提取、详情提取与条件过滤
///
/// 领域层是系统的核心，不依赖浏览器引擎或文件导出等外部实现。
pub mod models;
pub mod services;
