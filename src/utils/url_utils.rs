// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use url::Url;

/// 将公告链接规整为绝对地址
///
/// 目标站点的列表标记中同时存在绝对地址、根相对地址和裸文档名三种
/// 形式：绝对地址原样通过，根相对地址以站点源为基准解析，其余一律
/// 挂到内容根路径下，并剥掉开头的路径分隔符避免出现双斜杠。
pub fn normalize_announcement_url(origin: &Url, content_base: &str, href: &str) -> String {
    if href.starts_with("http") {
        return href.to_string();
    }
    if href.starts_with('/') {
        return match origin.join(href) {
            Ok(resolved) => resolved.to_string(),
            Err(_) => format!("{}{}", origin.as_str().trim_end_matches('/'), href),
        };
    }
    format!("{}{}", content_base, href.trim_start_matches('/'))
}

/// 从链接中取出指定查询参数的值
///
/// 取 `key=` 之后直到下一个 `&` 或字符串结尾的子串，找不到键或值为空时
/// 返回 `None`。
pub fn query_param_value(href: &str, key: &str) -> Option<String> {
    let needle = format!("{}=", key);
    let start = href.find(&needle)? + needle.len();
    let rest = &href[start..];
    let end = rest.find('&').unwrap_or(rest.len());
    let value = &rest[..end];
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
