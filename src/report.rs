//! Markdown report rendering.
//!
//! Purely presentational: an [`AnalysisResult`] plus the original image path
//! become a human-readable document with a generation timestamp, a metadata
//! table, and one section per question. No business logic lives here.

use crate::output::AnalysisResult;
use chrono::Local;
use std::path::Path;

/// Render the analysis result as a Markdown report.
pub fn render_report(result: &AnalysisResult, image_path: &str) -> String {
    render_report_at(result, image_path, &Local::now().format("%Y-%m-%d %H:%M:%S").to_string())
}

/// Render with an explicit timestamp string. Split out so tests produce
/// stable output.
fn render_report_at(result: &AnalysisResult, image_path: &str, timestamp: &str) -> String {
    let filename = Path::new(image_path)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| image_path.to_string());

    let mut md = String::with_capacity(1024);
    md.push_str("# 图片题目解析报告\n\n");
    md.push_str(&format!("生成时间：{timestamp}\n\n"));

    md.push_str("| 项目 | 内容 |\n");
    md.push_str("| --- | --- |\n");
    md.push_str(&format!("| 文件名 | {filename} |\n"));
    md.push_str(&format!("| 路径 | {image_path} |\n"));
    md.push_str(&format!(
        "| 解析状态 | {} |\n\n",
        if result.is_success() { "成功" } else { "失败" }
    ));

    if result.is_success() {
        md.push_str("## 题目列表\n\n");
        for (i, question) in result.questions().iter().enumerate() {
            md.push_str(&format!("### 问题 {}\n\n", i + 1));
            md.push_str(&format!("- 题型：{}\n\n", question.kind.label()));
            md.push_str(&format!("{}\n\n", question.text));
            if !question.options.is_empty() {
                md.push_str("选项：\n\n");
                for (j, option) in question.options.iter().enumerate() {
                    md.push_str(&format!("{}. {}\n", option_letter(j), option));
                }
                md.push('\n');
            }
        }
    } else {
        md.push_str("## 解析失败\n\n");
        md.push_str(&format!(
            "{}\n",
            result.message.as_deref().unwrap_or("未知错误")
        ));
    }

    md
}

/// Letter an option index: A, B, …, Z, then wraps.
fn option_letter(index: usize) -> char {
    (b'A' + (index % 26) as u8) as char
}
