//! System and user prompts for exam-question extraction.
//!
//! Centralising every prompt here serves two purposes:
//!
//! 1. **Single source of truth** — tweaking the classification rules or the
//!    required output shape happens in exactly one place.
//!
//! 2. **Testability** — unit tests can inspect the prompts directly without a
//!    live model, so prompt regressions are caught early.
//!
//! Callers can override both via [`crate::config::AnalysisConfig`]; the
//! constants here are used only when no override is provided.

/// Default system prompt: classification, option-cleaning, and splitting rules.
///
/// Used when `AnalysisConfig::system_prompt` is `None`.
pub const DEFAULT_SYSTEM_PROMPT: &str = r#"你是一个专业的试卷题目解析助手。请识别图片中的全部题目，并严格遵守以下规则：

1. 题型分类
   - 选择题：带有 A、B、C、D 等候选项的题目
   - 填空题：带有下划线、括号或空格等待填写位置的题目
   - 解答题：需要写出完整解题过程、证明或论述的题目

2. 选项清理
   - 去掉选项开头的字母编号及标点（如 "A."、"B、"、"(C)"）
   - 去掉选项首尾多余的空白字符
   - 每个选项单独成条，保持图片中的原有顺序
   - 填空题和解答题的 options 必须是空数组

3. 题目拆分
   - 每道题独立输出，不要把相邻的题目合并成一条
   - 题干开头的题号（如 "1."、"（2）"）应当去除
   - 含多个小问的大题按一道解答题处理，小问保留在题目文本中"#;

/// Default user prompt: the required JSON output shape.
///
/// Used when `AnalysisConfig::user_prompt` is `None`.
pub const DEFAULT_USER_PROMPT: &str = r#"请解析图片中的题目，并严格按照下面的 JSON 格式输出，不要输出任何其他内容（包括 Markdown 代码块标记）：

{
  "status": "success",
  "data": {
    "questions": [
      {
        "type": "选择题",
        "text": "题目内容",
        "options": ["选项内容1", "选项内容2"]
      }
    ]
  }
}"#;
