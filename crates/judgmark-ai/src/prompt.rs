//! Prompt templates for judgment field extraction.

use judgmark_core::{EMPTY_VALUE, FIELD_SCHEMA};

use crate::client::ChatMessage;

// ── Prompt templates ──

pub const SYSTEM_PROMPT: &str = "\
角色：
你是一位专业且经验丰富的法律文书信息提取助手。

背景：
我们有一系列交通事故相关的法律文书，需要从中提取关键信息。

知识：
法律文书包含了诸如案件类型、文书ID、案件名称、案件编号、裁判日期等多方面的信息。

任务：
仔细阅读输入的法律文书，按照规定的JSON格式准确提取各项信息。若文书中未提及某项信息，则对应字段填写“空”。

其他：
JSON格式不用加上```json```标记，直接填写即可。";

const USER_PROMPT_HEADER: &str = "请从以下法律文书中提取相关信息：";

/// One `"field": "空",` line per schema field, no comma after the last.
pub fn field_template() -> String {
    FIELD_SCHEMA
        .iter()
        .map(|field| format!("\"{field}\": \"{EMPTY_VALUE}\""))
        .collect::<Vec<_>>()
        .join(",\n")
}

/// Header, field template, then the judgment text appended as-is.
pub fn build_user_prompt(judgment_text: &str) -> String {
    format!(
        "{USER_PROMPT_HEADER}\n{template}\n{judgment_text}",
        template = field_template(),
    )
}

pub fn build_messages(judgment_text: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(SYSTEM_PROMPT),
        ChatMessage::user(build_user_prompt(judgment_text)),
    ]
}
