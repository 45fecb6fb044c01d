//! The fixed set of fields extracted from a traffic-accident judgment.
//!
//! Order matters: it is the order the fields are listed in the prompt
//! template, and the canonical order for [`ExtractionResult::sorted_by_schema`].
//!
//! [`ExtractionResult::sorted_by_schema`]: crate::ExtractionResult::sorted_by_schema

/// Value the model is told to use for any field the document does not mention.
pub const EMPTY_VALUE: &str = "空";

/// Field names, in prompt order.
pub const FIELD_SCHEMA: [&str; 25] = [
    "案件类型",
    "文书ID",
    "案件名称一",
    "案件名称二",
    "案件编号",
    "裁判日期",
    "法院名称",
    "肇事人",
    "性别",
    "出生日期",
    "民族",
    "文化程度",
    "户籍所在地",
    "案发时间",
    "车辆品牌和车型",
    "事故发生地",
    "酒精",
    "伤亡数量",
    "驾照实习期开始",
    "驾驶实习期结束",
    "驾照类型",
    "实习期类型",
    "经济损失",
    "撤销案件号",
    "维持案件号",
];

/// Position of `name` in [`FIELD_SCHEMA`], if it is a schema field.
pub fn schema_position(name: &str) -> Option<usize> {
    FIELD_SCHEMA.iter().position(|&f| f == name)
}

pub fn is_schema_field(name: &str) -> bool {
    schema_position(name).is_some()
}
