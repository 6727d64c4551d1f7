use crate::validate::FieldRule;

pub const CREATE: &[FieldRule] = &[
    FieldRule::string("title").required().max_length(255),
    FieldRule::string("director").required().max_length(255),
    FieldRule::number("year").required().greater_than(1887.0),
    FieldRule::boolean("color").required(),
    FieldRule::number("duration").required(),
];

// Same rules, nothing mandatory: a partial update only has to satisfy the
// bounds of the fields it actually supplies.
pub const UPDATE: &[FieldRule] = &[
    FieldRule::string("title").max_length(255),
    FieldRule::string("director").max_length(255),
    FieldRule::number("year").greater_than(1887.0),
    FieldRule::boolean("color"),
    FieldRule::number("duration"),
];
