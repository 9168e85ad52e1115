/// Box drawn in front of every checklist item (U+2610 BALLOT BOX)
pub const CHECKBOX: char = '\u{2610}';

/// Turn `milk,eggs` into one checkbox item per line
pub fn to_checklist(input: &str) -> String {
    input
        .split(',')
        .map(|item| format!("{CHECKBOX} {item}"))
        .collect::<Vec<_>>()
        .join("\n")
}
