use std::ffi::OsStr;

/// Compares a stored link target against a desired target under
/// windows-family rules: `/` and `\` are interchangeable, and a leading
/// drive letter compares case-insensitively. Everything after the drive
/// prefix compares exactly.
#[must_use]
pub fn windows_targets_equal(actual: &OsStr, expected: &str) -> bool {
    let Some(actual) = actual.to_str() else {
        return false;
    };
    let actual = normalize_separators(actual);
    let expected = normalize_separators(expected);
    match (split_drive(&actual), split_drive(&expected)) {
        (Some((drive_a, rest_a)), Some((drive_b, rest_b))) => {
            drive_a.eq_ignore_ascii_case(drive_b) && rest_a == rest_b
        }
        (None, None) => actual == expected,
        _ => false,
    }
}

fn normalize_separators(text: &str) -> String {
    text.replace('/', "\\")
}

fn split_drive(text: &str) -> Option<(&str, &str)> {
    let bytes = text.as_bytes();
    if bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' {
        Some((&text[..1], &text[1..]))
    } else {
        None
    }
}
