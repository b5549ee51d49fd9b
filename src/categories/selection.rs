use crate::SelectionError;

/// Result of parsing a category selection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    /// Zero-based indices into the listed categories, in the order given
    pub indices: Vec<usize>,

    /// Tokens that could not be used
    pub rejected: Vec<SelectionError>,
}

impl Selection {
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Parses a selection such as `1,3,5` or `all`
///
/// Indices are 1-based as shown in the listing. Invalid tokens are collected
/// in `rejected` and otherwise ignored.
///
/// # Arguments
///
/// * `input` - Raw user input
/// * `count` - Number of listed categories
pub fn parse_selection(input: &str, count: usize) -> Selection {
    let input = input.trim();

    if input.eq_ignore_ascii_case("all") {
        return Selection {
            indices: (0..count).collect(),
            rejected: Vec::new(),
        };
    }

    let mut selection = Selection::default();
    for token in input.split(',') {
        let token = token.trim();
        match token.parse::<usize>() {
            Ok(n) if n >= 1 && n <= count => selection.indices.push(n - 1),
            Ok(_) => selection.rejected.push(SelectionError::OutOfRange {
                token: token.to_string(),
                max: count,
            }),
            Err(_) => selection
                .rejected
                .push(SelectionError::NotANumber(token.to_string())),
        }
    }
    selection
}
