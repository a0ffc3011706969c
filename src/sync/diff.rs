use std::fmt;

/// Characters of context shown on each side of a difference
pub const CONTEXT_CHARS: usize = 30;

/// Where two contents first diverge
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FirstDifference {
    /// Both sides have a character at `index` and they differ
    Character {
        index: usize,
        old: String,
        new: String,
    },
    /// One side is a prefix of the other
    Length { old_tail: String, new_tail: String },
}

/// Locate the first differing character of `old` and `new`
///
/// Returns `None` when the contents are identical. Indices count
/// characters, not bytes.
pub fn first_difference(old: &str, new: &str) -> Option<FirstDifference> {
    let mut old_chars = old.char_indices();
    let mut new_chars = new.char_indices();
    let mut index = 0;

    loop {
        match (old_chars.next(), new_chars.next()) {
            (Some((ob, oc)), Some((nb, nc))) => {
                if oc != nc {
                    return Some(FirstDifference::Character {
                        index,
                        old: old[ob..].chars().take(CONTEXT_CHARS).collect(),
                        new: new[nb..].chars().take(CONTEXT_CHARS).collect(),
                    });
                }
            }
            (Some((ob, _)), None) => {
                return Some(FirstDifference::Length {
                    old_tail: old[ob..].to_string(),
                    new_tail: String::new(),
                })
            }
            (None, Some((nb, _))) => {
                return Some(FirstDifference::Length {
                    old_tail: String::new(),
                    new_tail: new[nb..].to_string(),
                })
            }
            (None, None) => return None,
        }
        index += 1;
    }
}

impl fmt::Display for FirstDifference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FirstDifference::Character { index, old, new } => {
                write!(f, "Character {} differs:\nOld: {:?}\nNew: {:?}", index, old, new)
            }
            FirstDifference::Length { old_tail, new_tail } => write!(
                f,
                "Strings are different lengths:\nOld tail: {:?}\nNew tail: {:?}",
                old_tail, new_tail
            ),
        }
    }
}
