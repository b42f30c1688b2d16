use crate::collector::Collector;

/// Concatenates string-like elements with a delimiter, wrapped in `prefix` and
/// `suffix` at finish time.
///
/// The accumulator is `None` until the first element arrives, so no leading
/// delimiter is ever written and empty strings are still joined faithfully.
#[derive(Clone, Debug, Default)]
pub struct Joining {
    delimiter: String,
    prefix: String,
    suffix: String,
}

pub fn joining(delimiter: impl Into<String>) -> Joining {
    Joining {
        delimiter: delimiter.into(),
        ..Joining::default()
    }
}

pub fn joining_with(
    delimiter: impl Into<String>,
    prefix: impl Into<String>,
    suffix: impl Into<String>,
) -> Joining {
    Joining {
        delimiter: delimiter.into(),
        prefix: prefix.into(),
        suffix: suffix.into(),
    }
}

impl<S: AsRef<str>> Collector<S, Option<String>, String> for Joining {
    fn zero(&self) -> Option<String> {
        None
    }

    fn accumulate(&self, acc: &mut Option<String>, item: S) {
        match acc {
            Some(joined) => {
                joined.push_str(&self.delimiter);
                joined.push_str(item.as_ref());
            }
            None => *acc = Some(item.as_ref().to_owned()),
        }
    }

    fn combine(&self, acc: &mut Option<String>, other: Option<String>) {
        let Some(tail) = other else { return };
        match acc {
            Some(head) => {
                head.push_str(&self.delimiter);
                head.push_str(&tail);
            }
            None => *acc = Some(tail),
        }
    }

    fn finish(&self, acc: Option<String>) -> String {
        format!("{}{}{}", self.prefix, acc.unwrap_or_default(), self.suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn join_all(j: &Joining, items: &[&str]) -> String {
        let mut acc = Collector::<&str, _, _>::zero(j);
        for s in items {
            j.accumulate(&mut acc, *s);
        }
        Collector::<&str, _, _>::finish(j, acc)
    }

    #[test]
    fn no_leading_delimiter() {
        let j = joining(", ");
        assert_eq!(join_all(&j, &[]), "");
        assert_eq!(join_all(&j, &["a"]), "a");
        assert_eq!(join_all(&j, &["a", "b", "c"]), "a, b, c");
    }

    #[test]
    fn combine_inserts_single_delimiter() {
        let j = joining("-");
        let mut left = Some("a-b".to_string());
        Collector::<&str, _, _>::combine(&j, &mut left, Some("c".to_string()));
        assert_eq!(left.as_deref(), Some("a-b-c"));

        let mut empty: Option<String> = None;
        Collector::<&str, _, _>::combine(&j, &mut empty, Some("x".to_string()));
        Collector::<&str, _, _>::combine(&j, &mut empty, None);
        assert_eq!(empty.as_deref(), Some("x"));
    }

    #[test]
    fn prefix_and_suffix_wrap_result() {
        let j = joining_with("|", "[", "]");
        assert_eq!(join_all(&j, &["x", "y"]), "[x|y]");
        assert_eq!(join_all(&j, &[]), "[]");
    }
}
