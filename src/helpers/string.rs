//! Text helpers shared by validation messages.

/// Renders names as a bracketed, single-quoted list, e.g. `['Country', 'Station From']`.
pub(crate) fn quoted_list<S: AsRef<str>>(items: &[S]) -> String {
    let items: Vec<String> = items
        .iter()
        .map(|item| format!("'{}'", item.as_ref().replace('\'', "\\'")))
        .collect();
    format!("[{}]", items.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quoted_list_formats_names() {
        assert_eq!(
            quoted_list(&["Country", "Station From", "Station To"]),
            "['Country', 'Station From', 'Station To']"
        );
        assert_eq!(quoted_list::<&str>(&[]), "[]");
        assert_eq!(quoted_list(&["it's".to_owned()]), "['it\\'s']");
    }
}
