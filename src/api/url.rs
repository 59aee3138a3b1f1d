//! URL assembly helpers for endpoint builders.

/// Replace every `{name}` placeholder in `template` with its value.
pub(crate) fn inject(template: &str, params: &[(&str, &str)]) -> String {
    let mut url = template.to_string();
    for (name, value) in params {
        url = url.replace(&format!("{{{name}}}"), value);
    }
    url
}

/// Append the present query parameters to `url`.
pub(crate) fn with_query(url: &str, params: &[(&str, Option<String>)]) -> String {
    let query: Vec<String> = params
        .iter()
        .filter_map(|(name, value)| value.as_ref().map(|v| format!("{name}={v}")))
        .collect();
    if query.is_empty() {
        url.to_string()
    } else {
        format!("{url}?{}", query.join("&"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inject_replaces_every_placeholder() {
        let url = inject(
            "https://{region}.example.invalid/items/{id}",
            &[("region", "na1"), ("id", "42")],
        );
        assert_eq!(url, "https://na1.example.invalid/items/42");
    }

    #[test]
    fn test_inject_leaves_unknown_placeholders_alone() {
        let url = inject("/items/{id}", &[("other", "x")]);
        assert_eq!(url, "/items/{id}");
    }

    #[test]
    fn test_with_query_skips_absent_parameters() {
        let url = with_query(
            "/items",
            &[
                ("page", Some("2".to_string())),
                ("filter", None),
                ("count", Some("20".to_string())),
            ],
        );
        assert_eq!(url, "/items?page=2&count=20");
    }

    #[test]
    fn test_with_query_without_parameters_is_the_url() {
        assert_eq!(with_query("/items", &[]), "/items");
        assert_eq!(with_query("/items", &[("filter", None)]), "/items");
    }
}
