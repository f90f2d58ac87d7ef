//! URL helpers for locale path segments and query parameters

use url::Url;

/// Split a leading locale segment off `path`.
///
/// Only segments listed in `locales` count; anything else is left in place.
pub fn split_locale<'a>(path: &'a str, locales: &[String]) -> (Option<&'a str>, &'a str) {
    let trimmed = path.strip_prefix('/').unwrap_or(path);
    let (first, rest) = match trimmed.find('/') {
        Some(idx) => (&trimmed[..idx], &trimmed[idx..]),
        None => (trimmed, ""),
    };
    if !first.is_empty() && locales.iter().any(|l| l == first) {
        (Some(first), rest)
    } else {
        (None, path)
    }
}

/// Copy of `url` whose path starts with `locale`, keeping the rest of the
/// path, the query and the fragment.
pub fn with_locale(url: &Url, locale: &str, locales: &[String]) -> Url {
    let (_, rest) = split_locale(url.path(), locales);
    let rest = if rest == "/" { "" } else { rest };
    let mut out = url.clone();
    out.set_path(&format!("/{locale}{rest}"));
    out
}

/// First value of query parameter `key`
pub fn query_param(url: &Url, key: &str) -> Option<String> {
    url.query_pairs()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}

/// Set `key` to `value`, replacing earlier values and keeping every other
/// parameter in its original order.
pub fn set_query_param(url: &mut Url, key: &str, value: &str) {
    let mut pairs: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| k != key)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    pairs.push((key.to_string(), value.to_string()));

    url.query_pairs_mut().clear().extend_pairs(pairs);
}

/// Drop every value of `key`; clears the query entirely when nothing is left
pub fn remove_query_param(url: &mut Url, key: &str) {
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| k != key)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    if pairs.is_empty() {
        url.set_query(None);
    } else {
        url.query_pairs_mut().clear().extend_pairs(pairs);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn locales() -> Vec<String> {
        ["en", "ja", "es"].iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_split_locale() {
        let l = locales();
        assert_eq!(split_locale("/ja/actions/quickstart", &l), (Some("ja"), "/actions/quickstart"));
        assert_eq!(split_locale("/en", &l), (Some("en"), ""));
        assert_eq!(split_locale("/", &l), (None, "/"));
        assert_eq!(split_locale("/actions", &l), (None, "/actions"));
        assert_eq!(split_locale("/english/x", &l), (None, "/english/x"));
    }

    #[test]
    fn test_with_locale_preserves_path_query_and_fragment() {
        let url = Url::parse("http://localhost:4000/en/rest/repos?apiVersion=2022-11-28#list").unwrap();
        let out = with_locale(&url, "ja", &locales());
        assert_eq!(
            out.as_str(),
            "http://localhost:4000/ja/rest/repos?apiVersion=2022-11-28#list"
        );
    }

    #[test]
    fn test_with_locale_inserts_missing_segment() {
        let url = Url::parse("http://localhost:4000/get-started").unwrap();
        assert_eq!(with_locale(&url, "es", &locales()).path(), "/es/get-started");

        let root = Url::parse("http://localhost:4000/").unwrap();
        assert_eq!(with_locale(&root, "en", &locales()).path(), "/en");
    }

    #[test]
    fn test_set_query_param_keeps_other_params() {
        let mut url =
            Url::parse("http://localhost/en/search?search-overlay-input=git&query=old").unwrap();
        set_query_param(&mut url, "query", "git push");
        assert_eq!(query_param(&url, "query").as_deref(), Some("git push"));
        assert_eq!(query_param(&url, "search-overlay-input").as_deref(), Some("git"));
    }

    #[test]
    fn test_remove_query_param() {
        let mut url = Url::parse("http://localhost/en?apiVersion=1").unwrap();
        remove_query_param(&mut url, "apiVersion");
        assert_eq!(url.as_str(), "http://localhost/en");
    }
}
