//! Locale/version negotiation
//!
//! Runs on every navigation before the page is fetched. The locale cookie
//! decides where a request lands; the URL decides which version is shown.

use docsite_core::prelude::*;
use docsite_core::{query_param, remove_query_param, set_query_param, split_locale, with_locale};
use url::Url;

use crate::config::SiteSettings;
use crate::store::{PreferenceStore, ScopedStore, LOCALE_KEY, VERSION_KEY};

/// Where the effective version came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionSource {
    Url,
    Cookie,
    Default,
}

/// Outcome for a URL that can be served as is
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub locale: String,
    pub version: String,
    pub version_source: VersionSource,
    /// No locale cookie yet; the URL locale must be persisted
    pub write_locale_cookie: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Negotiation {
    Proceed(Resolved),
    Redirect(Url),
}

/// How an explicit version choice is applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionChange {
    /// Query-parameter version: swap the location without reloading
    ReplaceInPlace(Url),
    /// Path-segment version: full navigation
    Navigate(Url),
}

/// Resolve `url` against the locale cookie and the version context
pub fn negotiate(url: &Url, store: &ScopedStore, site: &SiteSettings) -> Negotiation {
    let (url_locale, _) = split_locale(url.path(), &site.locales);
    let cookie = store.get(LOCALE_KEY).filter(|c| {
        let known = site.has_locale(c);
        if !known {
            debug!("Ignoring unknown locale cookie '{}'", c);
        }
        known
    });

    let (locale, write_locale_cookie) = match (url_locale, cookie) {
        (Some(requested), Some(cookie)) if requested != cookie => {
            return Negotiation::Redirect(with_locale(url, &cookie, &site.locales));
        }
        (Some(requested), Some(_)) => (requested.to_string(), false),
        (Some(requested), None) => (requested.to_string(), true),
        (None, Some(cookie)) => {
            return Negotiation::Redirect(with_locale(url, &cookie, &site.locales));
        }
        (None, None) => {
            return Negotiation::Redirect(with_locale(url, &site.default_locale, &site.locales));
        }
    };

    let (version, version_source) = match requested_version(url, site) {
        Some(v) => (v, VersionSource::Url),
        None => match store.get(VERSION_KEY).filter(|v| !v.trim().is_empty()) {
            Some(v) => (v, VersionSource::Cookie),
            None => (site.default_version.clone(), VersionSource::Default),
        },
    };

    Negotiation::Proceed(Resolved {
        locale,
        version,
        version_source,
        write_locale_cookie,
    })
}

/// Version named by the URL: the version query parameter, else a path
/// segment right after the locale.
///
/// Query values are taken as given, since a page may offer versions the
/// config does not list; its picker checks them once the page is loaded.
/// Path segments must name a configured path version.
pub fn requested_version(url: &Url, site: &SiteSettings) -> Option<String> {
    if let Some(v) = query_param(url, &site.version_param) {
        if !v.trim().is_empty() {
            return Some(v);
        }
        debug!("Ignoring empty {}", site.version_param);
    }
    path_version(url, site).map(str::to_string)
}

fn path_version<'a>(url: &'a Url, site: &SiteSettings) -> Option<&'a str> {
    let (_, rest) = split_locale(url.path(), &site.locales);
    let segment = rest.trim_start_matches('/').split('/').next()?;
    site.version(segment)
        .filter(|v| v.in_path)
        .map(|_| segment)
}

/// Hostname substituted into code samples for `version`
pub fn version_hostname<'a>(site: &'a SiteSettings, version: &str) -> &'a str {
    site.version(version)
        .or_else(|| site.version(&site.default_version))
        .map(|v| v.hostname.as_str())
        .unwrap_or_default()
}

/// Location after explicitly choosing `locale`
pub fn locale_change(url: &Url, site: &SiteSettings, locale: &str) -> Result<Url> {
    if !site.has_locale(locale) {
        return Err(Error::UnknownLocale {
            locale: locale.to_string(),
        });
    }
    Ok(with_locale(url, locale, &site.locales))
}

/// Location after explicitly choosing `version`.
///
/// The config only decides whether the version lives in the path or in the
/// query. A version missing from the config is accepted when the current
/// page offers it and travels as a query parameter.
pub fn version_change(
    url: &Url,
    site: &SiteSettings,
    version: &str,
    offered_by_page: bool,
) -> Result<VersionChange> {
    let in_path = match site.version(version) {
        Some(target) => target.in_path,
        None if offered_by_page => false,
        None => {
            return Err(Error::UnknownVersion {
                version: version.to_string(),
            })
        }
    };

    let (locale, rest) = split_locale(url.path(), &site.locales);
    let locale = locale.unwrap_or(&site.default_locale);
    let current_in_path = path_version(url, site);

    if !in_path && current_in_path.is_none() {
        let mut next = url.clone();
        set_query_param(&mut next, &site.version_param, version);
        return Ok(VersionChange::ReplaceInPlace(next));
    }

    // Strip the current version segment, if any, then rebuild the path
    let remainder = match current_in_path {
        Some(current) => rest
            .trim_start_matches('/')
            .strip_prefix(current)
            .unwrap_or(rest),
        None => rest,
    };
    let remainder = remainder.trim_start_matches('/');

    let mut next = url.clone();
    remove_query_param(&mut next, &site.version_param);
    let path = match (in_path, remainder.is_empty()) {
        (true, true) => format!("/{locale}/{version}"),
        (true, false) => format!("/{locale}/{version}/{remainder}"),
        (false, true) => format!("/{locale}"),
        (false, false) => format!("/{locale}/{remainder}"),
    };
    next.set_path(&path);
    if !in_path {
        set_query_param(&mut next, &site.version_param, version);
    }
    Ok(VersionChange::Navigate(next))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::VersionSettings;
    use crate::store::MemoryStore;
    use std::sync::Arc;

    fn site() -> SiteSettings {
        SiteSettings {
            versions: vec![
                VersionSettings {
                    id: "free-pro-team@latest".into(),
                    hostname: "api.github.com".into(),
                    in_path: false,
                },
                VersionSettings {
                    id: "2022-11-28".into(),
                    hostname: "api.github.com".into(),
                    in_path: false,
                },
                VersionSettings {
                    id: "enterprise-server@3.12".into(),
                    hostname: "HOSTNAME/api/v3".into(),
                    in_path: true,
                },
            ],
            ..SiteSettings::default()
        }
    }

    fn store(entries: &[(&str, &str)]) -> ScopedStore {
        let mut mem = MemoryStore::new();
        for (k, v) in entries {
            mem = mem.with(k, v);
        }
        ScopedStore::negotiator(Arc::new(mem))
    }

    fn url(s: &str) -> Url {
        Url::parse(&format!("http://localhost:4000{s}")).unwrap()
    }

    #[test]
    fn test_cookie_locale_redirects_preserving_path_and_query() {
        let result = negotiate(
            &url("/en/rest/repos?apiVersion=2022-11-28"),
            &store(&[(LOCALE_KEY, "ja")]),
            &site(),
        );
        assert_eq!(
            result,
            Negotiation::Redirect(url("/ja/rest/repos?apiVersion=2022-11-28"))
        );
    }

    #[test]
    fn test_no_cookie_honours_url_locale() {
        let Negotiation::Proceed(resolved) = negotiate(&url("/es/actions"), &store(&[]), &site())
        else {
            panic!("expected proceed");
        };
        assert_eq!(resolved.locale, "es");
        assert!(resolved.write_locale_cookie);
        assert_eq!(resolved.version, "free-pro-team@latest");
        assert_eq!(resolved.version_source, VersionSource::Default);
    }

    #[test]
    fn test_matching_cookie_does_not_rewrite() {
        let Negotiation::Proceed(resolved) =
            negotiate(&url("/ja/actions"), &store(&[(LOCALE_KEY, "ja")]), &site())
        else {
            panic!("expected proceed");
        };
        assert!(!resolved.write_locale_cookie);
    }

    #[test]
    fn test_missing_locale_segment_redirects() {
        assert_eq!(
            negotiate(&url("/actions"), &store(&[(LOCALE_KEY, "ko")]), &site()),
            Negotiation::Redirect(url("/ko/actions"))
        );
        assert_eq!(
            negotiate(&url("/"), &store(&[]), &site()),
            Negotiation::Redirect(url("/en"))
        );
    }

    #[test]
    fn test_unknown_locale_cookie_is_ignored() {
        let Negotiation::Proceed(resolved) =
            negotiate(&url("/en/actions"), &store(&[(LOCALE_KEY, "xx")]), &site())
        else {
            panic!("expected proceed");
        };
        assert_eq!(resolved.locale, "en");
        assert!(resolved.write_locale_cookie);
    }

    #[test]
    fn test_version_precedence() {
        let site = site();
        let cookie = store(&[(LOCALE_KEY, "en"), (VERSION_KEY, "2022-11-28")]);

        let Negotiation::Proceed(r) = negotiate(&url("/en/rest"), &cookie, &site) else {
            panic!("expected proceed");
        };
        assert_eq!((r.version.as_str(), r.version_source), ("2022-11-28", VersionSource::Cookie));

        let Negotiation::Proceed(r) = negotiate(
            &url("/en/rest?apiVersion=free-pro-team@latest"),
            &cookie,
            &site,
        ) else {
            panic!("expected proceed");
        };
        assert_eq!(r.version_source, VersionSource::Url);
        assert_eq!(r.version, "free-pro-team@latest");

        let Negotiation::Proceed(r) =
            negotiate(&url("/en/enterprise-server@3.12/admin"), &cookie, &site)
        else {
            panic!("expected proceed");
        };
        assert_eq!(r.version, "enterprise-server@3.12");
    }

    #[test]
    fn test_version_hostname_falls_back_to_default() {
        let site = site();
        assert_eq!(version_hostname(&site, "enterprise-server@3.12"), "HOSTNAME/api/v3");
        assert_eq!(version_hostname(&site, "nope"), "api.github.com");
    }

    #[test]
    fn test_locale_change() {
        let site = site();
        assert_eq!(
            locale_change(&url("/en/actions?x=1"), &site, "ja").unwrap(),
            url("/ja/actions?x=1")
        );
        assert!(matches!(
            locale_change(&url("/en"), &site, "xx"),
            Err(Error::UnknownLocale { .. })
        ));
    }

    #[test]
    fn test_query_version_change_is_in_place() {
        let change =
            version_change(&url("/en/rest/repos?per_page=5"), &site(), "2022-11-28", false).unwrap();
        let VersionChange::ReplaceInPlace(next) = change else {
            panic!("expected in-place replace");
        };
        assert_eq!(next.path(), "/en/rest/repos");
        assert_eq!(query_param(&next, "apiVersion").as_deref(), Some("2022-11-28"));
        assert_eq!(query_param(&next, "per_page").as_deref(), Some("5"));
    }

    #[test]
    fn test_path_version_change_navigates() {
        let site = site();
        let change =
            version_change(&url("/en/admin/overview"), &site, "enterprise-server@3.12", false)
                .unwrap();
        assert_eq!(
            change,
            VersionChange::Navigate(url("/en/enterprise-server@3.12/admin/overview"))
        );

        let back = version_change(
            &url("/en/enterprise-server@3.12/admin/overview"),
            &site,
            "free-pro-team@latest",
            false,
        )
        .unwrap();
        let VersionChange::Navigate(next) = back else {
            panic!("expected navigation");
        };
        assert_eq!(next.path(), "/en/admin/overview");
        assert_eq!(
            query_param(&next, "apiVersion").as_deref(),
            Some("free-pro-team@latest")
        );
    }

    #[test]
    fn test_unknown_version_change() {
        assert!(matches!(
            version_change(&url("/en"), &site(), "v0", false),
            Err(Error::UnknownVersion { .. })
        ));
    }

    #[test]
    fn test_page_only_version_travels_as_query() {
        let change =
            version_change(&url("/en/rest/repos"), &site(), "enterprise@3.1", true).unwrap();
        let VersionChange::ReplaceInPlace(next) = change else {
            panic!("expected in-place replace");
        };
        assert_eq!(query_param(&next, "apiVersion").as_deref(), Some("enterprise@3.1"));

        // Leaving a path version still rebuilds the path
        let change = version_change(
            &url("/en/enterprise-server@3.12/admin"),
            &site(),
            "enterprise@3.1",
            true,
        )
        .unwrap();
        let VersionChange::Navigate(next) = change else {
            panic!("expected navigation");
        };
        assert_eq!(next.path(), "/en/admin");
        assert_eq!(query_param(&next, "apiVersion").as_deref(), Some("enterprise@3.1"));
    }

    #[test]
    fn test_query_version_outside_config_is_requested() {
        let cookie = store(&[(LOCALE_KEY, "en")]);
        let Negotiation::Proceed(r) =
            negotiate(&url("/en/rest?apiVersion=enterprise@3.1"), &cookie, &site())
        else {
            panic!("expected proceed");
        };
        assert_eq!(r.version, "enterprise@3.1");
        assert_eq!(r.version_source, VersionSource::Url);

        let Negotiation::Proceed(r) = negotiate(&url("/en/rest?apiVersion="), &cookie, &site())
        else {
            panic!("expected proceed");
        };
        assert_eq!(r.version_source, VersionSource::Default);
    }
}
