//! schema.org JSON-LD blocks injected into page heads

use serde_json::{json, Value};

use super::AppState;
use crate::locale::Locale;

/// JSON-LD documents for the page at `bare_path`, serialized for a
/// `<script type="application/ld+json">` element
pub fn structured_data(state: &AppState, locale: &Locale, bare_path: &str) -> Vec<String> {
    let mut blocks = vec![organization(state, locale)];
    if bare_path == "/" {
        blocks.push(website(state, locale));
    }
    if bare_path == "/" || bare_path == "/services" {
        blocks.push(services(state, locale));
    }
    blocks.iter().map(script_safe).collect()
}

fn base_url(state: &AppState) -> &str {
    state.config.url.trim_end_matches('/')
}

fn area_served(state: &AppState, locale: &Locale) -> Value {
    json!({
        "@type": "Country",
        "name": state.catalog.text(locale, "schema.area_served"),
    })
}

fn organization(state: &AppState, locale: &Locale) -> Value {
    let config = &state.config;
    let base = base_url(state);
    json!({
        "@context": "https://schema.org",
        "@type": "Organization",
        "name": config.title,
        "legalName": config.author,
        "url": base,
        "logo": format!("{}{}", base, config.logo),
        "description": state.catalog.text(locale, "schema.description"),
        "areaServed": area_served(state, locale),
        "sameAs": config.social,
        "contactPoint": {
            "@type": "ContactPoint",
            "contactType": "customer service",
            "email": config.email,
            "availableLanguage": state.catalog.texts(locale, "schema.languages"),
        },
    })
}

fn website(state: &AppState, locale: &Locale) -> Value {
    let base = base_url(state);
    json!({
        "@context": "https://schema.org",
        "@type": "WebSite",
        "name": state.config.title,
        "url": base,
        "description": state.catalog.text(locale, "home.hero.subtitle"),
        "inLanguage": [locale.code()],
    })
}

/// Service list built from the sections of the translated services page
fn services(state: &AppState, locale: &Locale) -> Value {
    let sections = match state.catalog.bundle(locale).pointer("/services/sections") {
        Some(Value::Array(sections)) => sections.clone(),
        _ => Vec::new(),
    };

    let items: Vec<Value> = sections
        .iter()
        .enumerate()
        .map(|(index, section)| {
            json!({
                "@type": "ListItem",
                "position": index + 1,
                "item": {
                    "@type": "Service",
                    "name": section.get("title").cloned().unwrap_or(Value::Null),
                    "description": section.get("body").cloned().unwrap_or(Value::Null),
                    "provider": {
                        "@type": "Organization",
                        "name": state.config.title,
                    },
                    "areaServed": area_served(state, locale),
                },
            })
        })
        .collect();

    json!({
        "@context": "https://schema.org",
        "@type": "ItemList",
        "itemListElement": items,
    })
}

/// JSON text that cannot close the surrounding script element
fn script_safe(value: &Value) -> String {
    value.to_string().replace("</", "<\\/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_safe() {
        let value = json!({ "name": "</script><b>" });
        let out = script_safe(&value);
        assert!(!out.contains("</script>"));
        let back: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(back["name"], "</script><b>");
    }
}
