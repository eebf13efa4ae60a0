// Container name/image -> human label and category

use crate::models::ContainerCategory;

/// Prefix of the compose project used by the dev environment; stripped from fallback labels.
const PROJECT_PREFIX: &str = "dev_";

/// Service suffixes recognized in container names (`dev_web`, `shop_web`, ...).
const NAME_TABLE: &[(&str, &str, ContainerCategory)] = &[
    ("web", "Web Server (Apache/PHP)", ContainerCategory::Web),
    ("mysql", "MySQL Database", ContainerCategory::Database),
    ("redis", "Redis Cache", ContainerCategory::Cache),
    ("python", "Python Environment", ContainerCategory::Runtime),
    ("node", "Node.js Environment", ContainerCategory::Runtime),
    ("phpmyadmin", "phpMyAdmin", ContainerCategory::Tool),
    ("mailhog", "MailHog", ContainerCategory::Tool),
];

/// Image keywords, checked in order. `phpmyadmin` must precede the generic `php`.
const IMAGE_TABLE: &[(&str, &str, ContainerCategory)] = &[
    ("mysql", "MySQL Database", ContainerCategory::Database),
    ("redis", "Redis Cache", ContainerCategory::Cache),
    ("python", "Python Environment", ContainerCategory::Runtime),
    ("node", "Node.js Environment", ContainerCategory::Runtime),
    ("phpmyadmin", "phpMyAdmin", ContainerCategory::Tool),
    ("mailhog", "MailHog", ContainerCategory::Tool),
    ("apache", "Web Server", ContainerCategory::Web),
    ("php", "Web Server", ContainerCategory::Web),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub label: String,
    pub category: ContainerCategory,
}

/// Classify a container. Total and deterministic: every input gets a label.
///
/// Resolution order: the name table (exact `dev_<service>` or any `_<service>` suffix),
/// then image keywords, then a title-cased form of the name with category `Unknown`.
pub fn classify(name: &str, image: &str) -> Classification {
    let name = name.trim().trim_start_matches('/');

    if let Some((label, category)) = lookup_name(name) {
        return Classification {
            label: label.to_string(),
            category,
        };
    }

    let image = image.to_ascii_lowercase();
    if let Some((_, label, category)) = IMAGE_TABLE.iter().find(|(kw, _, _)| image.contains(kw)) {
        return Classification {
            label: label.to_string(),
            category: *category,
        };
    }

    Classification {
        label: fallback_label(name),
        category: ContainerCategory::Unknown,
    }
}

fn lookup_name(name: &str) -> Option<(&'static str, ContainerCategory)> {
    NAME_TABLE.iter().find_map(|(service, label, category)| {
        let exact = name
            .strip_prefix(PROJECT_PREFIX)
            .is_some_and(|rest| rest == *service);
        let suffixed = name
            .strip_suffix(service)
            .is_some_and(|head| head.len() > 1 && head.ends_with('_'));
        (exact || suffixed).then_some((*label, *category))
    })
}

fn fallback_label(name: &str) -> String {
    let stripped = name.strip_prefix(PROJECT_PREFIX).unwrap_or(name);
    let words: Vec<String> = stripped
        .split('_')
        .filter(|w| !w.is_empty())
        .map(title_case)
        .collect();
    if words.is_empty() {
        "Unknown".to_string()
    } else {
        words.join(" ")
    }
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
