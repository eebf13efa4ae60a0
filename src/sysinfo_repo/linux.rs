// Linux-specific helpers: /proc/cpuinfo and /etc/os-release.

/// First "model name" from /proc/cpuinfo. sysinfo sometimes reports only "cpu0".
pub(super) fn read_cpu_model_linux() -> Option<String> {
    #[cfg(target_os = "linux")]
    {
        let content = std::fs::read_to_string("/proc/cpuinfo").ok()?;
        return content
            .lines()
            .find(|l| l.starts_with("model name"))
            .and_then(|l| l.split_once(':'))
            .map(|(_, v)| v.trim())
            .filter(|v| !v.is_empty() && *v != "cpu0")
            .map(str::to_string);
    }
    #[cfg(not(target_os = "linux"))]
    None
}

/// Distro name from /etc/os-release, e.g. "Ubuntu 24.04.1 LTS".
pub(super) fn read_os_pretty_name_linux() -> Option<String> {
    #[cfg(target_os = "linux")]
    {
        let content = std::fs::read_to_string("/etc/os-release").ok()?;
        return os_release_value(&content, "PRETTY_NAME")
            .or_else(|| os_release_value(&content, "NAME"));
    }
    #[cfg(not(target_os = "linux"))]
    None
}

#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn os_release_value(content: &str, key: &str) -> Option<String> {
    content
        .lines()
        .filter_map(|l| l.split_once('='))
        .find(|(k, _)| *k == key)
        .map(|(_, v)| v.trim().trim_matches('"').to_string())
        .filter(|v| !v.is_empty())
}
