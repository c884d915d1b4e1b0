//! Service headers and the usage block.

/// Width of the header banner.
pub const BANNER_WIDTH: usize = 60;

/// Non-interactive invocations, one per line.
pub const USAGE_LINES: &[&str] = &[
    "az-provision resource create <env> <rg_name> [location]",
    "az-provision resource delete <env> <rg_name>",
    "az-provision vm create <env> [vm_name]",
    "az-provision vm stop <env> [vm_name]",
    "az-provision vm deallocate <env> [vm_name]",
    "az-provision pipeline run <env> <pipeline_name>",
    "az-provision model deploy <env> <model_name>",
];

/// Banner title for a service keyword.
pub fn service_title(service: &str) -> &'static str {
    match service {
        "resource" => "Resource Management Service",
        "vm" => "Virtual Machine Service",
        "pipeline" => "Data Pipeline Service",
        "model" => "Model Deployment Service",
        _ => "Azure Tooling",
    }
}

/// Center `value` in a field of `width` characters.
///
/// # Arguments
/// * `value` - The text to center
/// * `width` - The minimum width of the field
///
/// # Returns
/// The padded string, or `value` unchanged when it is already wider
pub fn center(value: &str, width: usize) -> String {
    let len = value.chars().count();
    if len >= width {
        value.to_string()
    } else {
        format!("{value:^width$}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_short() {
        assert_eq!(center("ab", 6), "  ab  ");
    }

    #[test]
    fn test_center_long() {
        assert_eq!(center("long_value", 5), "long_value");
    }

    #[test]
    fn test_service_title() {
        assert_eq!(service_title("resource"), "Resource Management Service");
        assert_eq!(service_title("pipeline"), "Data Pipeline Service");
        assert_eq!(service_title("model"), "Model Deployment Service");
        assert_eq!(service_title("other"), "Azure Tooling");
    }

    #[test]
    fn test_usage_covers_every_action() {
        for action in ["resource create", "resource delete", "pipeline run", "model deploy"] {
            assert!(USAGE_LINES.iter().any(|l| l.contains(action)), "{action}");
        }
    }
}
