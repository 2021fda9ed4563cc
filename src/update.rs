//! Update-check descriptor for the host's software update checker

use serde::Serialize;

const DISPLAY_NAME: &str = "Signal Notifier";
const CHECK_TYPE: &str = "github_commit";
const REPO_USER: &str = "xianic";
const REPO_NAME: &str = "OctoPrint_Signal-Notifier";
const REPO_BRANCH: &str = "install-dev";

/// Where the host looks for newer versions. Purely informational.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct UpdateInfo {
    pub display_name: String,
    pub display_version: String,
    pub current: String,
    #[serde(rename = "type")]
    pub check_type: String,
    pub user: String,
    pub repo: String,
    pub branch: String,
    /// Archive URL; `{target}` is filled in by the update checker
    pub pip: String,
}

impl UpdateInfo {
    pub fn current() -> Self {
        let version = env!("CARGO_PKG_VERSION").to_string();
        Self {
            display_name: DISPLAY_NAME.to_string(),
            display_version: version.clone(),
            current: version,
            check_type: CHECK_TYPE.to_string(),
            user: REPO_USER.to_string(),
            repo: REPO_NAME.to_string(),
            branch: REPO_BRANCH.to_string(),
            pip: format!("https://github.com/{}/{}/archive/{{target}}.zip", REPO_USER, REPO_NAME),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_archive_url_keeps_target_placeholder() {
        let info = UpdateInfo::current();
        assert_eq!(
            info.pip,
            "https://github.com/xianic/OctoPrint_Signal-Notifier/archive/{target}.zip"
        );
    }

    #[test]
    fn test_serializes_check_type_as_type() {
        let json = serde_json::to_value(UpdateInfo::current()).unwrap();
        assert_eq!(json["type"], "github_commit");
        assert_eq!(json["branch"], "install-dev");
        assert_eq!(json["current"], env!("CARGO_PKG_VERSION"));
    }
}
