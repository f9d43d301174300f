//! Common constants used throughout the gecko application.

/// Project name offered when the user just presses enter.
pub const DEFAULT_PROJECT_NAME: &str = "my_test_project";

/// Binding key every template can rely on.
pub const PROJECT_NAME_KEY: &str = "ProjectName";

/// Directory searched for local templates, relative to the working directory.
pub const DEFAULT_TEMPLATES_DIR: &str = "templates";

/// Menu entry that switches the prompt to a remote source.
pub const REMOTE_TEMPLATE_CHOICE: &str = "remote template (GitHub URL / user/repo)";

/// Template names offered by the interactive menu, in display order.
pub const TEMPLATE_CHOICES: [&str; 4] =
    ["api-pytest", "pytest-request", "unittest-basic", REMOTE_TEMPLATE_CHOICE];

/// Prefix marking a selector as a GitHub `owner/repo` archive.
pub const ARCHIVE_PREFIX: &str = "gh@";

/// Code host serving `<owner>/<repo>/archive/HEAD.zip` snapshots.
pub const DEFAULT_ARCHIVE_HOST: &str = "https://github.com";

/// Version control metadata that never reaches the generated project.
pub const VCS_DIR: &str = ".git";

/// Permission bits of every generated file.
pub const FILE_MODE: u32 = 0o644;

/// User agent sent with archive downloads.
pub const USER_AGENT: &str = concat!("gecko/", env!("CARGO_PKG_VERSION"));
