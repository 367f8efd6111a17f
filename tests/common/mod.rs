//! Shared test utilities for CLI end-to-end tests.
//!
//! ## Usage
//!
//! Add `mod common;` to your test file, then use the helpers:
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = TestFixture::spark();
//!     fixture.command().arg("apply").assert().success();
//! }
//! ```

use assert_fs::prelude::*;
use std::path::{Path, PathBuf};

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::fixtures;
    pub use super::TestFixture;
}

/// Fixture files shipped with the tests.
#[allow(dead_code)]
pub mod fixtures {
    /// Installation plan for the Spark stubs.
    pub const SPARK_PLAN: &str = include_str!("../fixtures/spark/.scaffold.yaml");
    /// Spark user model template.
    pub const SPARK_USER: &str = include_str!("../fixtures/spark/stubs/app/User.php");
    /// Service provider stub with namespace placeholders.
    pub const SPARK_PROVIDER: &str =
        include_str!("../fixtures/spark/stubs/app/Providers/SparkServiceProvider.php");

    /// Stock Laravel user model.
    pub const LARAVEL_USER: &str = include_str!("../fixtures/laravel/app/User.php");
    /// Stock Laravel application config.
    pub const LARAVEL_APP_CONFIG: &str = include_str!("../fixtures/laravel/config/app.php");
    /// Stock Laravel environment file.
    pub const LARAVEL_ENV: &str = include_str!("../fixtures/laravel/.env");
}

/// A template directory holding the Spark plan and stubs, next to a fresh
/// Laravel project.
pub struct TestFixture {
    templates: assert_fs::TempDir,
    project: assert_fs::TempDir,
}

impl TestFixture {
    /// Empty template and project directories.
    pub fn new() -> Self {
        Self {
            templates: assert_fs::TempDir::new().expect("Failed to create temp directory"),
            project: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// The Spark templates and a stock Laravel project.
    pub fn spark() -> Self {
        Self::new()
            .with_template(".scaffold.yaml", fixtures::SPARK_PLAN)
            .with_template("stubs/app/User.php", fixtures::SPARK_USER)
            .with_template(
                "stubs/app/Providers/SparkServiceProvider.php",
                fixtures::SPARK_PROVIDER,
            )
            .with_project_file("app/User.php", fixtures::LARAVEL_USER)
            .with_project_file("config/app.php", fixtures::LARAVEL_APP_CONFIG)
            .with_project_file(".env", fixtures::LARAVEL_ENV)
    }

    /// Add a file to the template directory.
    pub fn with_template(self, path: &str, content: &str) -> Self {
        self.templates
            .child(path)
            .write_str(content)
            .expect("Failed to write template");
        self
    }

    /// Add a file to the project.
    pub fn with_project_file(self, path: &str, content: &str) -> Self {
        self.project
            .child(path)
            .write_str(content)
            .expect("Failed to write project file");
        self
    }

    pub fn plan_path(&self) -> PathBuf {
        self.templates.path().join(".scaffold.yaml")
    }

    pub fn project_path(&self) -> &Path {
        self.project.path()
    }

    /// A project file, for assertions.
    pub fn project_child(&self, path: &str) -> assert_fs::fixture::ChildPath {
        self.project.child(path)
    }

    /// Read a project file.
    #[allow(dead_code)]
    pub fn read(&self, path: &str) -> String {
        std::fs::read_to_string(self.project.path().join(path)).expect("Failed to read project file")
    }

    /// A `scaffold-merge` command running `subcommand` inside the project
    /// with the fixture's plan and colors off.
    pub fn command(&self, subcommand: &str) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("scaffold-merge");
        cmd.current_dir(self.project.path())
            .env_remove("SCAFFOLD_PLAN")
            .env_remove("RUST_LOG")
            .arg(subcommand)
            .arg("--color")
            .arg("never")
            .arg("--plan")
            .arg(self.plan_path());
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}
