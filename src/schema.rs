//! Built-in option tree for the database client.
//!
//! Every option with an `environ` variable can be preset from the
//! environment when the registry is built.

use crate::error::OptionResult;
use crate::tree::{OptionSpec, Schema};
use crate::validators::{FloatValidator, IntValidator, StrValidator, Validator};

/// Default port for the application listener.
pub const DEFAULT_LISTEN_PORT: i64 = 8000;

/// Result formats rows can be returned in.
pub const RESULT_FORMATS: &[&str] = &["tuple", "namedtuple", "dict"];

const LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

fn port() -> IntValidator {
    IntValidator::new().minimum(0).maximum(65535)
}

fn positive_int() -> IntValidator {
    IntValidator::new().minimum(0).exclusive_minimum(true)
}

/// Declare the client's options.
pub fn default_schema() -> OptionResult<Schema> {
    let api_version = StrValidator::new().pattern(r"^v\d+$")?;

    Schema::builder()
        .declare(
            OptionSpec::new("host", "127.0.0.1", Validator::str(), "Database server host.")
                .environ("OPTREG_HOST"),
        )
        .declare(
            OptionSpec::new("port", 3306, port(), "Database server port.")
                .environ("OPTREG_PORT"),
        )
        .declare(
            OptionSpec::new("user", "root", Validator::str(), "Database user name.")
                .environ("OPTREG_USER"),
        )
        .declare(
            OptionSpec::new("password", "", Validator::str(), "Password for the database user.")
                .environ("OPTREG_PASSWORD"),
        )
        .declare(
            OptionSpec::new(
                "charset",
                "utf8mb4",
                Validator::str(),
                "Character set used for string values.",
            )
            .environ("OPTREG_CHARSET"),
        )
        .declare(
            OptionSpec::new(
                "database",
                "",
                Validator::str(),
                "Default database to use after connecting.",
            )
            .environ("OPTREG_DATABASE"),
        )
        .declare(
            OptionSpec::new(
                "local_infile",
                false,
                Validator::bool(),
                "Should it be possible to load local files with LOAD DATA LOCAL INFILE?",
            )
            .environ("OPTREG_LOCAL_INFILE"),
        )
        .declare(
            OptionSpec::new(
                "autocommit",
                true,
                Validator::bool(),
                "Commit every statement automatically.",
            )
            .environ("OPTREG_AUTOCOMMIT"),
        )
        .declare(
            OptionSpec::new(
                "connect_timeout",
                10,
                positive_int(),
                "Seconds to wait for a connection before giving up.",
            )
            .environ("OPTREG_CONNECT_TIMEOUT"),
        )
        .group("results", "Query result handling.", |g| {
            g.declare(
                OptionSpec::new(
                    "format",
                    "tuple",
                    StrValidator::new().valid_values(RESULT_FORMATS.iter().copied()),
                    "What form should the query results take: tuple, namedtuple, or dict.",
                )
                .environ("OPTREG_RESULTS_FORMAT"),
            )
            .declare(
                OptionSpec::new(
                    "arraysize",
                    1,
                    positive_int(),
                    "Number of rows to fetch at a time when no size is given.",
                )
                .environ("OPTREG_RESULTS_ARRAYSIZE"),
            )
        })
        .group("cluster_manager", "Cluster management API.", |g| {
            g.declare(
                OptionSpec::new(
                    "token",
                    "",
                    Validator::str(),
                    "Authentication token for the cluster management API.",
                )
                .environ("OPTREG_CLUSTER_MANAGER_TOKEN"),
            )
            .declare(
                OptionSpec::new(
                    "base_url",
                    "https://api.example.com",
                    Validator::url(),
                    "Base URL of the cluster management API.",
                )
                .environ("OPTREG_CLUSTER_MANAGER_BASE_URL"),
            )
            .option(
                "version",
                "v1",
                api_version,
                "Version of the cluster management API to use.",
            )
        })
        .group("apps", "Hosted application settings.", |g| {
            g.declare(
                OptionSpec::new(
                    "listen_port",
                    DEFAULT_LISTEN_PORT,
                    port(),
                    "Local port the application listens on.",
                )
                .environ("OPTREG_APPS_LISTEN_PORT"),
            )
            .declare(
                OptionSpec::new(
                    "startup_timeout",
                    30.0,
                    FloatValidator::new().minimum(0.0).exclusive_minimum(true),
                    "Seconds to wait for the application to start answering requests.",
                )
                .environ("OPTREG_APPS_STARTUP_TIMEOUT"),
            )
        })
        .group("debug", "Diagnostics.", |g| {
            g.declare(
                OptionSpec::new(
                    "queries",
                    false,
                    Validator::bool(),
                    "Log every query sent to the server.",
                )
                .environ("OPTREG_DEBUG_QUERIES"),
            )
            .option(
                "log_level",
                "info",
                StrValidator::new().valid_values(LOG_LEVELS.iter().copied()),
                "Minimum level of client log messages.",
            )
        })
        .build()
}
