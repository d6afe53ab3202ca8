//! Project-file layer: locate, parse, validate, and resolve `decant.yml`.
//!
//! The pipeline is: [`locate`] finds the document and loads any adjacent
//! `.env`; [`parser`] expands `${VAR}` references and deserializes;
//! [`schema`] checks the raw document against the bundled JSON Schema;
//! [`validator`] enforces the semantic rules a schema cannot express; and
//! [`resolve`] computes the configuration each plugin would receive from
//! the environment.

pub mod locate;
pub mod parser;
pub mod resolve;
pub mod schema;
pub mod validator;

pub use locate::{find_project_file, load_dotenv};
pub use parser::{parse_project, parse_project_str, parse_project_with_raw};
pub use resolve::{
    resolve_plugin, resolve_plugin_with_env, ResolvedConfig, ResolvedSetting, SettingSource,
};
pub use schema::check_document;
pub use validator::validate_project;
