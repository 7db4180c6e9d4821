//! # bagakit-skill-maker
//!
//! Scaffolding and policy validation for Bagakit skill bundles.
//!
//! A skill bundle is a directory holding a `SKILL.md` descriptor, a
//! `SKILL_PAYLOAD.json` manifest that lists what ships, and optional
//! `scripts/`, `references/` and `agents/` directories. Validation runs a
//! fixed set of scanners over the bundle and reports every violation in one
//! pass, as text, JSON, or [SARIF].
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::path::Path;
//! use bagakit_skill_maker::{config::Config, output, validate};
//!
//! let config = Config::load(None).expect("failed to load config");
//! let report = validate::run_validation(Path::new("./my-skill"), &config);
//!
//! let rendered = output::format_report(&report, output::OutputFormat::Text, false)
//!     .expect("text output never fails");
//! print!("{}", rendered.stdout);
//! eprint!("{}", rendered.stderr);
//! ```
//!
//! ## Architecture
//!
//! 1. **[`config`]**: the validation policy (file names, vocabularies,
//!    thresholds), optionally loaded from TOML.
//! 2. **[`bundle`]**: load the descriptor and manifest once; parsing lives in
//!    [`header`], [`manifest`] and [`sections`].
//! 3. **[`scanners`]**: the [`scanners::Scanner`] trait and the built-in
//!    rule catalogue.
//! 4. **[`validate`]**: run the scanners in order and build a
//!    [`diagnostic::ValidationReport`].
//! 5. **[`output`]**: render the report.
//! 6. **[`scaffold`]**: create a new bundle that already satisfies the policy.
//!
//! ## Scanners
//!
//! | Scanner | Description |
//! |---------|-------------|
//! | `frontmatter` | SKILL.md header keys, name and description |
//! | `payload` | Manifest schema and include entries vs. files on disk |
//! | `structure` | Length ceiling, status footer, standalone and optional-contract statements |
//! | `sections` | Required sections, bullet counts, output routes and archive gate |
//! | `naming` | File names and extensions in runtime directories |
//! | `paths` | Machine-specific absolute path literals |
//! | `coupling` | Hard dependencies on and hard calls into other skills |
//! | `contract` | Generic metadata and structured-block conventions (warnings) |
//!
//! [SARIF]: https://sarifweb.azurewebsites.net/

pub mod bundle;
pub mod config;
pub mod diagnostic;
pub mod header;
pub mod manifest;
pub mod output;
pub mod scaffold;
pub mod scanners;
pub mod sections;
pub mod validate;
