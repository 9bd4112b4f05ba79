//! Steering rules for steer.
//!
//! Steering rules are Markdown files that tell an AI assistant how to work on
//! matching files. The front matter decides when a rule is included; the body
//! is handed to the assistant untouched.
//!
//! # Structure
//!
//! ```text
//! .kiro/steering/
//! ├── general.md             # inclusion: always
//! ├── release-checklist.md   # inclusion: manual
//! └── dotnet/
//!     └── csharp-style.md    # inclusion: fileMatch
//! ```
//!
//! # Front Matter Format
//!
//! ```markdown
//! ---
//! description: C# coding conventions
//! fileMatchPattern: "*.cs", "*.csproj"
//! inclusion: fileMatch
//! ---
//!
//! # C# Style
//! ...
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use steer_rules::{RuleLoader, RuleRegistry};
//!
//! let loader = RuleLoader::new().add_path("./.kiro/steering");
//! let registry = RuleRegistry::load_all(&loader).await?;
//!
//! let rules = registry.rules_for("src/Program.cs");
//! let on_request = registry.manual_rules();
//! ```

mod loader;
mod registry;
mod rule;

pub use loader::{LoadedRules, RuleLoader};
pub use registry::RuleRegistry;
pub use rule::{FrontMatter, Inclusion, SteeringRule};
